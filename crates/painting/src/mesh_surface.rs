//! Paintable mesh surfaces
//!
//! [`PaintSurface`] is the capability the brush needs from anything it paints:
//! turn a local ray into a texture coordinate, rasterize a dab, and report the
//! raster size. [`MeshPaintSurface`] implements it over a shared geometry cache
//! and a CPU raster; hosts upload that raster through [`TextureBinding`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use glam::Vec3;
use mesh_painting_config::SurfaceConfig;
use tracing::warn;

use crate::geometry::MeshGeometryCache;
use crate::surface::CpuSurface;
use crate::types::{Ray, UvHit};
use crate::uv::UvResolver;

/// Paint capability of a mesh.
pub trait PaintSurface {
    /// Intersect a mesh-local ray and resolve the texture coordinate of the
    /// closest hit. `None` on a miss or when no coordinate can be resolved.
    fn resolve_uv(&self, local_origin: Vec3, local_direction: Vec3, max_distance: f32) -> Option<UvHit>;

    /// Rasterize one dab centered at `(u, v)`.
    fn paint_dab(&mut self, u: f32, v: f32, radius_px: f32, color: [f32; 4]);

    /// Raster size in pixels
    fn canvas_dimensions(&self) -> (u32, u32);
}

/// Host hook that makes a raster visible on the mesh's material.
pub trait TextureBinding {
    /// Bind RGBA f32 pixel data (row-major) as the mesh texture.
    fn bind(&mut self, pixels: &[u8], width: u32, height: u32);
}

/// UV-atlas paint surface for one mesh.
pub struct MeshPaintSurface {
    geometry: Arc<MeshGeometryCache>,
    resolver: UvResolver,
    atlas: CpuSurface,
    flip_v: bool,
    missing_uv_reported: AtomicBool,
}

impl MeshPaintSurface {
    /// Create a surface over `geometry` with a fresh transparent raster.
    pub fn new(geometry: Arc<MeshGeometryCache>, config: &SurfaceConfig) -> Self {
        Self {
            geometry,
            resolver: UvResolver::new(config.planar_fallback, config.clamp_uv),
            atlas: CpuSurface::new(config.width, config.height),
            flip_v: config.flip_v,
            missing_uv_reported: AtomicBool::new(false),
        }
    }

    pub fn geometry(&self) -> &Arc<MeshGeometryCache> {
        &self.geometry
    }

    pub fn atlas(&self) -> &CpuSurface {
        &self.atlas
    }

    pub fn atlas_mut(&mut self) -> &mut CpuSurface {
        &mut self.atlas
    }

    /// Hand the raster to `binding` if it changed since the last flush.
    ///
    /// # Returns
    /// Whether a bind happened.
    pub fn flush(&mut self, binding: &mut dyn TextureBinding) -> bool {
        if !self.atlas.take_dirty() {
            return false;
        }
        binding.bind(self.atlas.as_bytes(), self.atlas.width, self.atlas.height);
        true
    }
}

impl PaintSurface for MeshPaintSurface {
    fn resolve_uv(&self, local_origin: Vec3, local_direction: Vec3, max_distance: f32) -> Option<UvHit> {
        let ray = Ray::new(local_origin, local_direction, max_distance)?;
        let snapshot = self.geometry.snapshot()?;
        let hit = crate::raycast::raycast_snapshot(snapshot, &ray)?;

        match self.resolver.resolve(snapshot, &hit) {
            Ok(uv) => Some(UvHit {
                uv,
                triangle: hit.triangle,
                vertices: snapshot.triangle(hit.triangle as usize),
                local_point: hit.point,
            }),
            Err(err) => {
                if !self.missing_uv_reported.swap(true, Ordering::Relaxed) {
                    warn!("Cannot paint mesh: {}", err);
                }
                None
            }
        }
    }

    fn paint_dab(&mut self, u: f32, v: f32, radius_px: f32, color: [f32; 4]) {
        self.atlas.paint_uv_dab(u, v, radius_px, color, self.flip_v);
    }

    fn canvas_dimensions(&self) -> (u32, u32) {
        (self.atlas.width, self.atlas.height)
    }
}
