//! Texture coordinate resolution from mesh hits.
//!
//! Mapped meshes interpolate their vertex UVs at the hit's barycentric
//! coordinates. Unmapped meshes can fall back to a planar projection onto the
//! local X/Z plane, normalized by the mesh bounds.

use glam::{Vec2, Vec3};

use crate::error::UvError;
use crate::geometry::GeometrySnapshot;
use crate::raycast::interpolate_vec2;
use crate::types::{Aabb, Intersection};

/// Converts intersections into texture coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UvResolver {
    /// Project onto local X/Z when the mesh has no UVs
    pub planar_fallback: bool,
    /// Clamp interpolated UVs to [0, 1]
    pub clamp: bool,
}

impl Default for UvResolver {
    fn default() -> Self {
        Self {
            planar_fallback: true,
            clamp: true,
        }
    }
}

impl UvResolver {
    pub fn new(planar_fallback: bool, clamp: bool) -> Self {
        Self {
            planar_fallback,
            clamp,
        }
    }

    /// Resolve the texture coordinate of `hit` on `snapshot`.
    pub fn resolve(&self, snapshot: &GeometrySnapshot, hit: &Intersection) -> Result<Vec2, UvError> {
        if let Some((uv0, uv1, uv2)) = snapshot.triangle_uvs(hit.triangle as usize) {
            let uv = interpolate_vec2(uv0, uv1, uv2, hit.u, hit.v);
            return Ok(if self.clamp { clamp_unit(uv) } else { uv });
        }

        if self.planar_fallback {
            return Ok(planar_uv(hit.point, snapshot.bounds()));
        }

        Err(UvError::MissingUvs)
    }
}

/// Project a local point onto the X/Z plane of `bounds`, clamped to [0, 1].
///
/// A zero-width extent uses a denominator of 1.
pub fn planar_uv(point: Vec3, bounds: &Aabb) -> Vec2 {
    let size = bounds.size();
    let width = if size.x > 0.0 { size.x } else { 1.0 };
    let depth = if size.z > 0.0 { size.z } else { 1.0 };

    clamp_unit(Vec2::new(
        (point.x - bounds.min.x) / width,
        (point.z - bounds.min.z) / depth,
    ))
}

#[inline]
fn clamp_unit(uv: Vec2) -> Vec2 {
    uv.clamp(Vec2::ZERO, Vec2::ONE)
}
