//! Immutable derived geometry for raycasting and surface sampling.
//!
//! A [`GeometrySnapshot`] is built once from flat mesh arrays and never changes
//! afterwards, so it can be shared between brushes behind an `Arc`.
//! [`MeshGeometryCache`] wraps the build result: a failed build is logged once
//! and every later query reports no hit.

use glam::{Vec2, Vec3};
use rand::Rng;
use tracing::{error, warn};

use crate::error::GeometryError;
use crate::raycast::{interpolate_vec3, raycast_snapshot};
use crate::types::{Aabb, Intersection, Ray};

/// A uniformly distributed point on a mesh surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub triangle: u32,
    /// Barycentric weights `(w0, w1, w2)`
    pub barycentric: Vec3,
    pub point: Vec3,
}

/// Derived per-triangle data for one mesh.
#[derive(Debug, Clone)]
pub struct GeometrySnapshot {
    positions: Vec<Vec3>,
    uvs: Option<Vec<Vec2>>,
    triangles: Vec<[u32; 3]>,
    triangle_bounds: Vec<Aabb>,
    areas: Vec<f32>,
    /// `cumulative_areas[0] == 0`, `cumulative_areas[n] == total area`
    cumulative_areas: Vec<f32>,
    bounds: Aabb,
}

impl GeometrySnapshot {
    /// Build a snapshot from flat arrays.
    ///
    /// # Arguments
    /// * `positions` - `3 * vertex_count` floats
    /// * `uvs` - `2 * vertex_count` floats; any other length is treated as absent
    /// * `indices` - triangle index triples; sequential vertex triples when absent
    pub fn build(
        positions: Option<&[f32]>,
        uvs: Option<&[f32]>,
        indices: Option<&[u32]>,
    ) -> Result<Self, GeometryError> {
        let positions = match positions {
            Some(p) if !p.is_empty() => p,
            _ => return Err(GeometryError::MissingPositions),
        };
        if positions.len() % 3 != 0 {
            return Err(GeometryError::MalformedPositions(positions.len()));
        }

        let positions: Vec<Vec3> = positions
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
            .collect();
        let vertex_count = positions.len();

        let uvs = match uvs {
            Some(uv) if uv.len() == vertex_count * 2 => Some(
                uv.chunks_exact(2)
                    .map(|c| Vec2::new(c[0], c[1]))
                    .collect::<Vec<_>>(),
            ),
            Some(uv) if !uv.is_empty() => {
                warn!(
                    "UV array has {} floats, expected {}; treating mesh as unmapped",
                    uv.len(),
                    vertex_count * 2
                );
                None
            }
            _ => None,
        };

        let triangles = match indices {
            Some(indices) => {
                if indices.len() % 3 != 0 {
                    warn!(
                        "Ignoring {} trailing indices that do not form a triangle",
                        indices.len() % 3
                    );
                }
                let mut triangles = Vec::with_capacity(indices.len() / 3);
                for (tri, chunk) in indices.chunks_exact(3).enumerate() {
                    for &index in chunk {
                        if index as usize >= vertex_count {
                            return Err(GeometryError::IndexOutOfRange {
                                triangle: tri,
                                index,
                                vertex_count,
                            });
                        }
                    }
                    triangles.push([chunk[0], chunk[1], chunk[2]]);
                }
                triangles
            }
            None => {
                if vertex_count % 3 != 0 {
                    warn!(
                        "Ignoring {} trailing vertices in non-indexed mesh",
                        vertex_count % 3
                    );
                }
                (0..(vertex_count / 3) as u32)
                    .map(|t| [t * 3, t * 3 + 1, t * 3 + 2])
                    .collect()
            }
        };

        let mut bounds = Aabb::empty();
        for &p in &positions {
            bounds.include_point(p);
        }

        let mut triangle_bounds = Vec::with_capacity(triangles.len());
        let mut areas = Vec::with_capacity(triangles.len());
        let mut cumulative_areas = Vec::with_capacity(triangles.len() + 1);
        cumulative_areas.push(0.0);
        let mut running = 0.0f32;

        for tri in &triangles {
            let v0 = positions[tri[0] as usize];
            let v1 = positions[tri[1] as usize];
            let v2 = positions[tri[2] as usize];

            triangle_bounds.push(Aabb::from_triangle(v0, v1, v2));

            let area = 0.5 * (v1 - v0).cross(v2 - v0).length();
            areas.push(area);
            running += area;
            cumulative_areas.push(running);
        }

        Ok(Self {
            positions,
            uvs,
            triangles,
            triangle_bounds,
            areas,
            cumulative_areas,
            bounds,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Vertex indices of a triangle
    pub fn triangle(&self, tri: usize) -> [u32; 3] {
        self.triangles[tri]
    }

    /// Vertex positions of a triangle
    pub fn triangle_positions(&self, tri: usize) -> (Vec3, Vec3, Vec3) {
        let [i0, i1, i2] = self.triangles[tri];
        (
            self.positions[i0 as usize],
            self.positions[i1 as usize],
            self.positions[i2 as usize],
        )
    }

    pub fn triangle_bounds(&self, tri: usize) -> &Aabb {
        &self.triangle_bounds[tri]
    }

    pub fn triangle_area(&self, tri: usize) -> f32 {
        self.areas[tri]
    }

    pub fn total_area(&self) -> f32 {
        self.cumulative_areas.last().copied().unwrap_or(0.0)
    }

    pub fn cumulative_areas(&self) -> &[f32] {
        &self.cumulative_areas
    }

    /// Bounds of all vertices in local space
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn has_uvs(&self) -> bool {
        self.uvs.is_some()
    }

    /// UV of vertex `index`, if the mesh is mapped
    pub fn uv(&self, index: usize) -> Option<Vec2> {
        self.uvs.as_ref()?.get(index).copied()
    }

    /// UVs of a triangle's three vertices, if the mesh is mapped
    pub fn triangle_uvs(&self, tri: usize) -> Option<(Vec2, Vec2, Vec2)> {
        let uvs = self.uvs.as_ref()?;
        let [i0, i1, i2] = self.triangles[tri];
        Some((uvs[i0 as usize], uvs[i1 as usize], uvs[i2 as usize]))
    }

    /// Pick a point uniformly by area over the whole surface.
    ///
    /// Returns `None` when the mesh has no area.
    pub fn sample_surface<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<SurfaceSample> {
        let total = self.total_area();
        if self.triangles.is_empty() || total <= 0.0 {
            return None;
        }

        let target = rng.random::<f32>() * total;
        let tri = self
            .cumulative_areas
            .partition_point(|&c| c <= target)
            .saturating_sub(1)
            .min(self.triangles.len() - 1);

        let mut u = rng.random::<f32>();
        let mut v = rng.random::<f32>();
        if u + v > 1.0 {
            u = 1.0 - u;
            v = 1.0 - v;
        }

        let (v0, v1, v2) = self.triangle_positions(tri);
        Some(SurfaceSample {
            triangle: tri as u32,
            barycentric: Vec3::new(1.0 - u - v, u, v),
            point: interpolate_vec3(v0, v1, v2, u, v),
        })
    }
}

/// Geometry cache for one paintable mesh.
///
/// Holds the snapshot, or the error that prevented building it.
#[derive(Debug)]
pub struct MeshGeometryCache {
    state: Result<GeometrySnapshot, GeometryError>,
}

impl MeshGeometryCache {
    /// Build the cache. A failure is logged here and never retried.
    pub fn build(positions: Option<&[f32]>, uvs: Option<&[f32]>, indices: Option<&[u32]>) -> Self {
        let state = GeometrySnapshot::build(positions, uvs, indices);
        if let Err(err) = &state {
            error!("Geometry cache unusable: {}", err);
        }
        Self { state }
    }

    pub fn from_snapshot(snapshot: GeometrySnapshot) -> Self {
        Self { state: Ok(snapshot) }
    }

    pub fn snapshot(&self) -> Option<&GeometrySnapshot> {
        self.state.as_ref().ok()
    }

    pub fn error(&self) -> Option<&GeometryError> {
        self.state.as_ref().err()
    }

    pub fn is_usable(&self) -> bool {
        self.state.is_ok()
    }

    /// Closest hit along `ray`; always `None` for a failed cache.
    pub fn raycast(&self, ray: &Ray) -> Option<Intersection> {
        raycast_snapshot(self.snapshot()?, ray)
    }
}
