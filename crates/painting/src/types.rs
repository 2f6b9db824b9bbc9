use std::hash::{Hash, Hasher};

use glam::{Vec2, Vec3};
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// An inverted box that any `include_point` call replaces.
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        }
    }

    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn from_triangle(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self {
            min: v0.min(v1).min(v2),
            max: v0.max(v1).max(v2),
        }
    }

    pub fn include_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Inclusive overlap test; touching boxes overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}

/// A ray in mesh-local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
    pub max_distance: f32,
}

impl Ray {
    /// Build a ray, normalizing `direction`.
    ///
    /// Returns `None` for a zero or non-finite direction, or a max distance that
    /// is not positive.
    pub fn new(origin: Vec3, direction: Vec3, max_distance: f32) -> Option<Self> {
        let direction = direction.try_normalize()?;
        if max_distance.is_nan() || max_distance <= 0.0 {
            return None;
        }
        Some(Self {
            origin,
            direction,
            max_distance,
        })
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Bounds of the segment from the origin to the farthest reachable point.
    ///
    /// `None` when the segment is unbounded.
    pub fn bounds(&self) -> Option<Aabb> {
        if !self.max_distance.is_finite() {
            return None;
        }
        Some(Aabb::from_points(self.origin, self.at(self.max_distance)))
    }
}

/// Closest ray-triangle intersection in mesh-local space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    /// Index of the triangle in the snapshot
    pub triangle: u32,
    /// Barycentric weight of vertex 1
    pub u: f32,
    /// Barycentric weight of vertex 2
    pub v: f32,
    /// Distance along the ray
    pub t: f32,
    /// Local-space hit point
    pub point: Vec3,
}

impl Intersection {
    /// Barycentric weights `(w0, w1, w2)`.
    pub fn barycentric(&self) -> Vec3 {
        Vec3::new(1.0 - self.u - self.v, self.u, self.v)
    }
}

/// Texture coordinate resolved from a mesh hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UvHit {
    pub uv: Vec2,
    pub triangle: u32,
    /// Vertex indices of the hit triangle
    pub vertices: [u32; 3],
    pub local_point: Vec3,
}

/// Stable identity of a paintable surface, hashed from its display name.
///
/// Two names may collide; that is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceId(pub u64);

impl SurfaceId {
    pub fn from_name(name: &str) -> Self {
        let mut hasher = FxHasher::default();
        name.hash(&mut hasher);
        Self(hasher.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_normalizes_direction() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -5.0), 10.0).unwrap();
        assert!((ray.direction.length() - 1.0).abs() < 1e-6);
        assert_eq!(ray.at(2.0), Vec3::new(0.0, 0.0, -2.0));
    }

    #[test]
    fn test_ray_rejects_degenerate_input() {
        assert!(Ray::new(Vec3::ZERO, Vec3::ZERO, 1.0).is_none());
        assert!(Ray::new(Vec3::ZERO, Vec3::X, 0.0).is_none());
        assert!(Ray::new(Vec3::ZERO, Vec3::X, f32::NAN).is_none());
    }

    #[test]
    fn test_unbounded_ray_has_no_bounds() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X, f32::INFINITY).unwrap();
        assert!(ray.bounds().is_none());

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Y, 2.0).unwrap();
        let bounds = ray.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(0.0, -2.0, 0.0));
        assert_eq!(bounds.max, Vec3::ZERO);
    }

    #[test]
    fn test_aabb_overlap_touching() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::ONE, Vec3::splat(2.0));
        let c = Aabb::new(Vec3::splat(1.5), Vec3::splat(2.0));
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_surface_id_is_stable() {
        assert_eq!(SurfaceId::from_name("Canvas"), SurfaceId::from_name("Canvas"));
        assert_ne!(SurfaceId::from_name("Canvas"), SurfaceId::from_name("Easel"));
    }
}
