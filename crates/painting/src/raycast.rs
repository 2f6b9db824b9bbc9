//! Ray-mesh intersection for texture painting.
//!
//! This module provides ray-triangle intersection using the Moller-Trumbore
//! algorithm, and a closest-hit scan over a [`GeometrySnapshot`] that prunes
//! triangles by bounding box before the exact test.

use glam::{Vec2, Vec3};
use tracing::trace;

use crate::constants::{MIN_HIT_DISTANCE, PARALLEL_EPSILON};
use crate::geometry::GeometrySnapshot;
use crate::types::{Intersection, Ray};

/// Result of a ray-triangle intersection test
#[derive(Debug, Clone, Copy)]
pub struct TriangleHit {
    /// Distance along the ray to the intersection point
    pub t: f32,
    /// Barycentric coordinate u (weight for vertex 1)
    pub u: f32,
    /// Barycentric coordinate v (weight for vertex 2)
    pub v: f32,
}

/// Moller-Trumbore ray-triangle intersection algorithm.
///
/// Returns the hit distance and barycentric coordinates if the ray intersects
/// the triangle in front of its origin. There is no upper bound on `t`.
///
/// # Arguments
/// * `ray_origin` - Origin point of the ray
/// * `ray_dir` - Direction of the ray (should be normalized for consistent t values)
/// * `v0`, `v1`, `v2` - Triangle vertices
pub fn ray_triangle_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<TriangleHit> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let pvec = ray_dir.cross(edge2);
    let det = edge1.dot(pvec);

    // Ray lies in the triangle's plane, or the triangle is degenerate
    if det.abs() < PARALLEL_EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let tvec = ray_origin - v0;

    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(edge1);

    let v = ray_dir.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(qvec) * inv_det;
    if t <= MIN_HIT_DISTANCE {
        return None;
    }

    Some(TriangleHit { t, u, v })
}

/// Interpolate a Vec3 attribute using barycentric coordinates.
pub fn interpolate_vec3(v0: Vec3, v1: Vec3, v2: Vec3, u: f32, v: f32) -> Vec3 {
    let w = 1.0 - u - v;
    v0 * w + v1 * u + v2 * v
}

/// Interpolate a Vec2 attribute (like UVs) using barycentric coordinates.
pub fn interpolate_vec2(v0: Vec2, v1: Vec2, v2: Vec2, u: f32, v: f32) -> Vec2 {
    let w = 1.0 - u - v;
    v0 * w + v1 * u + v2 * v
}

/// Cast a ray against a snapshot and return the closest hit.
///
/// Triangles whose bounds miss the ray segment's bounds are skipped without
/// running the exact test. Among valid hits with `t <= ray.max_distance` the
/// smallest `t` wins; on a tie the lower triangle index is kept.
pub fn raycast_snapshot(snapshot: &GeometrySnapshot, ray: &Ray) -> Option<Intersection> {
    let ray_bounds = ray.bounds();
    let mut closest: Option<(TriangleHit, usize)> = None;
    let mut pruned = 0usize;

    for tri in 0..snapshot.triangle_count() {
        if let Some(bounds) = &ray_bounds {
            if !bounds.overlaps(snapshot.triangle_bounds(tri)) {
                pruned += 1;
                continue;
            }
        }

        let (v0, v1, v2) = snapshot.triangle_positions(tri);
        let Some(hit) = ray_triangle_intersection(ray.origin, ray.direction, v0, v1, v2) else {
            continue;
        };
        if hit.t > ray.max_distance {
            continue;
        }

        let closer = match &closest {
            Some((prev, _)) => hit.t < prev.t,
            None => true,
        };
        if closer {
            closest = Some((hit, tri));
        }
    }

    trace!(
        "raycast_snapshot: {} of {} triangles pruned by bounds",
        pruned,
        snapshot.triangle_count()
    );

    closest.map(|(hit, tri)| Intersection {
        triangle: tri as u32,
        u: hit.u,
        v: hit.v,
        t: hit.t,
        point: ray.at(hit.t),
    })
}
