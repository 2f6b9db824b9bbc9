//! Scene-level raycasting
//!
//! The brush does not own a scene graph. It asks a [`RaycastProvider`] for the
//! hits along a world-space ray and for the struck surface's name, transform
//! and paint capability. [`MeshScene`] is a flat provider over named meshes,
//! enough for tools and tests that have no engine underneath.

use std::sync::Arc;

use glam::{Affine3A, Vec3};

use crate::geometry::MeshGeometryCache;
use crate::mesh_surface::{MeshPaintSurface, PaintSurface};
use crate::types::Ray;

/// Opaque handle to a surface inside a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(pub u32);

/// One hit along a world-space ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneHit {
    pub target: TargetId,
    pub world_position: Vec3,
    /// World distance from the ray origin
    pub distance: f32,
}

/// Borrowed view of a struck surface
pub struct SurfaceRef<'a> {
    /// Display name; hashed into the surface identity
    pub name: &'a str,
    /// Transform from world space into the surface's local space
    pub world_to_local: Affine3A,
    /// `None` for surfaces that can be hit but not painted
    pub paint: Option<&'a mut dyn PaintSurface>,
}

/// Host-side raycasting against the scene
pub trait RaycastProvider {
    /// Fill `hits` with every hit along the ray, nearest first.
    ///
    /// `hits` is owned by the caller and reused across frames; implementations
    /// clear it before writing.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, hits: &mut Vec<SceneHit>);

    fn surface(&mut self, target: TargetId) -> Option<SurfaceRef<'_>>;
}

/// A named mesh placed in the scene
pub struct SceneObject {
    pub name: String,
    local_to_world: Affine3A,
    world_to_local: Affine3A,
    geometry: Arc<MeshGeometryCache>,
    pub paint: Option<MeshPaintSurface>,
}

impl SceneObject {
    pub fn local_to_world(&self) -> Affine3A {
        self.local_to_world
    }

    pub fn world_to_local(&self) -> Affine3A {
        self.world_to_local
    }

    pub fn geometry(&self) -> &Arc<MeshGeometryCache> {
        &self.geometry
    }
}

/// Flat list of meshes with brute-force raycasting
#[derive(Default)]
pub struct MeshScene {
    objects: Vec<SceneObject>,
}

impl MeshScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mesh that can be hit but not painted.
    pub fn add_mesh(
        &mut self,
        name: impl Into<String>,
        local_to_world: Affine3A,
        geometry: Arc<MeshGeometryCache>,
    ) -> TargetId {
        self.push(name.into(), local_to_world, geometry, None)
    }

    /// Add a paintable mesh; its geometry comes from the surface.
    pub fn add_paintable(
        &mut self,
        name: impl Into<String>,
        local_to_world: Affine3A,
        surface: MeshPaintSurface,
    ) -> TargetId {
        let geometry = Arc::clone(surface.geometry());
        self.push(name.into(), local_to_world, geometry, Some(surface))
    }

    fn push(
        &mut self,
        name: String,
        local_to_world: Affine3A,
        geometry: Arc<MeshGeometryCache>,
        paint: Option<MeshPaintSurface>,
    ) -> TargetId {
        let id = TargetId(self.objects.len() as u32);
        self.objects.push(SceneObject {
            name,
            local_to_world,
            world_to_local: local_to_world.inverse(),
            geometry,
            paint,
        });
        id
    }

    pub fn get(&self, target: TargetId) -> Option<&SceneObject> {
        self.objects.get(target.0 as usize)
    }

    pub fn get_mut(&mut self, target: TargetId) -> Option<&mut SceneObject> {
        self.objects.get_mut(target.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl RaycastProvider for MeshScene {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, hits: &mut Vec<SceneHit>) {
        hits.clear();
        let direction = direction.normalize_or_zero();

        for (index, object) in self.objects.iter().enumerate() {
            let local_dir = object.world_to_local.transform_vector3(direction);
            let Some(ray) = Ray::new(
                object.world_to_local.transform_point3(origin),
                local_dir,
                max_distance * local_dir.length(),
            ) else {
                continue;
            };
            let Some(hit) = object.geometry.raycast(&ray) else {
                continue;
            };

            let world_position = object.local_to_world.transform_point3(hit.point);
            hits.push(SceneHit {
                target: TargetId(index as u32),
                world_position,
                distance: origin.distance(world_position),
            });
        }

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    }

    fn surface(&mut self, target: TargetId) -> Option<SurfaceRef<'_>> {
        let object = self.objects.get_mut(target.0 as usize)?;
        Some(SurfaceRef {
            name: &object.name,
            world_to_local: object.world_to_local,
            paint: object.paint.as_mut().map(|p| p as &mut dyn PaintSurface),
        })
    }
}
