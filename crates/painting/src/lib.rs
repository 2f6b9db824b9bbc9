//! Mesh painting - raycast brush strokes onto textured meshes
//!
//! This crate provides the pieces of a 3D painting brush:
//! - [`geometry`] - Immutable mesh snapshot shared across surfaces
//! - [`raycast`] - Möller–Trumbore ray casting with AABB pruning
//! - [`uv`] - Texture coordinate resolution with a planar fallback
//! - [`color_pick`] - Palette swatches named with a hex color token
//! - [`continuity`] - Per-surface stroke continuity and dab interpolation
//! - [`surface`] - CPU RGBA f32 raster
//! - [`mesh_surface`] - Paint capability over a mesh and its raster
//! - [`scene`] - Host raycasting seam and a flat mesh scene
//! - [`brush`] - Per-frame brush driver

pub mod brush;
pub mod color_pick;
pub mod constants;
pub mod continuity;
pub mod error;
pub mod geometry;
pub mod mesh_surface;
pub mod raycast;
pub mod scene;
pub mod surface;
pub mod types;
pub mod uv;

pub use brush::{BrushInput, FrameOutcome, MeshBrush};
pub use color_pick::{ColorPick, pick_color};
pub use constants::*;
pub use continuity::{ContinuityState, StrokeContinuityTracker, StrokeDecision, StrokePhase};
pub use error::{GeometryError, UvError};
pub use geometry::{GeometrySnapshot, MeshGeometryCache, SurfaceSample};
pub use mesh_surface::{MeshPaintSurface, PaintSurface, TextureBinding};
pub use raycast::{ray_triangle_intersection, raycast_snapshot};
pub use scene::{MeshScene, RaycastProvider, SceneHit, SceneObject, SurfaceRef, TargetId};
pub use surface::CpuSurface;
pub use types::*;
pub use uv::UvResolver;

pub use mesh_painting_config::{BrushConfig, SurfaceConfig};
