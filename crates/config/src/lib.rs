//! Shared configuration for mesh painting
//!
//! This crate holds the recognized options for a painting brush and for the
//! paintable surfaces it writes into. Both structs deserialize from partial
//! documents: any field left out keeps its default.

use serde::{Deserialize, Serialize};

/// Default brush radius in texture pixels
pub const DEFAULT_RADIUS_PX: f32 = 10.0;

/// Default brush color (opaque black)
pub const DEFAULT_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Default world-space proximity radius in meters
pub const DEFAULT_PROXIMITY_RADIUS: f32 = 0.05;

/// Default maximum ray distance in meters
pub const DEFAULT_MAX_RAY_DISTANCE: f32 = 10.0;

/// Default paint texture resolution
pub const DEFAULT_TEXTURE_SIZE: u32 = 1024;

/// Brush configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    /// Dab radius in texture pixels
    pub radius_px: f32,
    /// RGBA color, components in [0, 1]
    pub color: [f32; 4],
    /// Paint whenever the brush tip is within `proximity_radius` of a surface
    pub proximity_paint: bool,
    /// World-space distance (meters) at which the tip counts as touching
    pub proximity_radius: f32,
    /// Maximum ray length (meters) cast from the brush tip
    pub max_ray_distance: f32,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            radius_px: DEFAULT_RADIUS_PX,
            color: DEFAULT_COLOR,
            proximity_paint: true,
            proximity_radius: DEFAULT_PROXIMITY_RADIUS,
            max_ray_distance: DEFAULT_MAX_RAY_DISTANCE,
        }
    }
}

impl BrushConfig {
    /// Create a brush config with the given radius and color
    pub fn new(radius_px: f32, color: [f32; 4]) -> Self {
        Self {
            radius_px,
            color,
            ..Default::default()
        }
    }

    /// Whether a hit at `distance` meters from the tip is close enough to paint.
    ///
    /// The boundary is inclusive. Always false when proximity painting is off.
    pub fn within_proximity(&self, distance: f32) -> bool {
        self.proximity_paint && distance <= self.proximity_radius
    }
}

/// Configuration for a paintable mesh surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Paint texture width in pixels
    pub width: u32,
    /// Paint texture height in pixels
    pub height: u32,
    /// Project onto the local X/Z plane when the mesh carries no UVs
    pub planar_fallback: bool,
    /// Flip V when mapping texture coordinates to raster rows
    pub flip_v: bool,
    /// Clamp interpolated UVs to [0, 1]
    pub clamp_uv: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_TEXTURE_SIZE,
            height: DEFAULT_TEXTURE_SIZE,
            planar_fallback: true,
            flip_v: true,
            clamp_uv: true,
        }
    }
}

impl SurfaceConfig {
    /// Create a surface config with the given texture dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }
}
