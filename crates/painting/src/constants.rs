/// Determinant magnitude below which a ray is treated as parallel to a triangle.
pub const PARALLEL_EPSILON: f32 = 1e-8;

/// Minimum hit distance along a ray; rejects self-intersections at the origin.
pub const MIN_HIT_DISTANCE: f32 = 1e-6;

/// Interpolation step as a fraction of the brush radius in pixels.
pub const STEP_RADIUS_FACTOR: f32 = 0.5;

/// Smallest interpolation step in pixels.
pub const MIN_STEP_PX: f32 = 1.0;
