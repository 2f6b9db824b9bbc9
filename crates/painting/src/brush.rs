//! Mesh brush - per-frame raycast painting
//!
//! A [`MeshBrush`] is updated once per host tick with the brush tip pose. The
//! whole sequence runs synchronously inside [`MeshBrush::update`]:
//!
//! 1. Cast a world ray from the tip through the [`RaycastProvider`]
//! 2. Identify the nearest struck surface by name
//! 3. Pick a color instead of painting if the name carries a hex token
//! 4. Resolve the texture coordinate in the surface's local space
//! 5. Gate on proximity (or the trigger when proximity painting is off)
//! 6. Let the continuity tracker place dabs and rasterize them
//!
//! Stroke state lives in the brush, so several brushes can paint the same
//! scene without sharing anything mutable.

use glam::{Vec2, Vec3};
use mesh_painting_config::BrushConfig;
use tracing::{debug, info};

use crate::color_pick::{ColorPick, pick_color};
use crate::continuity::{StrokeContinuityTracker, StrokeDecision};
use crate::scene::{RaycastProvider, SceneHit};
use crate::types::SurfaceId;

/// Brush tip pose for one frame, in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushInput {
    /// Tip position; rays start here
    pub tip: Vec3,
    /// Pointing direction (need not be normalized)
    pub direction: Vec3,
    /// Host paint trigger; only consulted when proximity painting is off
    pub trigger: bool,
}

impl BrushInput {
    pub fn new(tip: Vec3, direction: Vec3) -> Self {
        Self {
            tip,
            direction,
            trigger: false,
        }
    }

    pub fn with_trigger(mut self, trigger: bool) -> Self {
        self.trigger = trigger;
        self
    }
}

/// What one frame did
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// No paintable hit; every tracked stroke lost contact
    NoContact,
    /// A surface was hit but the tip is not engaged with it
    OutOfRange { surface: SurfaceId, distance: f32 },
    /// The surface is a palette swatch; the brush color changed
    ColorPicked { surface: SurfaceId, pick: ColorPick },
    /// Dabs were rasterized
    Painted {
        surface: SurfaceId,
        decision: StrokeDecision,
        dabs: usize,
    },
}

/// A painting brush with its own stroke continuity state
pub struct MeshBrush {
    config: BrushConfig,
    tracker: StrokeContinuityTracker,
    /// Reused hit buffer for the provider
    hits: Vec<SceneHit>,
    /// Dab UVs of the last painted frame
    dabs: Vec<Vec2>,
}

impl MeshBrush {
    pub fn new(config: BrushConfig) -> Self {
        Self {
            config,
            tracker: StrokeContinuityTracker::new(),
            hits: Vec::new(),
            dabs: Vec::new(),
        }
    }

    pub fn with_default_config() -> Self {
        Self::new(BrushConfig::default())
    }

    pub fn config(&self) -> &BrushConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: BrushConfig) {
        self.config = config;
    }

    pub fn color(&self) -> [f32; 4] {
        self.config.color
    }

    pub fn set_color(&mut self, color: [f32; 4]) {
        self.config.color = color;
    }

    pub fn set_radius(&mut self, radius_px: f32) {
        self.config.radius_px = radius_px;
    }

    pub fn tracker(&self) -> &StrokeContinuityTracker {
        &self.tracker
    }

    /// Dab UVs rasterized by the most recent frame (empty unless it painted)
    pub fn last_dabs(&self) -> &[Vec2] {
        &self.dabs
    }

    /// Break every stroke, as if the brush lost contact this frame.
    pub fn end_strokes(&mut self) {
        self.tracker.contact_lost_all();
    }

    /// Forget all stroke history.
    pub fn reset(&mut self) {
        self.tracker.clear();
        self.dabs.clear();
    }

    /// Run one frame of painting against `scene`.
    pub fn update<P>(&mut self, input: &BrushInput, scene: &mut P) -> FrameOutcome
    where
        P: RaycastProvider + ?Sized,
    {
        self.dabs.clear();

        scene.raycast(
            input.tip,
            input.direction,
            self.config.max_ray_distance,
            &mut self.hits,
        );
        let Some(hit) = self.hits.first().copied() else {
            return self.lose_contact();
        };
        let Some(surface) = scene.surface(hit.target) else {
            return self.lose_contact();
        };
        let id = SurfaceId::from_name(surface.name);

        if let Some(pick) = pick_color(surface.name) {
            self.tracker.mark_color_pick(id);
            self.config.color = pick.rgba(self.config.color[3]);
            info!("Picked color {} from '{}'", pick.hex, surface.name);
            return FrameOutcome::ColorPicked { surface: id, pick };
        }

        let Some(paint) = surface.paint else {
            return self.lose_contact();
        };

        let local_origin = surface.world_to_local.transform_point3(input.tip);
        let local_direction = surface
            .world_to_local
            .transform_vector3(input.direction.normalize_or_zero());
        let local_max = self.config.max_ray_distance * local_direction.length();

        let Some(uv_hit) = paint.resolve_uv(local_origin, local_direction, local_max) else {
            return self.lose_contact();
        };

        let distance = input.tip.distance(hit.world_position);
        let engaged = if self.config.proximity_paint {
            self.config.within_proximity(distance)
        } else {
            input.trigger
        };
        if !engaged {
            self.tracker.mark_out_of_range(id);
            debug!("MeshBrush::update: surface {:?} out of range at {:.4}", id, distance);
            return FrameOutcome::OutOfRange { surface: id, distance };
        }

        let radius = self.config.radius_px;
        let color = self.config.color;
        let decision = self.tracker.plan(
            id,
            uv_hit.uv,
            uv_hit.vertices,
            paint.canvas_dimensions(),
            radius,
            &mut self.dabs,
        );

        for dab in &self.dabs {
            paint.paint_dab(dab.x, dab.y, radius, color);
        }

        if matches!(decision, StrokeDecision::Start | StrokeDecision::Restart) {
            info!(
                "Stroke started on surface {:?} at uv ({:.3}, {:.3})",
                id, uv_hit.uv.x, uv_hit.uv.y
            );
        }

        FrameOutcome::Painted {
            surface: id,
            decision,
            dabs: self.dabs.len(),
        }
    }

    fn lose_contact(&mut self) -> FrameOutcome {
        self.tracker.contact_lost_all();
        FrameOutcome::NoContact
    }
}
