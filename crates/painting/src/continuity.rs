//! Stroke continuity across frames.
//!
//! Each paintable surface identity carries the UV and triangle of the last dab
//! plus a contact-lost flag. On every frame the tracker decides whether a hit
//! continues the previous stroke (dabs interpolated in UV space) or starts a
//! new one (a single dab), so fast brush motion leaves no gaps while strokes
//! never bridge disjoint regions or stale contact.

use glam::Vec2;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{MIN_STEP_PX, STEP_RADIUS_FACTOR};
use crate::types::SurfaceId;

/// Per-surface stroke state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContinuityState {
    /// UV of the last painted position
    pub last_uv: Option<Vec2>,
    /// Vertex indices of the triangle hit at `last_uv`
    pub last_triangle: Option<[u32; 3]>,
    /// Set when the brush disengaged since the last dab
    pub contact_lost: bool,
}

impl ContinuityState {
    fn clear_stroke(&mut self) {
        self.last_uv = None;
        self.last_triangle = None;
    }
}

/// Stroke phase of a surface identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrokePhase {
    Idle,
    Painting,
}

/// How the dabs of one frame were placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrokeDecision {
    /// First contact with a surface that has no stroke history
    Start,
    /// First contact after the contact-lost flag was set
    Restart,
    /// Hit triangle does not touch the previous one; single dab
    Disjoint,
    /// Interpolated from the previous UV; `steps + 1` dabs
    Continue { steps: u32 },
}

/// Tracks stroke continuity for every surface one brush touches.
#[derive(Debug, Default)]
pub struct StrokeContinuityTracker {
    states: FxHashMap<SurfaceId, ContinuityState>,
}

impl StrokeContinuityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, id: SurfaceId) -> Option<&ContinuityState> {
        self.states.get(&id)
    }

    pub fn phase(&self, id: SurfaceId) -> StrokePhase {
        match self.states.get(&id) {
            Some(state) if state.last_uv.is_some() && !state.contact_lost => StrokePhase::Painting,
            _ => StrokePhase::Idle,
        }
    }

    /// Number of tracked surface identities
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Flag every tracked identity as having lost contact.
    ///
    /// Used when a frame produces no paintable hit at all.
    pub fn contact_lost_all(&mut self) {
        for state in self.states.values_mut() {
            state.contact_lost = true;
        }
    }

    /// The brush left proximity of `id`: end its stroke.
    pub fn mark_out_of_range(&mut self, id: SurfaceId) {
        let state = self.states.entry(id).or_default();
        state.contact_lost = true;
        state.clear_stroke();
    }

    /// A color was picked from `id`: end its stroke without painting.
    pub fn mark_color_pick(&mut self, id: SurfaceId) {
        self.mark_out_of_range(id);
    }

    /// Drop all state for `id`.
    pub fn forget(&mut self, id: SurfaceId) {
        self.states.remove(&id);
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Decide dab placement for an in-range hit and record it as the new last
    /// position.
    ///
    /// Dab UVs are written into `dabs`, which is cleared first.
    ///
    /// # Arguments
    /// * `uv` - Resolved texture coordinate of the hit
    /// * `triangle` - Vertex indices of the hit triangle
    /// * `canvas` - Raster dimensions used to measure UV distance in pixels
    /// * `radius_px` - Brush radius in pixels
    pub fn plan(
        &mut self,
        id: SurfaceId,
        uv: Vec2,
        triangle: [u32; 3],
        canvas: (u32, u32),
        radius_px: f32,
        dabs: &mut Vec<Vec2>,
    ) -> StrokeDecision {
        dabs.clear();
        let state = self.states.entry(id).or_default();

        let decision = if state.contact_lost {
            // Never stitch to a stroke from before the contact loss
            state.clear_stroke();
            state.contact_lost = false;
            dabs.push(uv);
            StrokeDecision::Restart
        } else {
            match (state.last_uv, state.last_triangle) {
                (Some(last_uv), Some(last_triangle)) if triangles_adjacent(last_triangle, triangle) => {
                    let steps = interpolation_steps(last_uv, uv, canvas, radius_px);
                    for i in 0..=steps {
                        dabs.push(last_uv.lerp(uv, i as f32 / steps as f32));
                    }
                    StrokeDecision::Continue { steps }
                }
                (Some(_), Some(_)) => {
                    dabs.push(uv);
                    StrokeDecision::Disjoint
                }
                _ => {
                    dabs.push(uv);
                    StrokeDecision::Start
                }
            }
        };

        state.last_uv = Some(uv);
        state.last_triangle = Some(triangle);

        debug!(
            "StrokeContinuityTracker::plan: surface={:?} {:?}, {} dabs",
            id,
            decision,
            dabs.len()
        );
        decision
    }
}

/// Two triangles are adjacent when they share at least one vertex index.
///
/// Triangles on separate UV islands that share a 3D vertex count as adjacent.
pub fn triangles_adjacent(a: [u32; 3], b: [u32; 3]) -> bool {
    a.iter().any(|index| b.contains(index))
}

/// Number of interpolation segments between two UVs.
///
/// The step is half the brush radius in pixels, at least one pixel.
pub fn interpolation_steps(from: Vec2, to: Vec2, canvas: (u32, u32), radius_px: f32) -> u32 {
    let delta = (to - from) * Vec2::new(canvas.0 as f32, canvas.1 as f32);
    let distance = delta.length();
    let step = (radius_px * STEP_RADIUS_FACTOR).floor().max(MIN_STEP_PX);
    let steps = (distance / step).ceil();

    if steps.is_finite() && steps >= 1.0 {
        steps as u32
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: (u32, u32) = (100, 100);

    fn surface(name: &str) -> SurfaceId {
        SurfaceId::from_name(name)
    }

    #[test]
    fn test_adjacency() {
        assert!(triangles_adjacent([0, 1, 2], [2, 5, 6]));
        assert!(!triangles_adjacent([0, 1, 2], [7, 8, 9]));
        assert!(triangles_adjacent([0, 1, 2], [0, 1, 2]));
    }

    #[test]
    fn test_interpolation_steps() {
        // 50 px at radius 10 -> step 5 -> 10 steps
        assert_eq!(interpolation_steps(Vec2::ZERO, Vec2::new(0.5, 0.0), CANVAS, 10.0), 10);
        // Partial step rounds up
        assert_eq!(interpolation_steps(Vec2::ZERO, Vec2::new(0.51, 0.0), CANVAS, 10.0), 11);
        // Tiny radius clamps the step to one pixel: 6.25 px -> 7 steps
        assert_eq!(interpolation_steps(Vec2::ZERO, Vec2::new(0.0625, 0.0), CANVAS, 0.5), 7);
        // No movement still yields one step
        assert_eq!(interpolation_steps(Vec2::ONE, Vec2::ONE, CANVAS, 10.0), 1);
    }

    #[test]
    fn test_first_hit_starts_stroke() {
        let mut tracker = StrokeContinuityTracker::new();
        let mut dabs = Vec::new();
        let id = surface("Canvas");

        assert_eq!(tracker.phase(id), StrokePhase::Idle);
        let decision = tracker.plan(id, Vec2::splat(0.5), [0, 1, 2], CANVAS, 10.0, &mut dabs);

        assert_eq!(decision, StrokeDecision::Start);
        assert_eq!(dabs, vec![Vec2::splat(0.5)]);
        assert_eq!(tracker.phase(id), StrokePhase::Painting);
    }

    #[test]
    fn test_adjacent_hit_interpolates_inclusive() {
        let mut tracker = StrokeContinuityTracker::new();
        let mut dabs = Vec::new();
        let id = surface("Canvas");

        tracker.plan(id, Vec2::new(0.25, 0.5), [0, 1, 2], CANVAS, 10.0, &mut dabs);
        let decision = tracker.plan(id, Vec2::new(0.5, 0.5), [2, 5, 6], CANVAS, 10.0, &mut dabs);

        // 25 px / 5 px step
        assert_eq!(decision, StrokeDecision::Continue { steps: 5 });
        assert_eq!(dabs.len(), 6);
        assert!(dabs[0].abs_diff_eq(Vec2::new(0.25, 0.5), 1e-6));
        assert!(dabs[1].abs_diff_eq(Vec2::new(0.3, 0.5), 1e-6));
        assert!(dabs[5].abs_diff_eq(Vec2::new(0.5, 0.5), 1e-6));
    }

    #[test]
    fn test_disjoint_hit_is_single_dab() {
        let mut tracker = StrokeContinuityTracker::new();
        let mut dabs = Vec::new();
        let id = surface("Canvas");

        tracker.plan(id, Vec2::new(0.1, 0.1), [0, 1, 2], CANVAS, 10.0, &mut dabs);
        let decision = tracker.plan(id, Vec2::new(0.9, 0.9), [7, 8, 9], CANVAS, 10.0, &mut dabs);

        assert_eq!(decision, StrokeDecision::Disjoint);
        assert_eq!(dabs, vec![Vec2::new(0.9, 0.9)]);

        // The disjoint hit becomes the new anchor
        let state = tracker.state(id).unwrap();
        assert_eq!(state.last_triangle, Some([7, 8, 9]));
        assert_eq!(tracker.phase(id), StrokePhase::Painting);
    }

    #[test]
    fn test_uv_seam_connects_through_shared_vertex() {
        // Two triangles share vertex 4 in 3D but sit on opposite UV islands.
        // Adjacency is index based, so the stroke is interpolated across the seam.
        let mut tracker = StrokeContinuityTracker::new();
        let mut dabs = Vec::new();
        let id = surface("Seamed");

        tracker.plan(id, Vec2::new(0.0625, 0.5), [3, 4, 5], CANVAS, 10.0, &mut dabs);
        let decision = tracker.plan(id, Vec2::new(0.9375, 0.5), [4, 10, 11], CANVAS, 10.0, &mut dabs);

        assert_eq!(decision, StrokeDecision::Continue { steps: 18 });
        assert_eq!(dabs.len(), 19);
        assert!(dabs[9].abs_diff_eq(Vec2::new(0.5, 0.5), 1e-5));
    }

    #[test]
    fn test_contact_lost_restarts_with_single_dab() {
        let mut tracker = StrokeContinuityTracker::new();
        let mut dabs = Vec::new();
        let id = surface("Canvas");

        tracker.plan(id, Vec2::new(0.1, 0.1), [0, 1, 2], CANVAS, 10.0, &mut dabs);
        tracker.contact_lost_all();
        assert_eq!(tracker.phase(id), StrokePhase::Idle);

        // Adjacent triangle, but contact was lost: no interpolation
        let decision = tracker.plan(id, Vec2::new(0.375, 0.125), [1, 2, 3], CANVAS, 10.0, &mut dabs);
        assert_eq!(decision, StrokeDecision::Restart);
        assert_eq!(dabs, vec![Vec2::new(0.375, 0.125)]);

        let state = tracker.state(id).unwrap();
        assert!(!state.contact_lost);
        assert_eq!(state.last_uv, Some(Vec2::new(0.375, 0.125)));

        // Stroke continues normally afterwards: 12.5 px -> 3 steps
        let decision = tracker.plan(id, Vec2::new(0.5, 0.125), [2, 3, 4], CANVAS, 10.0, &mut dabs);
        assert_eq!(decision, StrokeDecision::Continue { steps: 3 });
    }

    #[test]
    fn test_out_of_range_clears_only_that_surface() {
        let mut tracker = StrokeContinuityTracker::new();
        let mut dabs = Vec::new();
        let a = surface("A");
        let b = surface("B");

        tracker.plan(a, Vec2::ZERO, [0, 1, 2], CANVAS, 10.0, &mut dabs);
        tracker.plan(b, Vec2::ZERO, [0, 1, 2], CANVAS, 10.0, &mut dabs);
        tracker.mark_out_of_range(a);

        let state = tracker.state(a).unwrap();
        assert!(state.contact_lost);
        assert!(state.last_uv.is_none() && state.last_triangle.is_none());
        assert_eq!(tracker.phase(a), StrokePhase::Idle);
        assert_eq!(tracker.phase(b), StrokePhase::Painting);
    }

    #[test]
    fn test_color_pick_ends_stroke() {
        let mut tracker = StrokeContinuityTracker::new();
        let mut dabs = Vec::new();
        let id = surface("Palette_#ff0000");

        tracker.mark_color_pick(id);
        assert!(tracker.state(id).unwrap().contact_lost);

        let decision = tracker.plan(id, Vec2::ZERO, [0, 1, 2], CANVAS, 10.0, &mut dabs);
        assert_eq!(decision, StrokeDecision::Restart);
    }

    #[test]
    fn test_forget_and_clear() {
        let mut tracker = StrokeContinuityTracker::new();
        let mut dabs = Vec::new();
        tracker.plan(surface("A"), Vec2::ZERO, [0, 1, 2], CANVAS, 10.0, &mut dabs);
        tracker.plan(surface("B"), Vec2::ZERO, [0, 1, 2], CANVAS, 10.0, &mut dabs);
        assert_eq!(tracker.len(), 2);

        tracker.forget(surface("A"));
        assert_eq!(tracker.len(), 1);
        assert!(tracker.state(surface("A")).is_none());

        tracker.clear();
        assert!(tracker.is_empty());
    }
}
