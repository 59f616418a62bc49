//! Viewport mapping between screen and plan coordinates.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Visible window onto the plan.
///
/// `offset` is the plan coordinate shown at the screen origin and `scale` is
/// the number of plan units per screen unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub offset: Vec2,
    pub scale: f64,
    pub min_scale: f64,
    pub max_scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
            min_scale: 0.1,
            max_scale: 10.0,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Screen to plan transform.
    pub fn to_plan_transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    /// Plan to screen transform.
    pub fn to_screen_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.offset)
    }

    pub fn screen_to_plan(&self, screen_point: Point) -> Point {
        self.to_plan_transform() * screen_point
    }

    pub fn plan_to_screen(&self, plan_point: Point) -> Point {
        self.to_screen_transform() * plan_point
    }

    /// Convert a screen-space length to plan units.
    pub fn plan_length(&self, screen_length: f64) -> f64 {
        screen_length * self.scale
    }

    /// Drag the content by a screen-space delta.
    pub fn pan(&mut self, screen_delta: Vec2) {
        self.offset -= screen_delta * self.scale;
    }

    /// Change the scale, keeping `screen_point` over the same plan point.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        if factor <= 0.0 {
            return;
        }
        let new_scale = (self.scale / factor).clamp(self.min_scale, self.max_scale);
        if (new_scale - self.scale).abs() < f64::EPSILON {
            return;
        }
        let anchor = self.screen_to_plan(screen_point);
        self.scale = new_scale;
        self.offset = anchor.to_vec2() - screen_point.to_vec2() * self.scale;
    }
}
