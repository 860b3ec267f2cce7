//! View transform between screen and world coordinates.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest allowed view scale.
pub const MIN_SCALE: f64 = 0.15;
/// Largest allowed view scale.
pub const MAX_SCALE: f64 = 20.0;
/// Scale multiplier applied per wheel step.
pub const SCALE_STEP: f64 = 1.1;

/// Camera manages the view transform for a workspace.
///
/// The pan offset is expressed in world units and applied before scaling:
/// `screen = (world + offset) * scale`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Current pan offset in world units
    pub offset: Vec2,
    /// Current view scale
    pub scale: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Camera {
    /// Create a camera with no pan and unit scale.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        ((world_point.to_vec2() + self.offset) * self.scale).to_point()
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        (screen_point.to_vec2() / self.scale - self.offset).to_point()
    }

    /// Pan by a drag delta given in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta / self.scale;
    }

    /// Apply one wheel step at the given screen point.
    ///
    /// The world point under the pointer maps to the same screen position
    /// after the scale change.
    pub fn zoom_at(&mut self, screen_point: Point, zoom_in: bool) {
        let step = if zoom_in {
            SCALE_STEP
        } else {
            1.0 / SCALE_STEP
        };

        let before = self.screen_to_world(screen_point);
        self.scale = (self.scale * step).clamp(MIN_SCALE, MAX_SCALE);
        let after = self.screen_to_world(screen_point);

        self.offset -= before - after;
    }

    /// Reset to an unpanned view at the given scale.
    pub fn reset(&mut self, scale: f64) {
        self.offset = Vec2::ZERO;
        self.scale = scale;
    }
}
