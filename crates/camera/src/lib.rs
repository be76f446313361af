#![warn(missing_docs)]
//! Side-view follow camera for 2D tile worlds.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Visible area in world units.
    pub viewport: [f32; 2],
    /// Fraction of the remaining distance covered per tick, in `(0, 1]`.
    pub smoothing: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            viewport: [960.0, 640.0],
            smoothing: 0.1,
        }
    }
}

/// Camera whose offset eases toward a target and stays inside the world.
#[derive(Debug, Clone)]
pub struct Camera2D {
    /// Top-left corner of the view in world space.
    pub offset: Vec2,
    viewport: Vec2,
    smoothing: f32,
}

impl Default for Camera2D {
    fn default() -> Self {
        Self::new(&CameraSettings::default())
    }
}

impl Camera2D {
    /// Create a camera at the world origin.
    ///
    /// Smoothing outside `(0, 1]` is clamped into range.
    pub fn new(settings: &CameraSettings) -> Self {
        let mut smoothing = settings.smoothing;
        if !(smoothing > 0.0 && smoothing <= 1.0) {
            let clamped = if smoothing > 1.0 { 1.0 } else { 0.01 };
            warn!(smoothing, clamped, "camera smoothing outside (0, 1]; clamping");
            smoothing = clamped;
        }
        Self {
            offset: Vec2::ZERO,
            viewport: Vec2::from(settings.viewport).max(Vec2::ZERO),
            smoothing,
        }
    }

    /// Visible area in world units.
    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Smoothing factor in use.
    pub fn smoothing(&self) -> f32 {
        self.smoothing
    }

    /// Update the visible area (call when the window resizes).
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height).max(Vec2::ZERO);
    }

    /// Largest allowed offset per axis; zero where the world is smaller than the view.
    pub fn max_offset(&self, world_size: Vec2) -> Vec2 {
        (world_size - self.viewport).max(Vec2::ZERO)
    }

    /// Offset that would center `target`, clamped to the world.
    pub fn target_offset(&self, target: Vec2, world_size: Vec2) -> Vec2 {
        (target - self.viewport * 0.5).clamp(Vec2::ZERO, self.max_offset(world_size))
    }

    /// Ease toward centering `target` by one tick.
    pub fn follow(&mut self, target: Vec2, world_size: Vec2) {
        let goal = self.target_offset(target, world_size);
        self.offset += (goal - self.offset) * self.smoothing;
        self.offset = self.offset.clamp(Vec2::ZERO, self.max_offset(world_size));
    }

    /// Jump straight to centering `target`.
    pub fn snap_to(&mut self, target: Vec2, world_size: Vec2) {
        self.offset = self.target_offset(target, world_size);
    }

    /// Convert a screen-space point to world space.
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.offset
    }

    /// Convert a world-space point to screen space.
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.offset
    }
}
