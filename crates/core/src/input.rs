//! Per-tick command snapshot consumed by the simulation.
//!
//! The input adapter builds one [`TickInput`] per tick; the simulation never
//! talks to the windowing system directly.

use serde::{Deserialize, Serialize};

/// Kind of pointer click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickKind {
    /// Place the selected block.
    Primary,
    /// Mine the targeted block.
    Secondary,
}

/// Pointer interaction in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerAction {
    /// World-space x of the pointer.
    pub x: f32,
    /// World-space y of the pointer.
    pub y: f32,
    /// Which click was issued.
    pub click: ClickKind,
}

impl PointerAction {
    /// Pointer action at a world position.
    pub fn new(x: f32, y: f32, click: ClickKind) -> Self {
        Self { x, y, click }
    }
}

/// Immutable intents for a single tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Move left is held.
    pub move_left: bool,
    /// Move right is held.
    pub move_right: bool,
    /// Jump was pressed this tick (edge-triggered).
    pub jump: bool,
    /// Pointer click issued this tick.
    pub pointer: Option<PointerAction>,
    /// Hotbar slot to select (0-based).
    pub select_slot: Option<usize>,
    /// Toggle the crafting menu.
    pub toggle_crafting: bool,
    /// Recipe to craft (1-based menu index).
    pub craft_recipe: Option<usize>,
}

impl TickInput {
    /// Input with no intents.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Horizontal intent as -1, 0 or 1.
    pub fn horizontal_axis(&self) -> f32 {
        match (self.move_left, self.move_right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}
