//! Read-only views of a session for renderers and reports.

use glam::Vec2;
use serde::Serialize;
use tilecraft_core::{BlockKind, ItemId, SimTick};
use tilecraft_world::{InventoryLedger, MenuState, Recipe, TileGrid, TilePos, WorldRect};

/// Borrowed snapshot of everything a renderer draws.
#[derive(Debug, Clone, Copy)]
pub struct RenderView<'a> {
    /// Tick the view was taken after.
    pub tick: SimTick,
    /// Block grid.
    pub grid: &'a TileGrid,
    /// Top-left of the visible area in world space.
    pub camera_offset: Vec2,
    /// Visible area size.
    pub viewport: Vec2,
    /// Player rectangle.
    pub body: WorldRect,
    /// Current health.
    pub health: u32,
    /// Health on respawn.
    pub max_health: u32,
    /// Held items.
    pub ledger: &'a InventoryLedger,
    /// Hotbar slots.
    pub hotbar: &'a [ItemId],
    /// Selected hotbar slot.
    pub selected_slot: usize,
    /// Crafting menu state.
    pub menu: MenuState,
    /// Recipes in menu order.
    pub recipes: &'a [Recipe],
}

impl<'a> RenderView<'a> {
    /// Item in the selected slot, if the hotbar has one.
    pub fn selected_item(&self) -> Option<ItemId> {
        self.hotbar.get(self.selected_slot).copied()
    }

    /// Non-empty cells inside the viewport plus a one-tile margin.
    pub fn visible_cells(&self) -> impl Iterator<Item = (TilePos, BlockKind)> + 'a {
        let grid = self.grid;
        let ts = grid.tile_size();
        let min = (self.camera_offset / ts).floor() - Vec2::ONE;
        let max = ((self.camera_offset + self.viewport) / ts).ceil() + Vec2::ONE;
        let cols = (min.x.max(0.0) as i32)..(max.x.min(grid.width() as f32) as i32);
        let rows = (min.y.max(0.0) as i32)..(max.y.min(grid.height() as f32) as i32);

        rows.flat_map(move |row| cols.clone().map(move |col| TilePos::new(col, row)))
            .filter_map(move |pos| {
                let kind = grid.get(pos.col, pos.row);
                kind.is_solid().then_some((pos, kind))
            })
    }
}

/// Owned end-of-run summary written by headless runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    /// Ticks simulated.
    pub ticks: u64,
    /// World seed.
    pub seed: u64,
    /// Body top-left corner.
    pub position: [f32; 2],
    /// Body health.
    pub health: u32,
    /// Jumps left.
    pub jumps_remaining: u8,
    /// Whether the body is standing on something.
    pub resting: bool,
    /// Camera offset.
    pub camera_offset: [f32; 2],
    /// Crafting menu state.
    pub menu: MenuState,
    /// Selected hotbar slot.
    pub selected_slot: usize,
    /// Held items.
    pub inventory: InventoryLedger,
    /// Count of solid cells in the grid.
    pub solid_cells: usize,
}
