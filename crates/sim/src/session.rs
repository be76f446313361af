//! The simulation session: owns the world state and runs one tick at a time.

use crate::config::SessionConfig;
use crate::event::{RespawnReason, SimEvent, TickReport};
use crate::view::{RenderView, SessionSummary};
use anyhow::{Context, Result};
use glam::Vec2;
use tilecraft_camera::Camera2D;
use tilecraft_core::{cell_hash, scoped_rng, ItemId, PointerAction, SimTick, TickInput};
use tilecraft_physics::KinematicBody;
use tilecraft_world::{
    CraftFailure, CraftingCatalog, CraftingMenu, InteractionController, InteractionOutcome,
    Interactor, InventoryLedger, MenuState, TerrainGenerator, TileGrid, WorldRect,
    DEFAULT_TILE_SIZE,
};
use tracing::{debug, info, instrument, warn};

/// A single-player world and everything acting on it.
pub struct Session {
    config: SessionConfig,
    grid: TileGrid,
    ledger: InventoryLedger,
    catalog: CraftingCatalog,
    menu: CraftingMenu,
    body: KinematicBody,
    camera: Camera2D,
    interaction: InteractionController,
    selected_slot: usize,
    current_tick: SimTick,
}

impl Session {
    /// Build a session over generated terrain.
    ///
    /// Loads the recipe file when one is configured; a bad file is an error.
    pub fn generate(config: SessionConfig) -> Result<Self> {
        let catalog = match &config.recipes {
            Some(path) => CraftingCatalog::load_from_file(path)
                .with_context(|| format!("Failed to load recipes from {}", path.display()))?,
            None => CraftingCatalog::with_defaults(),
        };

        let mut tile_size = config.world.tile_size;
        if !(tile_size.is_finite() && tile_size > 0.0) {
            warn!(tile_size, "invalid tile size; using default");
            tile_size = DEFAULT_TILE_SIZE;
        }
        let grid = TerrainGenerator::new(config.world.seed, config.world.terrain.clone())
            .generate(tile_size);

        Ok(Self::new(config, grid, catalog))
    }

    /// Build a session over an existing grid.
    pub fn new(config: SessionConfig, grid: TileGrid, catalog: CraftingCatalog) -> Self {
        let size = Vec2::from(config.body.size);
        let spawn = match config.world.spawn {
            Some(spawn) => clear_spawn_at(&grid, Vec2::from(spawn), size),
            None => surface_spawn(&grid, size),
        };
        let body = KinematicBody::spawn(spawn, &config.body);

        let mut camera = Camera2D::new(&config.camera);
        camera.snap_to(body.center(), grid.pixel_size());

        let interaction = InteractionController::new(&config.interaction, grid.tile_size());

        info!(
            seed = config.world.seed,
            width = grid.width(),
            height = grid.height(),
            recipes = catalog.len(),
            spawn_x = spawn.x,
            spawn_y = spawn.y,
            "session started"
        );

        Self {
            ledger: config.starting_inventory.clone(),
            config,
            grid,
            catalog,
            menu: CraftingMenu::new(),
            body,
            camera,
            interaction,
            selected_slot: 0,
            current_tick: SimTick::ZERO,
        }
    }

    /// Run a single deterministic tick.
    ///
    /// Rejected commands are logged and dropped; they never fail the tick.
    #[instrument(skip(self, input), fields(tick = self.current_tick.0))]
    pub fn tick(&mut self, input: &TickInput) -> TickReport {
        let mut events = Vec::new();

        if let Some(slot) = input.select_slot {
            self.select_slot(slot, &mut events);
        }
        if input.toggle_crafting {
            self.toggle_crafting(&mut events);
        }
        if let Some(index) = input.craft_recipe {
            self.craft(index, &mut events);
        }

        let outcome = self.body.step(&self.grid, input);
        if let Some(landing) = outcome.landing {
            events.push(SimEvent::Landed {
                distance: landing.distance,
            });
            if landing.damage > 0 {
                events.push(SimEvent::Damaged {
                    amount: landing.damage,
                    health: self.body.health(),
                });
            }
        }

        let respawn = if self.body.is_dead() {
            Some(RespawnReason::Died)
        } else if self.body.position().y > self.grid.pixel_size().y {
            Some(RespawnReason::FellOutOfWorld)
        } else {
            None
        };
        if let Some(reason) = respawn {
            let at = clear_spawn_at(&self.grid, self.body.spawn_point(), self.body.size());
            info!(?reason, x = at.x, y = at.y, "respawning");
            self.body.respawn_at(at);
            self.camera.snap_to(self.body.center(), self.grid.pixel_size());
            events.push(SimEvent::Respawned { reason });
        } else {
            self.camera.follow(self.body.center(), self.grid.pixel_size());
        }

        if let Some(action) = input.pointer {
            self.interact(action, &mut events);
        }

        let report = TickReport {
            tick: self.current_tick,
            events,
        };
        self.current_tick = self.current_tick.advance(1);
        report
    }

    fn select_slot(&mut self, slot: usize, events: &mut Vec<SimEvent>) {
        match self.config.hotbar.get(slot) {
            Some(&item) => {
                self.selected_slot = slot;
                events.push(SimEvent::SlotSelected { slot, item });
            }
            None => debug!(slot, slots = self.config.hotbar.len(), "hotbar slot out of range"),
        }
    }

    fn toggle_crafting(&mut self, events: &mut Vec<SimEvent>) {
        match self.menu.toggle(&self.ledger, &self.config.crafting) {
            Ok(MenuState::Open) => events.push(SimEvent::MenuOpened),
            Ok(MenuState::Closed) => events.push(SimEvent::MenuClosed),
            Err(rejection) => debug!(%rejection, "crafting menu stayed closed"),
        }
    }

    fn craft(&mut self, index: usize, events: &mut Vec<SimEvent>) {
        match self.menu.select(index, &self.catalog, &mut self.ledger) {
            Ok(crafted) => {
                events.push(SimEvent::Crafted {
                    recipe: crafted.recipe,
                    output: crafted.output,
                });
                events.push(SimEvent::MenuClosed);
            }
            Err(CraftFailure::Deficient(deficiency)) => {
                events.push(SimEvent::CraftFailed {
                    recipe: deficiency.recipe,
                    missing: deficiency.missing,
                });
                events.push(SimEvent::MenuClosed);
            }
            Err(CraftFailure::Ignored(rejection)) => {
                debug!(index, %rejection, "recipe selection ignored");
            }
        }
    }

    fn interact(&mut self, action: PointerAction, events: &mut Vec<SimEvent>) {
        let target = self.grid.tile_at_world(Vec2::new(action.x, action.y));
        let mut rng = scoped_rng(
            self.config.world.seed,
            cell_hash(target.col, target.row),
            self.current_tick,
        );
        let who = Interactor {
            body: self.body.rect(),
            selected: self.selected_item(),
        };

        match self
            .interaction
            .interact(&mut self.grid, &mut self.ledger, &who, action, &mut rng)
        {
            Ok(InteractionOutcome::Mined { pos, kind, bonus }) => events.push(SimEvent::Mined {
                pos,
                block: kind,
                bonus,
            }),
            Ok(InteractionOutcome::Placed { pos, kind }) => {
                events.push(SimEvent::Placed { pos, block: kind })
            }
            Err(rejection) => debug!(
                x = action.x,
                y = action.y,
                click = ?action.click,
                %rejection,
                "interaction rejected"
            ),
        }
    }

    /// Read-only view for rendering.
    pub fn view(&self) -> RenderView<'_> {
        RenderView {
            tick: self.current_tick,
            grid: &self.grid,
            camera_offset: self.camera.offset,
            viewport: self.camera.viewport(),
            body: self.body.rect(),
            health: self.body.health(),
            max_health: self.body.max_health(),
            ledger: &self.ledger,
            hotbar: &self.config.hotbar,
            selected_slot: self.selected_slot,
            menu: self.menu.state(),
            recipes: self.catalog.recipes(),
        }
    }

    /// Owned summary for reports.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            ticks: self.current_tick.0,
            seed: self.config.world.seed,
            position: self.body.position().to_array(),
            health: self.body.health(),
            jumps_remaining: self.body.jumps_remaining(),
            resting: self.body.is_resting(),
            camera_offset: self.camera.offset.to_array(),
            menu: self.menu.state(),
            selected_slot: self.selected_slot,
            inventory: self.ledger.clone(),
            solid_cells: self
                .grid
                .rows()
                .flatten()
                .filter(|kind| kind.is_solid())
                .count(),
        }
    }

    /// Next tick to be simulated.
    pub fn current_tick(&self) -> SimTick {
        self.current_tick
    }

    /// Item in the selected hotbar slot.
    pub fn selected_item(&self) -> Option<ItemId> {
        self.config.hotbar.get(self.selected_slot).copied()
    }

    /// Block grid.
    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Held items.
    pub fn ledger(&self) -> &InventoryLedger {
        &self.ledger
    }

    /// Player body.
    pub fn body(&self) -> &KinematicBody {
        &self.body
    }

    /// Follow camera.
    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    /// Whether the crafting menu is open.
    pub fn crafting_open(&self) -> bool {
        self.menu.is_open()
    }

    /// Configuration the session was built from.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

/// Spawn point centered on the middle column, half a tile above its surface.
/// `at`, raised a tile at a time until a body of `size` there overlaps nothing.
fn clear_spawn_at(grid: &TileGrid, mut at: Vec2, size: Vec2) -> Vec2 {
    let ts = grid.tile_size();
    for _ in 0..=grid.height() + 1 {
        if !grid.overlaps_solid(&WorldRect::from_origin_size(at, size)) {
            break;
        }
        at.y -= ts;
    }
    at
}

fn surface_spawn(grid: &TileGrid, size: Vec2) -> Vec2 {
    let ts = grid.tile_size();
    let center_col = (grid.width() / 2) as i32;
    let x = center_col as f32 * ts + (ts - size.x) * 0.5;

    let first = (x / ts).floor() as i32;
    let last = ((x + size.x) / ts).ceil() as i32 - 1;
    let ground = (first..=last)
        .filter_map(|col| grid.surface_row(col))
        .min()
        .map_or(grid.pixel_size().y, |row| row as f32 * ts);

    Vec2::new(x, ground - size.y - ts * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilecraft_core::{BlockKind, ClickKind, ItemKind};
    use tilecraft_world::TilePos;

    const TS: f32 = 32.0;
    const WOOD: ItemId = ItemId::Block(BlockKind::Wood);
    const DIRT: ItemId = ItemId::Block(BlockKind::Dirt);

    /// 20x12 world: open sky over a flat stone floor at row 10.
    fn flat_session(starting: &[(ItemId, u32)]) -> Session {
        let mut grid = TileGrid::new(20, 12, TS);
        for col in 0..20 {
            grid.set(col, 10, BlockKind::Stone).unwrap();
            grid.set(col, 11, BlockKind::Coal).unwrap();
        }
        grid.take_changed();

        let mut config = SessionConfig::default();
        config.starting_inventory = InventoryLedger::seeded(starting.iter().copied());
        Session::new(config, grid, CraftingCatalog::with_defaults())
    }

    fn settle(session: &mut Session) {
        for _ in 0..100 {
            session.tick(&TickInput::idle());
            if session.body().is_resting() {
                return;
            }
        }
        panic!("body never landed");
    }

    fn cell_center(col: i32, row: i32) -> (f32, f32) {
        ((col as f32 + 0.5) * TS, (row as f32 + 0.5) * TS)
    }

    fn click(col: i32, row: i32, click: ClickKind) -> TickInput {
        let (x, y) = cell_center(col, row);
        TickInput {
            pointer: Some(PointerAction::new(x, y, click)),
            ..TickInput::idle()
        }
    }

    #[test]
    fn spawns_above_surface_and_lands_unhurt() {
        let mut session = flat_session(&[]);
        assert!(!session.body().is_resting());
        settle(&mut session);
        assert_eq!(session.body().health(), 100);
        assert!(session.body().rect().max.y < 10.0 * TS);
    }

    #[test]
    fn mining_credits_and_placing_debits() {
        let mut session = flat_session(&[]);
        settle(&mut session);
        let col = (session.body().center().x / TS) as i32 + 2;

        let report = session.tick(&click(col, 10, ClickKind::Secondary));
        assert!(report.any(|e| matches!(e, SimEvent::Mined { block: BlockKind::Stone, .. })));
        assert_eq!(session.ledger().count(ItemId::Block(BlockKind::Stone)), 1);
        assert_eq!(session.grid().get(col, 10), BlockKind::Empty);

        // Slot 1 holds stone in the default hotbar.
        let report = session.tick(&TickInput {
            select_slot: Some(1),
            ..click(col, 10, ClickKind::Primary)
        });
        assert!(report.any(|e| matches!(e, SimEvent::Placed { .. })));
        assert_eq!(session.ledger().count(ItemId::Block(BlockKind::Stone)), 0);
        assert_eq!(session.grid().get(col, 10), BlockKind::Stone);
    }

    #[test]
    fn far_clicks_do_nothing() {
        let mut session = flat_session(&[(DIRT, 5)]);
        settle(&mut session);
        let before = session.grid().clone();
        let report = session.tick(&click(19, 10, ClickKind::Secondary));
        assert!(report.events.is_empty());
        assert!(session.grid().rows().eq(before.rows()));
    }

    #[test]
    fn out_of_range_slot_is_ignored() {
        let mut session = flat_session(&[]);
        session.tick(&TickInput {
            select_slot: Some(3),
            ..TickInput::idle()
        });
        let report = session.tick(&TickInput {
            select_slot: Some(99),
            ..TickInput::idle()
        });
        assert!(report.events.is_empty());
        assert_eq!(session.selected_item(), Some(ItemId::Block(BlockKind::Coal)));
    }

    #[test]
    fn crafting_flow_through_ticks() {
        let mut session = flat_session(&[(WOOD, 3)]);

        let report = session.tick(&TickInput {
            toggle_crafting: true,
            ..TickInput::idle()
        });
        assert!(report.events.contains(&SimEvent::MenuOpened));
        assert!(session.crafting_open());

        let report = session.tick(&TickInput {
            craft_recipe: Some(1),
            ..TickInput::idle()
        });
        assert!(report.events.contains(&SimEvent::Crafted {
            recipe: "wooden_pickaxe".into(),
            output: ItemId::Item(ItemKind::WoodenPickaxe),
        }));
        assert!(!session.crafting_open());
        assert_eq!(session.ledger().count(WOOD), 0);

        // No wood left: the menu will not open again.
        let report = session.tick(&TickInput {
            toggle_crafting: true,
            ..TickInput::idle()
        });
        assert!(report.events.is_empty());
        assert!(!session.crafting_open());
    }

    #[test]
    fn failed_craft_closes_menu_without_spending() {
        let mut session = flat_session(&[(WOOD, 1)]);
        session.tick(&TickInput {
            toggle_crafting: true,
            ..TickInput::idle()
        });
        let report = session.tick(&TickInput {
            craft_recipe: Some(1),
            ..TickInput::idle()
        });
        assert!(report.any(|e| matches!(e, SimEvent::CraftFailed { .. })));
        assert!(!session.crafting_open());
        assert_eq!(session.ledger().count(WOOD), 1);
    }

    #[test]
    fn falling_out_of_the_world_respawns() {
        let grid = TileGrid::new(10, 6, TS);
        let mut config = SessionConfig::default();
        config.world.spawn = Some([40.0, 10.0]);
        let mut session = Session::new(config, grid, CraftingCatalog::with_defaults());

        let mut respawned = false;
        for _ in 0..200 {
            let report = session.tick(&TickInput::idle());
            if report.events.contains(&SimEvent::Respawned {
                reason: RespawnReason::FellOutOfWorld,
            }) {
                respawned = true;
                break;
            }
        }
        assert!(respawned);
        assert_eq!(session.body().position(), Vec2::new(40.0, 10.0));
        assert_eq!(session.body().health(), 100);
    }

    #[test]
    fn lethal_fall_respawns_with_full_health() {
        let mut grid = TileGrid::new(6, 40, TS);
        for col in 0..6 {
            grid.set(col, 39, BlockKind::Stone).unwrap();
        }
        let mut config = SessionConfig::default();
        config.world.spawn = Some([40.0, 0.0]);
        config.starting_inventory = InventoryLedger::seeded([(DIRT, 2)]);
        let mut session = Session::new(config, grid, CraftingCatalog::with_defaults());

        let mut events = Vec::new();
        for _ in 0..200 {
            events.extend(session.tick(&TickInput::idle()).events);
            if events.iter().any(|e| matches!(e, SimEvent::Respawned { .. })) {
                break;
            }
        }
        assert!(events.contains(&SimEvent::Respawned {
            reason: RespawnReason::Died
        }));
        assert_eq!(session.body().health(), 100);
        assert_eq!(session.ledger().count(DIRT), 2);
    }

    #[test]
    fn respawn_rises_above_blocks_built_on_spawn() {
        let grid = TileGrid::new(6, 40, TS);
        let mut config = SessionConfig::default();
        config.world.spawn = Some([40.0, 40.0]);
        let mut session = Session::new(config, grid, CraftingCatalog::with_defaults());

        // Let the body drop clear, then wall in the spawn point.
        for _ in 0..30 {
            session.tick(&TickInput::idle());
        }
        assert!(session.body().position().y > 200.0);
        session.grid.set(1, 1, BlockKind::Dirt).unwrap();
        session.grid.set(1, 2, BlockKind::Dirt).unwrap();

        let mut respawned = false;
        for _ in 0..300 {
            let report = session.tick(&TickInput::idle());
            if report.any(|e| matches!(e, SimEvent::Respawned { .. })) {
                respawned = true;
                break;
            }
        }
        assert!(respawned);
        assert!(!session.grid().overlaps_solid(&session.body().rect()));
        assert!(session.body().position().y < 32.0);
    }

    #[test]
    fn configured_spawn_inside_terrain_is_lifted_clear() {
        let mut grid = TileGrid::new(10, 10, TS);
        for row in 5..10 {
            for col in 0..10 {
                grid.set(col, row, BlockKind::Stone).unwrap();
            }
        }
        let mut config = SessionConfig::default();
        config.world.spawn = Some([40.0, 200.0]);
        let mut session = Session::new(config, grid, CraftingCatalog::with_defaults());

        assert!(!session.grid().overlaps_solid(&session.body().rect()));
        assert!(session.body().position().y <= 5.0 * TS - 40.0);
        for _ in 0..60 {
            session.tick(&TickInput::idle());
            assert!(!session.grid().overlaps_solid(&session.body().rect()));
        }
        assert!(session.body().is_resting());
        assert_eq!(session.body().health(), 100);
    }

    #[test]
    fn view_reflects_state() {
        let mut session = flat_session(&[(WOOD, 2)]);
        settle(&mut session);
        let view = session.view();
        assert_eq!(view.health, 100);
        assert_eq!(view.selected_item(), Some(DIRT));
        assert_eq!(view.menu, MenuState::Closed);
        assert_eq!(view.ledger.count(WOOD), 2);
        assert_eq!(view.recipes.len(), 5);
        assert!(view
            .visible_cells()
            .all(|(pos, kind)| kind.is_solid() && pos.row >= 10));
        assert!(view.visible_cells().any(|(pos, _)| pos == TilePos::new(0, 10)));
    }
}
