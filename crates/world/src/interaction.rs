//! Block interaction: mining and placing within reach of the player.
//!
//! Every rejection is returned as a value and leaves the grid and the ledger
//! untouched. Callers decide whether to log it; nothing here panics on bad
//! pointer input.

use crate::grid::{TileGrid, TilePos, WorldRect};
use crate::inventory::InventoryLedger;
use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tilecraft_core::{BlockKind, ClickKind, ItemId, ItemKind, PointerAction, Rejection};
use tracing::warn;

/// Extra drop rolled when a specific block kind is mined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusDrop {
    /// Block kind that triggers the roll.
    pub source: BlockKind,
    /// Item credited when the roll succeeds.
    pub item: ItemId,
    /// Probability in `[0, 1]`.
    pub chance: f64,
}

/// Interaction tuning loaded from config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Reach radius in tiles, measured from the body center to the cell center.
    pub reach_tiles: f32,
    /// Chance table for bonus drops.
    pub bonus_drops: Vec<BonusDrop>,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            reach_tiles: 5.0,
            bonus_drops: vec![BonusDrop {
                source: BlockKind::Coal,
                item: ItemId::Item(ItemKind::Diamond),
                chance: 0.05,
            }],
        }
    }
}

/// What an accepted interaction did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// A block was placed and one unit debited.
    Placed {
        /// Target cell.
        pos: TilePos,
        /// Block placed.
        kind: BlockKind,
    },
    /// A block was mined and credited.
    Mined {
        /// Target cell.
        pos: TilePos,
        /// Block removed.
        kind: BlockKind,
        /// Bonus item credited, if the roll succeeded.
        bonus: Option<ItemId>,
    },
}

/// Everything about the player the controller needs for one interaction.
#[derive(Debug, Clone, Copy)]
pub struct Interactor {
    /// Body rectangle; placements may not overlap it.
    pub body: WorldRect,
    /// Item placed on a primary click; `None` is an empty hand.
    pub selected: Option<ItemId>,
}

impl Interactor {
    /// Reach origin.
    pub fn center(&self) -> Vec2 {
        self.body.center()
    }
}

/// Translates pointer clicks into grid and ledger mutations.
#[derive(Debug, Clone)]
pub struct InteractionController {
    reach: f32,
    bonus_drops: Vec<BonusDrop>,
}

impl InteractionController {
    /// Build a controller for a grid with the given tile size.
    pub fn new(settings: &InteractionSettings, tile_size: f32) -> Self {
        let bonus_drops = settings
            .bonus_drops
            .iter()
            .cloned()
            .map(|mut drop| {
                if !(0.0..=1.0).contains(&drop.chance) {
                    warn!(
                        source = %drop.source,
                        chance = drop.chance,
                        "bonus drop chance outside [0, 1]; clamping"
                    );
                    drop.chance = if drop.chance.is_nan() {
                        0.0
                    } else {
                        drop.chance.clamp(0.0, 1.0)
                    };
                }
                drop
            })
            .collect();
        Self {
            reach: settings.reach_tiles.max(0.0) * tile_size,
            bonus_drops,
        }
    }

    /// Reach radius in world units.
    pub fn reach(&self) -> f32 {
        self.reach
    }

    /// Resolve the pointer to an in-grid cell within reach.
    pub fn target(
        &self,
        grid: &TileGrid,
        origin: Vec2,
        pointer: Vec2,
    ) -> Result<TilePos, Rejection> {
        if !pointer.is_finite() {
            return Err(Rejection::InvalidTarget("pointer is not a finite position"));
        }
        let pos = grid.tile_at_world(pointer);
        if !grid.in_bounds(pos.col, pos.row) {
            return Err(Rejection::OutOfBounds {
                col: pos.col,
                row: pos.row,
            });
        }
        let distance = grid.cell_rect(pos).center().distance(origin);
        if distance > self.reach {
            return Err(Rejection::OutOfReach {
                distance,
                reach: self.reach,
            });
        }
        Ok(pos)
    }

    /// Apply a pointer action: primary places, secondary mines.
    pub fn interact<R: Rng>(
        &self,
        grid: &mut TileGrid,
        ledger: &mut InventoryLedger,
        who: &Interactor,
        action: PointerAction,
        rng: &mut R,
    ) -> Result<InteractionOutcome, Rejection> {
        let pos = self.target(grid, who.center(), Vec2::new(action.x, action.y))?;
        match action.click {
            ClickKind::Primary => self.place(grid, ledger, pos, who),
            ClickKind::Secondary => self.mine(grid, ledger, pos, rng),
        }
    }

    /// Place the selected block onto an empty cell, debiting one unit.
    pub fn place(
        &self,
        grid: &mut TileGrid,
        ledger: &mut InventoryLedger,
        pos: TilePos,
        who: &Interactor,
    ) -> Result<InteractionOutcome, Rejection> {
        if grid.get(pos.col, pos.row).is_solid() {
            return Err(Rejection::InvalidTarget("cell is occupied"));
        }
        let item = who
            .selected
            .ok_or(Rejection::InvalidTarget("nothing selected"))?;
        let kind = item
            .as_block()
            .ok_or(Rejection::InvalidTarget("selected item is not a block"))?;
        let held = ledger.count(item);
        if held == 0 {
            return Err(Rejection::InsufficientResource {
                item,
                required: 1,
                held,
            });
        }
        if grid.cell_rect(pos).overlaps(&who.body) {
            return Err(Rejection::InvalidTarget("cell overlaps the player"));
        }

        grid.set(pos.col, pos.row, kind)?;
        ledger.debit(item, 1)?;
        Ok(InteractionOutcome::Placed { pos, kind })
    }

    /// Clear a solid cell, crediting its kind and rolling bonus drops.
    pub fn mine<R: Rng>(
        &self,
        grid: &mut TileGrid,
        ledger: &mut InventoryLedger,
        pos: TilePos,
        rng: &mut R,
    ) -> Result<InteractionOutcome, Rejection> {
        let kind = grid.get(pos.col, pos.row);
        let item = ItemId::block(kind).map_err(|_| Rejection::InvalidTarget("cell is empty"))?;

        grid.set(pos.col, pos.row, BlockKind::Empty)?;
        ledger.credit(item, 1);

        let bonus = self.roll_bonus(kind, rng);
        if let Some(bonus) = bonus {
            ledger.credit(bonus, 1);
        }
        Ok(InteractionOutcome::Mined { pos, kind, bonus })
    }

    fn roll_bonus<R: Rng>(&self, kind: BlockKind, rng: &mut R) -> Option<ItemId> {
        self.bonus_drops
            .iter()
            .filter(|drop| drop.source == kind)
            .find(|drop| rng.gen_bool(drop.chance))
            .map(|drop| drop.item)
    }
}
