//! Events emitted by a simulation tick.

use serde::Serialize;
use tilecraft_core::{BlockKind, ItemId, SimTick};
use tilecraft_world::{Shortfall, TilePos};

/// Why the body was reset to its spawn point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RespawnReason {
    /// Health reached zero.
    Died,
    /// The body fell below the bottom of the world.
    FellOutOfWorld,
}

/// Something observable that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimEvent {
    /// A hotbar slot was selected.
    SlotSelected {
        /// Zero-based slot.
        slot: usize,
        /// Item in that slot.
        item: ItemId,
    },
    /// The crafting menu opened.
    MenuOpened,
    /// The crafting menu closed.
    MenuClosed,
    /// A recipe was crafted.
    Crafted {
        /// Recipe name.
        recipe: String,
        /// Item credited.
        output: ItemId,
    },
    /// A recipe was attempted without enough materials.
    CraftFailed {
        /// Recipe name.
        recipe: String,
        /// Inputs that were short.
        missing: Vec<Shortfall>,
    },
    /// The body came to rest after being airborne.
    Landed {
        /// Fall distance in world units.
        distance: f32,
    },
    /// Health was lost.
    Damaged {
        /// Health removed.
        amount: u32,
        /// Health left.
        health: u32,
    },
    /// The body was reset to spawn.
    Respawned {
        /// Cause of the reset.
        reason: RespawnReason,
    },
    /// A block was mined.
    Mined {
        /// Cell cleared.
        pos: TilePos,
        /// Block removed and credited.
        block: BlockKind,
        /// Extra item credited by a bonus roll.
        #[serde(skip_serializing_if = "Option::is_none")]
        bonus: Option<ItemId>,
    },
    /// A block was placed.
    Placed {
        /// Cell filled.
        pos: TilePos,
        /// Block placed and debited.
        block: BlockKind,
    },
}

impl SimEvent {
    /// Short label used in event logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SimEvent::SlotSelected { .. } => "slot_selected",
            SimEvent::MenuOpened => "menu_opened",
            SimEvent::MenuClosed => "menu_closed",
            SimEvent::Crafted { .. } => "crafted",
            SimEvent::CraftFailed { .. } => "craft_failed",
            SimEvent::Landed { .. } => "landed",
            SimEvent::Damaged { .. } => "damaged",
            SimEvent::Respawned { .. } => "respawned",
            SimEvent::Mined { .. } => "mined",
            SimEvent::Placed { .. } => "placed",
        }
    }
}

/// Result of [`crate::Session::tick`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    /// Tick that was simulated.
    pub tick: SimTick,
    /// Events in the order they happened.
    pub events: Vec<SimEvent>,
}

impl TickReport {
    /// Whether any event matches `predicate`.
    pub fn any(&self, predicate: impl Fn(&SimEvent) -> bool) -> bool {
        self.events.iter().any(predicate)
    }
}
