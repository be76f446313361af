//! Session configuration: one serde struct per subsystem.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tilecraft_camera::CameraSettings;
use tilecraft_core::{BlockKind, ItemId};
use tilecraft_physics::BodySettings;
use tilecraft_world::{
    CraftingSettings, InteractionSettings, InventoryLedger, TerrainSettings, DEFAULT_TILE_SIZE,
};

/// World shape and spawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// Seed for terrain and bonus-drop rolls.
    pub seed: u64,
    /// Edge length of one tile in world units.
    pub tile_size: f32,
    /// Explicit spawn (top-left corner). When unset the body spawns above the
    /// surface in the middle of the world.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spawn: Option<[f32; 2]>,
    /// Terrain generator parameters.
    pub terrain: TerrainSettings,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            tile_size: DEFAULT_TILE_SIZE,
            spawn: None,
            terrain: TerrainSettings::default(),
        }
    }
}

/// Everything needed to start a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Items bound to the number keys, in slot order.
    pub hotbar: Vec<ItemId>,
    /// Recipe JSON replacing the built-in catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipes: Option<PathBuf>,
    /// World shape and spawn.
    pub world: WorldSettings,
    /// Player body and movement.
    pub body: BodySettings,
    /// Follow camera.
    pub camera: CameraSettings,
    /// Reach and bonus drops.
    pub interaction: InteractionSettings,
    /// Crafting menu gate.
    pub crafting: CraftingSettings,
    /// Ledger contents on spawn.
    pub starting_inventory: InventoryLedger,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let hotbar = [
            BlockKind::Dirt,
            BlockKind::Stone,
            BlockKind::Wood,
            BlockKind::Coal,
            BlockKind::Sand,
            BlockKind::Grass,
            BlockKind::Snow,
            BlockKind::Leaf,
        ]
        .into_iter()
        .map(ItemId::Block)
        .collect();

        Self {
            hotbar,
            recipes: None,
            world: WorldSettings::default(),
            body: BodySettings::default(),
            camera: CameraSettings::default(),
            interaction: InteractionSettings::default(),
            crafting: CraftingSettings::default(),
            starting_inventory: InventoryLedger::seeded([
                (ItemId::Block(BlockKind::Dirt), 16),
                (ItemId::Block(BlockKind::Stone), 16),
            ]),
        }
    }
}
