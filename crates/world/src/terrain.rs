//! One-shot terrain producer for new worlds.
//!
//! The surface is a seeded random walk. Columns get grass (snow on peaks,
//! sand in dips), a few rows of dirt, then stone with scattered coal. Trees
//! are planted on grass after the ground is laid.

use crate::grid::TileGrid;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tilecraft_core::BlockKind;

/// Terrain shape parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainSettings {
    /// Grid width in tiles.
    pub width: usize,
    /// Grid height in tiles.
    pub height: usize,
    /// Mean surface row.
    pub surface_row: i32,
    /// Maximum per-column surface change.
    pub roughness: i32,
    /// Rows of dirt under the surface block.
    pub dirt_depth: i32,
    /// Surfaces at or above this row are capped with snow.
    pub snow_line: i32,
    /// Surfaces at or below this row are capped with sand.
    pub sand_line: i32,
    /// Chance a stone cell becomes coal.
    pub coal_chance: f64,
    /// Chance a grass column grows a tree.
    pub tree_chance: f64,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            width: 200,
            height: 100,
            surface_row: 30,
            roughness: 1,
            dirt_depth: 4,
            snow_line: 24,
            sand_line: 34,
            coal_chance: 0.06,
            tree_chance: 0.08,
        }
    }
}

const TRUNK_HEIGHT: i32 = 4;
const CANOPY_RADIUS: i32 = 2;

/// Deterministic terrain generator.
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    seed: u64,
    settings: TerrainSettings,
}

impl TerrainGenerator {
    pub fn new(seed: u64, settings: TerrainSettings) -> Self {
        Self { seed, settings }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Produce a fresh grid. The same seed and settings always give the same grid.
    pub fn generate(&self, tile_size: f32) -> TileGrid {
        let s = &self.settings;
        let mut grid = TileGrid::new(s.width, s.height, tile_size);
        if s.width == 0 || s.height == 0 {
            return grid;
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let heights = self.surface_heights(&mut rng);
        let coal_chance = s.coal_chance.clamp(0.0, 1.0);

        for (col, &surface) in heights.iter().enumerate() {
            let col = col as i32;
            let cap = if surface <= s.snow_line {
                BlockKind::Snow
            } else if surface >= s.sand_line {
                BlockKind::Sand
            } else {
                BlockKind::Grass
            };
            for row in surface..s.height as i32 {
                let kind = if row == surface {
                    cap
                } else if row <= surface + s.dirt_depth {
                    BlockKind::Dirt
                } else if rng.gen_bool(coal_chance) {
                    BlockKind::Coal
                } else {
                    BlockKind::Stone
                };
                // Rows come from the clamped walk, so writes are in bounds.
                let written = grid.set(col, row, kind);
                debug_assert!(written.is_ok(), "terrain fill out of bounds: {written:?}");
            }
        }

        self.plant_trees(&mut grid, &heights, &mut rng);
        grid.take_changed();
        grid
    }

    fn surface_heights(&self, rng: &mut StdRng) -> Vec<i32> {
        let s = &self.settings;
        let roughness = s.roughness.max(0);
        // Keep room for a tree above and at least one stone row below.
        let top = (TRUNK_HEIGHT + CANOPY_RADIUS + 1).min(s.height as i32 - 1);
        let bottom = (s.height as i32 - 2).max(top);

        let mut row = s.surface_row.clamp(top, bottom);
        (0..s.width)
            .map(|_| {
                row = (row + rng.gen_range(-roughness..=roughness)).clamp(top, bottom);
                row
            })
            .collect()
    }

    fn plant_trees(&self, grid: &mut TileGrid, heights: &[i32], rng: &mut StdRng) {
        let chance = self.settings.tree_chance.clamp(0.0, 1.0);
        let mut last_tree: Option<i32> = None;

        for (col, &surface) in heights.iter().enumerate() {
            let col = col as i32;
            if grid.get(col, surface) != BlockKind::Grass {
                continue;
            }
            if last_tree.is_some_and(|last| col - last <= CANOPY_RADIUS * 2) {
                continue;
            }
            if !rng.gen_bool(chance) {
                continue;
            }

            let crown = surface - TRUNK_HEIGHT;
            for dr in -CANOPY_RADIUS..=0 {
                for dc in -CANOPY_RADIUS..=CANOPY_RADIUS {
                    let (c, r) = (col + dc, crown + dr);
                    if grid.in_bounds(c, r) && grid.get(c, r) == BlockKind::Empty {
                        let written = grid.set(c, r, BlockKind::Leaf);
                        debug_assert!(written.is_ok(), "canopy out of bounds: {written:?}");
                    }
                }
            }
            for row in crown.max(0)..surface {
                let written = grid.set(col, row, BlockKind::Wood);
                debug_assert!(written.is_ok(), "trunk out of bounds: {written:?}");
            }
            last_tree = Some(col);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> TerrainSettings {
        TerrainSettings {
            width: 64,
            height: 48,
            surface_row: 20,
            ..TerrainSettings::default()
        }
    }

    #[test]
    fn same_seed_same_world() {
        let a = TerrainGenerator::new(42, small()).generate(32.0);
        let b = TerrainGenerator::new(42, small()).generate(32.0);
        assert!(a.rows().eq(b.rows()));
    }

    #[test]
    fn different_seeds_differ() {
        let a = TerrainGenerator::new(1, small()).generate(32.0);
        let b = TerrainGenerator::new(2, small()).generate(32.0);
        assert!(!a.rows().eq(b.rows()));
    }

    #[test]
    fn every_column_has_ground_and_stone_at_the_bottom() {
        let grid = TerrainGenerator::new(7, small()).generate(32.0);
        let bottom = grid.height() as i32 - 1;
        for col in 0..grid.width() as i32 {
            assert!(grid.surface_row(col).is_some(), "column {col} is empty");
            assert!(matches!(
                grid.get(col, bottom),
                BlockKind::Stone | BlockKind::Coal
            ));
        }
    }

    #[test]
    fn top_row_stays_clear() {
        let grid = TerrainGenerator::new(99, small()).generate(32.0);
        for col in 0..grid.width() as i32 {
            assert_eq!(grid.get(col, 0), BlockKind::Empty);
        }
    }

    #[test]
    fn fresh_grid_has_no_pending_changes() {
        let mut grid = TerrainGenerator::new(5, small()).generate(32.0);
        assert!(grid.take_changed().is_empty());
    }

    #[test]
    fn degenerate_sizes_do_not_panic() {
        let settings = TerrainSettings {
            width: 3,
            height: 2,
            ..TerrainSettings::default()
        };
        let grid = TerrainGenerator::new(0, settings).generate(32.0);
        assert_eq!((grid.width(), grid.height()), (3, 2));

        // Trees whose crown would poke above row 0 are clipped to the grid.
        let squat = TerrainSettings {
            width: 12,
            height: 3,
            surface_row: 1,
            snow_line: -1,
            sand_line: 100,
            tree_chance: 1.0,
            ..TerrainSettings::default()
        };
        let grid = TerrainGenerator::new(9, squat).generate(32.0);
        assert_eq!(grid.get(0, 2), BlockKind::Grass);
        assert!((0..12).any(|col| grid.get(col, 0) == BlockKind::Wood));
    }
}
