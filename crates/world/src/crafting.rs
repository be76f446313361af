//! Crafting catalog with JSON-based recipe loading, plus the crafting menu gate.
//!
//! Recipes are kept in load order: the menu maps numeric selections 1..N onto
//! that order.

use crate::inventory::InventoryLedger;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tilecraft_core::{BlockKind, ItemId, ItemKind, Rejection};
use tracing::debug;

/// Crafting recipe definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique recipe identifier (e.g., "wooden_pickaxe").
    pub name: String,
    /// Item credited (by one) when crafted.
    pub output: ItemId,
    /// Required items and their counts.
    pub inputs: BTreeMap<ItemId, u32>,
}

/// One input the ledger cannot cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shortfall {
    /// Item that is short.
    pub item: ItemId,
    /// Amount the recipe needs.
    pub required: u32,
    /// Amount the ledger holds.
    pub held: u32,
}

/// Every missing input of a failed craft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deficiency {
    /// Recipe that was attempted.
    pub recipe: String,
    /// Inputs that were short, in item order.
    pub missing: Vec<Shortfall>,
}

impl fmt::Display for Deficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot craft {}:", self.recipe)?;
        for short in &self.missing {
            write!(f, " {} {}/{}", short.item, short.held, short.required)?;
        }
        Ok(())
    }
}

impl Recipe {
    /// Create a recipe from an input list.
    pub fn new(name: impl Into<String>, output: ItemId, inputs: &[(ItemId, u32)]) -> Self {
        let mut map = BTreeMap::new();
        for &(item, count) in inputs {
            *map.entry(item).or_insert(0) += count;
        }
        Self {
            name: name.into(),
            output,
            inputs: map,
        }
    }

    /// Check the ledger against every input without mutating it.
    pub fn evaluate(&self, ledger: &InventoryLedger) -> Result<(), Deficiency> {
        let missing: Vec<Shortfall> = self
            .inputs
            .iter()
            .filter_map(|(&item, &required)| {
                let held = ledger.count(item);
                (held < required).then_some(Shortfall {
                    item,
                    required,
                    held,
                })
            })
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Deficiency {
                recipe: self.name.clone(),
                missing,
            })
        }
    }

    /// Check if the ledger covers every input.
    pub fn can_craft(&self, ledger: &InventoryLedger) -> bool {
        self.evaluate(ledger).is_ok()
    }

    /// Debit every input and credit the output, or change nothing.
    pub fn craft(&self, ledger: &mut InventoryLedger) -> Result<ItemId, Deficiency> {
        self.evaluate(ledger)?;
        let inputs: Vec<(ItemId, u32)> = self.inputs.iter().map(|(&i, &c)| (i, c)).collect();
        if ledger.debit_all(&inputs).is_err() {
            // evaluate() just passed, so the ledger cannot be short here.
            return Err(Deficiency {
                recipe: self.name.clone(),
                missing: Vec::new(),
            });
        }
        ledger.credit(self.output, 1);
        Ok(self.output)
    }
}

/// Ordered, immutable set of recipes.
#[derive(Debug, Clone, Default)]
pub struct CraftingCatalog {
    recipes: Vec<Recipe>,
}

impl CraftingCatalog {
    /// Build a catalog, rejecting duplicate recipe names.
    pub fn new(recipes: Vec<Recipe>) -> Result<Self> {
        let mut seen = HashSet::new();
        for recipe in &recipes {
            if !seen.insert(recipe.name.as_str()) {
                anyhow::bail!("duplicate recipe name `{}`", recipe.name);
            }
            if recipe.inputs.is_empty() {
                anyhow::bail!("recipe `{}` has no inputs", recipe.name);
            }
        }
        Ok(Self { recipes })
    }

    /// Load recipes from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read recipe file {}", path.display()))?;
        Self::load_from_str(&content)
    }

    /// Load recipes from a JSON string.
    pub fn load_from_str(content: &str) -> Result<Self> {
        let recipes: Vec<Recipe> =
            serde_json::from_str(content).context("Failed to parse recipe JSON")?;
        Self::new(recipes)
    }

    /// Default recipe set.
    ///
    /// 1. wooden_pickaxe: 3 wood
    /// 2. stone_pickaxe: 2 wood + 3 stone
    /// 3. torch: 1 wood + 1 coal
    /// 4. wooden_sword: 2 wood
    /// 5. diamond_sword: 1 wood + 2 diamond
    pub fn with_defaults() -> Self {
        let wood = ItemId::Block(BlockKind::Wood);
        let stone = ItemId::Block(BlockKind::Stone);
        let coal = ItemId::Block(BlockKind::Coal);
        let diamond = ItemId::Item(ItemKind::Diamond);

        let recipe = |output: ItemKind, inputs: &[(ItemId, u32)]| {
            Recipe::new(output.as_str(), ItemId::Item(output), inputs)
        };

        Self {
            recipes: vec![
                recipe(ItemKind::WoodenPickaxe, &[(wood, 3)]),
                recipe(ItemKind::StonePickaxe, &[(wood, 2), (stone, 3)]),
                recipe(ItemKind::Torch, &[(wood, 1), (coal, 1)]),
                recipe(ItemKind::WoodenSword, &[(wood, 2)]),
                recipe(ItemKind::DiamondSword, &[(wood, 1), (diamond, 2)]),
            ],
        }
    }

    /// Recipe at a 1-based menu index.
    pub fn by_menu_index(&self, index: usize) -> Option<&Recipe> {
        index.checked_sub(1).and_then(|i| self.recipes.get(i))
    }

    /// Recipe by name.
    pub fn get(&self, name: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|recipe| recipe.name == name)
    }

    /// All recipes in menu order.
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Recipes the ledger can currently afford.
    pub fn craftable<'a>(
        &'a self,
        ledger: &'a InventoryLedger,
    ) -> impl Iterator<Item = &'a Recipe> + 'a {
        self.recipes
            .iter()
            .filter(move |recipe| recipe.can_craft(ledger))
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

/// Crafting settings loaded from config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CraftingSettings {
    /// Item whose possession unlocks the crafting menu.
    pub gating_material: ItemId,
}

impl Default for CraftingSettings {
    fn default() -> Self {
        Self {
            gating_material: ItemId::Block(BlockKind::Wood),
        }
    }
}

/// Open/closed state of the crafting menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

/// Successful craft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crafted {
    /// Recipe name.
    pub recipe: String,
    /// Item credited.
    pub output: ItemId,
}

/// Why a menu selection produced nothing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CraftFailure {
    /// The selection was not a craft attempt (menu closed, index out of range).
    #[error("selection ignored: {0}")]
    Ignored(Rejection),
    /// The attempt was made but materials were short; the menu closed.
    #[error("{0}")]
    Deficient(Deficiency),
}

/// Two-state crafting menu gated on a material.
#[derive(Debug, Clone, Default)]
pub struct CraftingMenu {
    state: MenuState,
}

impl CraftingMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == MenuState::Open
    }

    /// Toggle the menu. Opening requires one unit of the gating material.
    pub fn toggle(
        &mut self,
        ledger: &InventoryLedger,
        settings: &CraftingSettings,
    ) -> Result<MenuState, Rejection> {
        self.state = match self.state {
            MenuState::Open => MenuState::Closed,
            MenuState::Closed => {
                let held = ledger.count(settings.gating_material);
                if held == 0 {
                    return Err(Rejection::InsufficientResource {
                        item: settings.gating_material,
                        required: 1,
                        held,
                    });
                }
                MenuState::Open
            }
        };
        Ok(self.state)
    }

    /// Attempt the recipe at a 1-based index.
    ///
    /// Any in-range attempt closes the menu, whether it succeeds or not.
    pub fn select(
        &mut self,
        index: usize,
        catalog: &CraftingCatalog,
        ledger: &mut InventoryLedger,
    ) -> Result<Crafted, CraftFailure> {
        if !self.is_open() {
            return Err(CraftFailure::Ignored(Rejection::InvalidTarget(
                "crafting menu is closed",
            )));
        }
        let recipe = catalog.by_menu_index(index).ok_or(CraftFailure::Ignored(
            Rejection::InvalidTarget("no recipe at that index"),
        ))?;

        self.state = MenuState::Closed;
        match recipe.craft(ledger) {
            Ok(output) => {
                debug!(recipe = %recipe.name, %output, "crafted");
                Ok(Crafted {
                    recipe: recipe.name.clone(),
                    output,
                })
            }
            Err(deficiency) => {
                debug!(%deficiency, "craft failed");
                Err(CraftFailure::Deficient(deficiency))
            }
        }
    }
}
