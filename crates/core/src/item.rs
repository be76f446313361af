//! Block and item identities.
//!
//! Every identity is a closed enum with a stable lowercase name. Configs and
//! recipe files refer to items by name; unknown names are rejected when parsed
//! instead of falling back to a default.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Kind of block stored in a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum BlockKind {
    /// No block; never participates in collision.
    #[default]
    Empty = 0,
    /// Dirt.
    Dirt = 1,
    /// Stone.
    Stone = 2,
    /// Coal ore.
    Coal = 3,
    /// Tree trunk.
    Wood = 4,
    /// Tree canopy.
    Leaf = 5,
    /// Grass-topped dirt.
    Grass = 6,
    /// Sand.
    Sand = 7,
    /// Snow.
    Snow = 8,
}

impl BlockKind {
    /// Every solid kind, in id order.
    pub const SOLID: [BlockKind; 8] = [
        BlockKind::Dirt,
        BlockKind::Stone,
        BlockKind::Coal,
        BlockKind::Wood,
        BlockKind::Leaf,
        BlockKind::Grass,
        BlockKind::Sand,
        BlockKind::Snow,
    ];

    /// Whether this kind blocks movement.
    #[inline]
    pub const fn is_solid(self) -> bool {
        !matches!(self, BlockKind::Empty)
    }

    /// Stable numeric id.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Inverse of [`BlockKind::as_u8`].
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Empty),
            1 => Some(Self::Dirt),
            2 => Some(Self::Stone),
            3 => Some(Self::Coal),
            4 => Some(Self::Wood),
            5 => Some(Self::Leaf),
            6 => Some(Self::Grass),
            7 => Some(Self::Sand),
            8 => Some(Self::Snow),
            _ => None,
        }
    }

    /// Canonical name used in configs and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Dirt => "dirt",
            Self::Stone => "stone",
            Self::Coal => "coal",
            Self::Wood => "wood",
            Self::Leaf => "leaf",
            Self::Grass => "grass",
            Self::Sand => "sand",
            Self::Snow => "snow",
        }
    }

    /// Parse a canonical name.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "empty" => Some(Self::Empty),
            "dirt" => Some(Self::Dirt),
            "stone" => Some(Self::Stone),
            "coal" => Some(Self::Coal),
            "wood" => Some(Self::Wood),
            "leaf" => Some(Self::Leaf),
            "grass" => Some(Self::Grass),
            "sand" => Some(Self::Sand),
            "snow" => Some(Self::Snow),
            _ => None,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = ParseItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.trim()).ok_or_else(|| ParseItemError::Unknown(s.to_string()))
    }
}

impl Serialize for BlockKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BlockKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Non-block items: crafted tools and loose materials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemKind {
    /// Crafting stick.
    Stick,
    /// Rare drop from coal ore.
    Diamond,
    /// Torch.
    Torch,
    /// Wooden pickaxe.
    WoodenPickaxe,
    /// Stone pickaxe.
    StonePickaxe,
    /// Wooden sword.
    WoodenSword,
    /// Diamond sword.
    DiamondSword,
}

impl ItemKind {
    /// All item kinds.
    pub const ALL: [ItemKind; 7] = [
        ItemKind::Stick,
        ItemKind::Diamond,
        ItemKind::Torch,
        ItemKind::WoodenPickaxe,
        ItemKind::StonePickaxe,
        ItemKind::WoodenSword,
        ItemKind::DiamondSword,
    ];

    /// Canonical name used in configs and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stick => "stick",
            Self::Diamond => "diamond",
            Self::Torch => "torch",
            Self::WoodenPickaxe => "wooden_pickaxe",
            Self::StonePickaxe => "stone_pickaxe",
            Self::WoodenSword => "wooden_sword",
            Self::DiamondSword => "diamond_sword",
        }
    }

    /// Parse a canonical name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

/// Errors produced when parsing item or block names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseItemError {
    /// The name is not part of the known set.
    #[error("unknown item name `{0}`")]
    Unknown(String),
    /// `empty` names the absence of a block, not something that can be held.
    #[error("`empty` is not an item")]
    EmptyBlock,
}

/// Identity of anything an inventory can count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ItemId {
    /// A placeable block (never [`BlockKind::Empty`]).
    Block(BlockKind),
    /// A non-block item.
    Item(ItemKind),
}

impl ItemId {
    /// Build a block item, rejecting [`BlockKind::Empty`].
    pub fn block(kind: BlockKind) -> Result<Self, ParseItemError> {
        if kind.is_solid() {
            Ok(Self::Block(kind))
        } else {
            Err(ParseItemError::EmptyBlock)
        }
    }

    /// Block kind this item places, if it is a block.
    pub fn as_block(self) -> Option<BlockKind> {
        match self {
            Self::Block(kind) => Some(kind),
            Self::Item(_) => None,
        }
    }

    /// Canonical name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Block(kind) => kind.as_str(),
            Self::Item(kind) => kind.as_str(),
        }
    }
}

impl From<ItemKind> for ItemId {
    fn from(kind: ItemKind) -> Self {
        Self::Item(kind)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemId {
    type Err = ParseItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if let Some(kind) = BlockKind::parse(name) {
            return Self::block(kind);
        }
        ItemKind::parse(name)
            .map(Self::Item)
            .ok_or_else(|| ParseItemError::Unknown(name.to_string()))
    }
}

impl TryFrom<String> for ItemId {
    type Error = ParseItemError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ItemId> for String {
    fn from(value: ItemId) -> Self {
        value.as_str().to_string()
    }
}
