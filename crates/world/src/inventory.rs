//! Inventory ledger: a count per item identity.
//!
//! Counts are unsigned, so they can never go negative. Multi-item debits are
//! all-or-nothing: either every requested amount is removed or nothing is.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tilecraft_core::{ItemId, Rejection};

/// Per-item counts held by the player.
///
/// Backed by a `BTreeMap` so iteration order is stable across runs. Items
/// whose count drops to zero are removed from the map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryLedger {
    counts: BTreeMap<ItemId, u32>,
}

impl InventoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger pre-seeded with the given counts.
    pub fn seeded<I>(items: I) -> Self
    where
        I: IntoIterator<Item = (ItemId, u32)>,
    {
        let mut ledger = Self::new();
        for (item, count) in items {
            ledger.credit(item, count);
        }
        ledger
    }

    /// Count held for an item.
    pub fn count(&self, item: ItemId) -> u32 {
        self.counts.get(&item).copied().unwrap_or(0)
    }

    /// Check if the ledger holds at least `amount` of an item.
    pub fn has(&self, item: ItemId, amount: u32) -> bool {
        self.count(item) >= amount
    }

    /// Add items.
    pub fn credit(&mut self, item: ItemId, amount: u32) {
        if amount == 0 {
            return;
        }
        let entry = self.counts.entry(item).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Remove items, or nothing if the ledger holds fewer than `amount`.
    pub fn debit(&mut self, item: ItemId, amount: u32) -> Result<(), Rejection> {
        self.debit_all(&[(item, amount)])
    }

    /// Remove several items at once. Checks every entry before mutating.
    ///
    /// Repeated entries for the same item are summed before checking.
    pub fn debit_all(&mut self, items: &[(ItemId, u32)]) -> Result<(), Rejection> {
        let mut totals: BTreeMap<ItemId, u32> = BTreeMap::new();
        for &(item, amount) in items {
            let total = totals.entry(item).or_insert(0);
            *total = total.saturating_add(amount);
        }

        for (&item, &required) in &totals {
            let held = self.count(item);
            if held < required {
                return Err(Rejection::InsufficientResource {
                    item,
                    required,
                    held,
                });
            }
        }

        for (item, amount) in totals {
            if let Some(count) = self.counts.get_mut(&item) {
                *count -= amount;
                if *count == 0 {
                    self.counts.remove(&item);
                }
            }
        }
        Ok(())
    }

    /// Iterate held items in stable order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, u32)> + '_ {
        self.counts.iter().map(|(&item, &count)| (item, count))
    }

    /// Total number of items held.
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&count| count as u64).sum()
    }

    /// Check if nothing is held.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilecraft_core::{BlockKind, ItemKind};

    const DIRT: ItemId = ItemId::Block(BlockKind::Dirt);
    const WOOD: ItemId = ItemId::Block(BlockKind::Wood);
    const STONE: ItemId = ItemId::Block(BlockKind::Stone);

    #[test]
    fn credit_and_count() {
        let mut ledger = InventoryLedger::new();
        ledger.credit(DIRT, 3);
        ledger.credit(DIRT, 2);
        assert_eq!(ledger.count(DIRT), 5);
        assert_eq!(ledger.count(STONE), 0);
        assert!(ledger.has(DIRT, 5));
        assert!(!ledger.has(DIRT, 6));
    }

    #[test]
    fn debit_never_goes_negative() {
        let mut ledger = InventoryLedger::seeded([(DIRT, 1)]);
        assert!(ledger.debit(DIRT, 1).is_ok());
        assert_eq!(
            ledger.debit(DIRT, 1),
            Err(Rejection::InsufficientResource {
                item: DIRT,
                required: 1,
                held: 0
            })
        );
        assert_eq!(ledger.count(DIRT), 0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn debit_all_is_atomic() {
        let mut ledger = InventoryLedger::seeded([(WOOD, 2), (STONE, 5)]);
        let before = ledger.clone();

        let result = ledger.debit_all(&[(STONE, 3), (WOOD, 3)]);
        assert!(matches!(
            result,
            Err(Rejection::InsufficientResource { item, .. }) if item == WOOD
        ));
        assert_eq!(ledger, before);

        ledger.debit_all(&[(STONE, 3), (WOOD, 2)]).unwrap();
        assert_eq!(ledger.count(STONE), 2);
        assert_eq!(ledger.count(WOOD), 0);
    }

    #[test]
    fn repeated_entries_are_summed() {
        let mut ledger = InventoryLedger::seeded([(WOOD, 3)]);
        assert!(ledger.debit_all(&[(WOOD, 2), (WOOD, 2)]).is_err());
        assert_eq!(ledger.count(WOOD), 3);
    }

    #[test]
    fn iteration_is_ordered_and_skips_zero() {
        let diamond = ItemId::Item(ItemKind::Diamond);
        let mut ledger = InventoryLedger::seeded([(diamond, 1), (STONE, 2), (DIRT, 0)]);
        ledger.credit(DIRT, 4);
        let items: Vec<_> = ledger.iter().collect();
        assert_eq!(items, vec![(DIRT, 4), (STONE, 2), (diamond, 1)]);
        assert_eq!(ledger.total(), 7);
    }

    #[test]
    fn ledger_serializes_as_name_map() {
        let ledger = InventoryLedger::seeded([(WOOD, 3)]);
        let json = serde_json::to_string(&ledger).unwrap();
        assert_eq!(json, r#"{"wood":3}"#);
        let back: InventoryLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ledger);
    }
}
