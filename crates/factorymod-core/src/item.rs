use crate::id::ItemKindId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// ItemContent
// ---------------------------------------------------------------------------

/// An immutable multiset of item kinds, used as an exact-match recipe key.
///
/// Equality, ordering and hashing are structural: two contents holding the
/// same kind -> quantity pairs are equal no matter how they were built.
/// Zero quantities are never stored, so `{iron: 0}` equals `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemContent {
    entries: BTreeMap<ItemKindId, u32>,
}

impl ItemContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion. Quantities for a repeated kind accumulate.
    pub fn with(mut self, kind: ItemKindId, quantity: u32) -> Self {
        if quantity > 0 {
            *self.entries.entry(kind).or_insert(0) += quantity;
        }
        self
    }

    /// Quantity of a specific kind, zero if absent.
    pub fn quantity(&self, kind: ItemKindId) -> u32 {
        self.entries.get(&kind).copied().unwrap_or(0)
    }

    /// Total items across all kinds.
    pub fn total(&self) -> u32 {
        self.entries.values().sum()
    }

    /// Number of distinct kinds.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(kind, quantity)` pairs in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemKindId, u32)> + '_ {
        self.entries.iter().map(|(&kind, &quantity)| (kind, quantity))
    }
}

impl FromIterator<(ItemKindId, u32)> for ItemContent {
    fn from_iter<I: IntoIterator<Item = (ItemKindId, u32)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ItemContent::new(), |content, (kind, quantity)| {
                content.with(kind, quantity)
            })
    }
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// A stack of a single item kind inside a live inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub kind: ItemKindId,
    pub quantity: u32,
}

/// The live, mutable inventory of a block (chest, dropper, dispenser...).
///
/// Recipes never key on an inventory directly; take a [`snapshot`](Self::snapshot)
/// first so later edits cannot affect a lookup in flight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    /// Stacks in insertion order. One stack per kind.
    pub stacks: Vec<ItemStack>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add items of a kind, merging into an existing stack.
    pub fn add(&mut self, kind: ItemKindId, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(stack) = self.stacks.iter_mut().find(|s| s.kind == kind) {
            stack.quantity += quantity;
        } else {
            self.stacks.push(ItemStack { kind, quantity });
        }
    }

    /// Remove items. Returns the amount actually removed.
    #[must_use = "returns the quantity actually removed, which may be less than requested"]
    pub fn remove(&mut self, kind: ItemKindId, quantity: u32) -> u32 {
        if let Some(stack) = self.stacks.iter_mut().find(|s| s.kind == kind) {
            let to_remove = quantity.min(stack.quantity);
            stack.quantity -= to_remove;
            if stack.quantity == 0 {
                self.stacks.retain(|s| s.quantity > 0);
            }
            to_remove
        } else {
            0
        }
    }

    pub fn quantity(&self, kind: ItemKindId) -> u32 {
        self.stacks
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| s.quantity)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    pub fn clear(&mut self) {
        self.stacks.clear();
    }

    /// Copy the current contents into an immutable [`ItemContent`].
    pub fn snapshot(&self) -> ItemContent {
        self.stacks.iter().map(|s| (s.kind, s.quantity)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const IRON: ItemKindId = ItemKindId(0);
    const GOLD: ItemKindId = ItemKindId(1);

    #[test]
    fn content_equality_ignores_construction_order() {
        let a = ItemContent::new().with(IRON, 5).with(GOLD, 1);
        let b = ItemContent::new().with(GOLD, 1).with(IRON, 5);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn content_differs_on_quantity() {
        let a = ItemContent::new().with(IRON, 5);
        let b = ItemContent::new().with(IRON, 4);
        assert_ne!(a, b);
    }

    #[test]
    fn content_drops_zero_quantities() {
        let a = ItemContent::new().with(IRON, 0);
        assert!(a.is_empty());
        assert_eq!(a, ItemContent::new());
    }

    #[test]
    fn content_accumulates_repeated_kinds() {
        let c: ItemContent = vec![(IRON, 2), (GOLD, 1), (IRON, 3)].into_iter().collect();
        assert_eq!(c.quantity(IRON), 5);
        assert_eq!(c.quantity(GOLD), 1);
        assert_eq!(c.total(), 6);
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn inventory_add_and_remove() {
        let mut inv = Inventory::new();
        inv.add(IRON, 10);
        inv.add(IRON, 5);
        assert_eq!(inv.quantity(IRON), 15);
        assert_eq!(inv.stacks.len(), 1);

        let removed = inv.remove(IRON, 20);
        assert_eq!(removed, 15);
        assert!(inv.is_empty());
        assert_eq!(inv.remove(GOLD, 1), 0);
    }

    #[test]
    fn snapshot_is_detached_from_inventory() {
        let mut inv = Inventory::new();
        inv.add(IRON, 5);
        let snap = inv.snapshot();

        inv.add(GOLD, 1);
        inv.clear();

        assert_eq!(snap, ItemContent::new().with(IRON, 5));
    }

    #[test]
    fn snapshot_of_split_stacks_matches_single_stack() {
        let mut inv = Inventory::new();
        inv.stacks.push(ItemStack { kind: IRON, quantity: 3 });
        inv.stacks.push(ItemStack { kind: IRON, quantity: 2 });
        assert_eq!(inv.snapshot(), ItemContent::new().with(IRON, 5));
    }
}
