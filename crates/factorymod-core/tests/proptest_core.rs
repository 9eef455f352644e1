//! Property-based tests for the FactoryMod core.
//!
//! Uses proptest to generate random placement sequences and item contents,
//! then verify the index and recipe lookup invariants hold.

use factorymod_core::id::*;
use factorymod_core::item::ItemContent;
use factorymod_core::location::LocationIndex;
use factorymod_core::registry::RecipeRegistry;
use factorymod_core::structure::StructureType;
use factorymod_core::test_utils::*;
use proptest::prelude::*;
use slotmap::SlotMap;
use std::collections::BTreeMap;
use std::sync::Arc;

// ===========================================================================
// Generators
// ===========================================================================

/// Placement operations against a location index.
#[derive(Debug, Clone)]
enum PlaceOp {
    Put(Vec<(i32, i32, i32)>),
    Remove(usize),
}

fn arb_place_sequence(max_ops: usize) -> impl Strategy<Value = Vec<PlaceOp>> {
    proptest::collection::vec(
        prop_oneof![
            3 => proptest::collection::vec((0..6i32, 0..3i32, 0..6i32), 1..5).prop_map(PlaceOp::Put),
            1 => (0..20usize).prop_map(PlaceOp::Remove),
        ],
        1..=max_ops,
    )
}

fn arb_content() -> impl Strategy<Value = Vec<(u32, u32)>> {
    proptest::collection::vec((0..4u32, 0..6u32), 0..6)
}

fn content_of(pairs: &[(u32, u32)]) -> ItemContent {
    pairs
        .iter()
        .map(|&(kind, quantity)| (ItemKindId(kind), quantity))
        .collect()
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// No location is ever registered to two factories, and every tile
    /// points at a factory whose footprint contains it.
    #[test]
    fn location_index_never_shares_a_location(ops in arb_place_sequence(30)) {
        let mut keys: SlotMap<FactoryId, ()> = SlotMap::with_key();
        let mut index = LocationIndex::new();
        let mut placed: Vec<FactoryId> = Vec::new();

        for op in ops {
            match op {
                PlaceOp::Put(coords) => {
                    let locs: Vec<Location> = coords
                        .iter()
                        .map(|&(x, y, z)| Location::new(WorldId(0), x, y, z))
                        .collect();
                    let id = keys.insert(());
                    let free = index.can_place(&locs);
                    let before = index.location_count();
                    match index.put(id, &locs) {
                        Ok(()) => {
                            prop_assert!(free);
                            placed.push(id);
                        }
                        Err(_) => {
                            prop_assert!(!free);
                            prop_assert_eq!(index.location_count(), before);
                        }
                    }
                }
                PlaceOp::Remove(i) => {
                    if !placed.is_empty() {
                        let id = placed.remove(i % placed.len());
                        prop_assert!(index.remove(id).is_some());
                    }
                }
            }

            let mut owners: BTreeMap<Location, FactoryId> = BTreeMap::new();
            for &id in &placed {
                for loc in index.footprint(id).unwrap() {
                    prop_assert!(owners.insert(*loc, id).is_none());
                    prop_assert_eq!(index.lookup(loc), Some(id));
                }
            }
            prop_assert_eq!(owners.len(), index.location_count());
            prop_assert_eq!(placed.len(), index.factory_count());
        }
    }

    /// Content equality does not depend on insertion order.
    #[test]
    fn content_equality_is_order_independent(pairs in arb_content()) {
        let forward = content_of(&pairs);
        let mut reversed_pairs = pairs.clone();
        reversed_pairs.reverse();
        let reversed = content_of(&reversed_pairs);
        prop_assert_eq!(&forward, &reversed);

        let total: u32 = pairs.iter().map(|&(_, q)| q).sum();
        prop_assert_eq!(forward.total(), total);
    }

    /// A recipe matches exactly its own content and nothing else.
    #[test]
    fn recipe_lookup_is_exact(recipe in arb_content(), candidate in arb_content()) {
        let recipe = content_of(&recipe);
        let candidate = content_of(&candidate);
        let mut recipes = RecipeRegistry::new();
        recipes.register(
            StructureType::ChestCraftingFurnace,
            recipe.clone(),
            Arc::new(TestEgg::new("Smeltery")),
        );

        let hit = recipes.lookup(StructureType::ChestCraftingFurnace, &candidate).is_some();
        prop_assert_eq!(hit, recipe == candidate);
        prop_assert!(recipes.lookup(StructureType::Pipe, &candidate).is_none());
    }
}
