//! Structure types and the structures detected from world geometry.
//!
//! A [`StructureType`] is a closed category of block arrangement. Detection
//! itself is delegated to a [`StructureDetector`] per type, so geometry can
//! be swapped without touching the creation flow.

use crate::id::Location;
use crate::material::Material;
use crate::world::World;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The kinds of multi-block structure a factory can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureType {
    /// Workbench center with an adjacent chest and furnace.
    ChestCraftingFurnace,
    /// Dropper feeding a glass line into another inventory block.
    Pipe,
    /// Dispenser center with an adjacent furnace (sorter).
    BlockFurnace,
}

impl StructureType {
    /// Detection order for creation attempts. The first type whose geometry
    /// is complete is the only one evaluated.
    pub const PRIORITY: [StructureType; 3] = [
        StructureType::ChestCraftingFurnace,
        StructureType::Pipe,
        StructureType::BlockFurnace,
    ];

    /// What players call factories of this type.
    pub fn label(&self) -> &'static str {
        match self {
            StructureType::ChestCraftingFurnace => "factory",
            StructureType::Pipe => "pipe",
            StructureType::BlockFurnace => "sorter",
        }
    }

    /// Materials that may anchor detection of this type.
    pub fn center_materials(&self) -> &'static [Material] {
        match self {
            StructureType::ChestCraftingFurnace => &[Material::Workbench],
            StructureType::Pipe => &[Material::Dropper],
            StructureType::BlockFurnace => &[Material::Dispenser],
        }
    }

    /// Materials that trigger an interaction when part of this type.
    pub fn interaction_materials(&self) -> &'static [Material] {
        match self {
            StructureType::ChestCraftingFurnace => &[
                Material::Workbench,
                Material::Furnace,
                Material::BurningFurnace,
                Material::Chest,
            ],
            StructureType::Pipe => &[Material::Dropper],
            StructureType::BlockFurnace => &[Material::Dispenser],
        }
    }
}

/// A complete structure as reported by a detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub kind: StructureType,
    /// Every block the structure occupies, the content block included.
    pub blocks: BTreeSet<Location>,
    /// The block whose inventory is matched against creation recipes.
    pub content_block: Location,
}

impl Structure {
    /// Build a structure. The content block is always part of `blocks`.
    pub fn new(
        kind: StructureType,
        blocks: impl IntoIterator<Item = Location>,
        content_block: Location,
    ) -> Self {
        let mut blocks: BTreeSet<Location> = blocks.into_iter().collect();
        blocks.insert(content_block);
        Self {
            kind,
            blocks,
            content_block,
        }
    }

    pub fn contains(&self, loc: &Location) -> bool {
        self.blocks.contains(loc)
    }
}

/// Geometry detection for one structure type.
pub trait StructureDetector: std::fmt::Debug {
    /// The type this detector recognizes.
    fn structure_type(&self) -> StructureType;

    /// Inspect the world around `anchor`. Returns `None` when the geometry
    /// is incomplete.
    fn detect(&self, world: &dyn World, anchor: Location) -> Option<Structure>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::WorldId;

    #[test]
    fn priority_order_is_fixed() {
        assert_eq!(
            StructureType::PRIORITY,
            [
                StructureType::ChestCraftingFurnace,
                StructureType::Pipe,
                StructureType::BlockFurnace,
            ]
        );
    }

    #[test]
    fn center_materials_are_interaction_materials() {
        for ty in StructureType::PRIORITY {
            for m in ty.center_materials() {
                assert!(ty.interaction_materials().contains(m), "{ty:?} {m:?}");
            }
        }
    }

    #[test]
    fn structure_always_contains_content_block() {
        let w = WorldId(0);
        let content = Location::new(w, 0, 0, 1);
        let s = Structure::new(
            StructureType::ChestCraftingFurnace,
            [Location::new(w, 0, 0, 0)],
            content,
        );
        assert!(s.contains(&content));
        assert_eq!(s.blocks.len(), 2);
    }
}
