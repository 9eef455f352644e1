//! Block access for detectors and the creation dispatcher.

use crate::id::Location;
use crate::item::Inventory;
use crate::material::Material;
use std::collections::BTreeMap;

/// Read/write view of the blocks the factory core inspects.
pub trait World {
    /// Material at a location. Unknown locations read as [`Material::Air`].
    fn material_at(&self, loc: Location) -> Material;

    /// Inventory of the block at `loc`, if it has one.
    fn inventory(&self, loc: Location) -> Option<&Inventory>;

    fn inventory_mut(&mut self, loc: Location) -> Option<&mut Inventory>;
}

/// A placed block.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub material: Material,
    pub inventory: Option<Inventory>,
}

/// An in-memory world keyed by location.
#[derive(Debug, Default, Clone)]
pub struct MemoryWorld {
    blocks: BTreeMap<Location, Block>,
}

impl MemoryWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a block, replacing whatever was there. Inventory-bearing
    /// materials get an empty inventory.
    pub fn set(&mut self, loc: Location, material: Material) {
        let inventory = material.has_inventory().then(Inventory::new);
        self.blocks.insert(
            loc,
            Block {
                material,
                inventory,
            },
        );
    }

    pub fn remove(&mut self, loc: Location) -> Option<Block> {
        self.blocks.remove(&loc)
    }

    pub fn block(&self, loc: Location) -> Option<&Block> {
        self.blocks.get(&loc)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}

impl World for MemoryWorld {
    fn material_at(&self, loc: Location) -> Material {
        self.block(loc).map_or(Material::Air, |b| b.material)
    }

    fn inventory(&self, loc: Location) -> Option<&Inventory> {
        self.block(loc)?.inventory.as_ref()
    }

    fn inventory_mut(&mut self, loc: Location) -> Option<&mut Inventory> {
        self.blocks.get_mut(&loc)?.inventory.as_mut()
    }
}
