//! Standard structure detectors.
//!
//! Each detector recognizes one [`StructureType`] around an anchor block.
//! [`Detectors`] holds one detector per type and is what the creation
//! dispatcher walks in priority order.

use crate::id::{Face, Location};
use crate::material::Material;
use crate::structure::{Structure, StructureDetector, StructureType};
use crate::world::World;
use std::collections::{BTreeSet, HashMap};

/// Longest glass run a pipe may have by default.
pub const DEFAULT_MAX_PIPE_LENGTH: usize = 32;

fn neighbor_where(
    world: &dyn World,
    center: Location,
    pred: impl Fn(Material) -> bool,
) -> Option<Location> {
    Face::all()
        .into_iter()
        .filter_map(|face| center.relative(face))
        .find(|loc| pred(world.material_at(*loc)))
}

// ---------------------------------------------------------------------------
// Chest / crafting table / furnace
// ---------------------------------------------------------------------------

/// Workbench with a chest and a furnace on any of its faces.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChestCraftingFurnaceDetector;

impl StructureDetector for ChestCraftingFurnaceDetector {
    fn structure_type(&self) -> StructureType {
        StructureType::ChestCraftingFurnace
    }

    fn detect(&self, world: &dyn World, anchor: Location) -> Option<Structure> {
        if world.material_at(anchor) != Material::Workbench {
            return None;
        }
        let chest = neighbor_where(world, anchor, |m| m == Material::Chest)?;
        let furnace = neighbor_where(world, anchor, |m| m.is_furnace())?;
        Some(Structure::new(
            StructureType::ChestCraftingFurnace,
            [anchor, furnace],
            chest,
        ))
    }
}

// ---------------------------------------------------------------------------
// Pipe
// ---------------------------------------------------------------------------

/// Dropper with a straight-or-winding glass line ending in an inventory block.
#[derive(Debug, Clone, Copy)]
pub struct PipeDetector {
    pub max_length: usize,
}

impl Default for PipeDetector {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_PIPE_LENGTH,
        }
    }
}

impl PipeDetector {
    /// Follow glass from `first` until an inventory block ends the line.
    /// Returns the glass blocks and the end block.
    fn trace(
        &self,
        world: &dyn World,
        start: Location,
        first: Location,
    ) -> Option<(Vec<Location>, Location)> {
        let mut glass = vec![first];
        let mut visited: BTreeSet<Location> = [start, first].into_iter().collect();
        let mut current = first;

        loop {
            let mut next_glass = None;
            for face in Face::all() {
                let Some(loc) = current.relative(face) else {
                    continue;
                };
                if visited.contains(&loc) {
                    continue;
                }
                let material = world.material_at(loc);
                if material.has_inventory() {
                    return Some((glass, loc));
                }
                if material == Material::Glass && next_glass.is_none() {
                    next_glass = Some(loc);
                }
            }
            let next = next_glass?;
            if glass.len() >= self.max_length {
                return None;
            }
            visited.insert(next);
            glass.push(next);
            current = next;
        }
    }
}

impl StructureDetector for PipeDetector {
    fn structure_type(&self) -> StructureType {
        StructureType::Pipe
    }

    fn detect(&self, world: &dyn World, anchor: Location) -> Option<Structure> {
        if world.material_at(anchor) != Material::Dropper {
            return None;
        }
        Face::all().into_iter().find_map(|face| {
            let first = anchor.relative(face)?;
            if world.material_at(first) != Material::Glass {
                return None;
            }
            let (glass, end) = self.trace(world, anchor, first)?;
            Some(Structure::new(
                StructureType::Pipe,
                glass.into_iter().chain([end]),
                anchor,
            ))
        })
    }
}

// ---------------------------------------------------------------------------
// Block furnace (sorter)
// ---------------------------------------------------------------------------

/// Dispenser with at least one adjacent furnace.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockFurnaceDetector;

impl StructureDetector for BlockFurnaceDetector {
    fn structure_type(&self) -> StructureType {
        StructureType::BlockFurnace
    }

    fn detect(&self, world: &dyn World, anchor: Location) -> Option<Structure> {
        if world.material_at(anchor) != Material::Dispenser {
            return None;
        }
        let furnaces: Vec<Location> = Face::all()
            .into_iter()
            .filter_map(|face| anchor.relative(face))
            .filter(|loc| world.material_at(*loc).is_furnace())
            .collect();
        if furnaces.is_empty() {
            return None;
        }
        Some(Structure::new(StructureType::BlockFurnace, furnaces, anchor))
    }
}

// ---------------------------------------------------------------------------
// Detectors
// ---------------------------------------------------------------------------

/// One detector per structure type.
#[derive(Debug, Default)]
pub struct Detectors {
    by_type: HashMap<StructureType, Box<dyn StructureDetector>>,
}

impl Detectors {
    /// An empty set; types without a detector are never detected.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in geometry for every structure type.
    pub fn standard() -> Self {
        let mut detectors = Self::empty();
        detectors.set(Box::new(ChestCraftingFurnaceDetector));
        detectors.set(Box::new(PipeDetector::default()));
        detectors.set(Box::new(BlockFurnaceDetector));
        detectors
    }

    /// Install a detector for its type, replacing any previous one.
    pub fn set(&mut self, detector: Box<dyn StructureDetector>) {
        self.by_type.insert(detector.structure_type(), detector);
    }

    pub fn get(&self, ty: StructureType) -> Option<&dyn StructureDetector> {
        self.by_type.get(&ty).map(|d| d.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::WorldId;
    use crate::world::MemoryWorld;

    fn at(x: i32, y: i32, z: i32) -> Location {
        Location::new(WorldId(0), x, y, z)
    }

    #[test]
    fn chest_crafting_furnace_complete() {
        let mut world = MemoryWorld::new();
        world.set(at(0, 0, 0), Material::Workbench);
        world.set(at(1, 0, 0), Material::Chest);
        world.set(at(-1, 0, 0), Material::BurningFurnace);

        let s = ChestCraftingFurnaceDetector
            .detect(&world, at(0, 0, 0))
            .expect("complete");
        assert_eq!(s.kind, StructureType::ChestCraftingFurnace);
        assert_eq!(s.content_block, at(1, 0, 0));
        assert_eq!(
            s.blocks,
            BTreeSet::from([at(0, 0, 0), at(1, 0, 0), at(-1, 0, 0)])
        );
    }

    #[test]
    fn chest_crafting_furnace_missing_furnace() {
        let mut world = MemoryWorld::new();
        world.set(at(0, 0, 0), Material::Workbench);
        world.set(at(1, 0, 0), Material::Chest);
        assert!(ChestCraftingFurnaceDetector.detect(&world, at(0, 0, 0)).is_none());
    }

    #[test]
    fn chest_crafting_furnace_wrong_anchor() {
        let mut world = MemoryWorld::new();
        world.set(at(0, 0, 0), Material::Chest);
        world.set(at(1, 0, 0), Material::Workbench);
        world.set(at(2, 0, 0), Material::Furnace);
        assert!(ChestCraftingFurnaceDetector.detect(&world, at(0, 0, 0)).is_none());
    }

    #[test]
    fn pipe_follows_glass_to_inventory() {
        let mut world = MemoryWorld::new();
        world.set(at(0, 0, 0), Material::Dropper);
        world.set(at(1, 0, 0), Material::Glass);
        world.set(at(2, 0, 0), Material::Glass);
        world.set(at(2, 1, 0), Material::Glass);
        world.set(at(2, 2, 0), Material::Chest);

        let s = PipeDetector::default()
            .detect(&world, at(0, 0, 0))
            .expect("complete");
        assert_eq!(s.content_block, at(0, 0, 0));
        assert_eq!(s.blocks.len(), 5);
        assert!(s.contains(&at(2, 2, 0)));
    }

    #[test]
    fn pipe_without_end_is_incomplete() {
        let mut world = MemoryWorld::new();
        world.set(at(0, 0, 0), Material::Dropper);
        world.set(at(1, 0, 0), Material::Glass);
        world.set(at(2, 0, 0), Material::Glass);
        assert!(PipeDetector::default().detect(&world, at(0, 0, 0)).is_none());
    }

    #[test]
    fn pipe_longer_than_max_is_incomplete() {
        let mut world = MemoryWorld::new();
        world.set(at(0, 0, 0), Material::Dropper);
        for x in 1..=4 {
            world.set(at(x, 0, 0), Material::Glass);
        }
        world.set(at(5, 0, 0), Material::Dispenser);

        assert!(PipeDetector { max_length: 3 }.detect(&world, at(0, 0, 0)).is_none());
        assert!(PipeDetector { max_length: 4 }.detect(&world, at(0, 0, 0)).is_some());
    }

    #[test]
    fn block_furnace_collects_all_adjacent_furnaces() {
        let mut world = MemoryWorld::new();
        world.set(at(0, 0, 0), Material::Dispenser);
        world.set(at(0, 1, 0), Material::Furnace);
        world.set(at(0, -1, 0), Material::BurningFurnace);

        let s = BlockFurnaceDetector.detect(&world, at(0, 0, 0)).expect("complete");
        assert_eq!(s.content_block, at(0, 0, 0));
        assert_eq!(s.blocks.len(), 3);
    }

    #[test]
    fn block_furnace_without_furnace_is_incomplete() {
        let mut world = MemoryWorld::new();
        world.set(at(0, 0, 0), Material::Dispenser);
        assert!(BlockFurnaceDetector.detect(&world, at(0, 0, 0)).is_none());
    }

    #[test]
    fn detectors_at_coordinate_bounds_see_no_neighbour_past_the_edge() {
        let edge = at(i32::MAX, 0, i32::MIN);
        let mut world = MemoryWorld::new();
        world.set(edge, Material::Workbench);
        assert!(ChestCraftingFurnaceDetector.detect(&world, edge).is_none());

        world.set(at(i32::MAX, 0, i32::MIN + 1), Material::Chest);
        world.set(at(i32::MAX - 1, 0, i32::MIN), Material::Furnace);
        let s = ChestCraftingFurnaceDetector.detect(&world, edge).expect("complete");
        assert_eq!(s.content_block, at(i32::MAX, 0, i32::MIN + 1));

        let mut world = MemoryWorld::new();
        world.set(edge, Material::Dropper);
        world.set(at(i32::MAX - 1, 0, i32::MIN), Material::Glass);
        assert!(PipeDetector::default().detect(&world, edge).is_none());
        world.set(at(i32::MAX - 2, 0, i32::MIN), Material::Chest);
        assert!(PipeDetector::default().detect(&world, edge).is_some());

        let mut world = MemoryWorld::new();
        world.set(edge, Material::Dispenser);
        assert!(BlockFurnaceDetector.detect(&world, edge).is_none());
    }

    #[test]
    fn standard_set_covers_every_type() {
        let detectors = Detectors::standard();
        for ty in StructureType::PRIORITY {
            assert_eq!(detectors.get(ty).map(|d| d.structure_type()), Some(ty));
        }
        assert!(Detectors::empty().get(StructureType::Pipe).is_none());
    }
}
