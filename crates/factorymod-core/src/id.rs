use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Identifies a live factory in the [`FactoryRegistry`](crate::factory::FactoryRegistry).
    pub struct FactoryId;
}

/// Identifies an item kind. Cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemKindId(pub u32);

/// Identifies a world (dimension) that locations live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorldId(pub u32);

/// Identifies the actor (player) behind an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u64);

/// The initiating actor of a creation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
}

impl Actor {
    pub fn new(id: u64, name: &str) -> Self {
        Self {
            id: ActorId(id),
            name: name.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// An exact block coordinate in a world.
///
/// Ordering is world first, then `x`, `y`, `z`, so locations can key a
/// `BTreeMap` with deterministic iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub world: WorldId,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Location {
    pub fn new(world: WorldId, x: i32, y: i32, z: i32) -> Self {
        Self { world, x, y, z }
    }

    /// The location displaced by the given deltas, in the same world.
    /// `None` if any coordinate leaves the `i32` range.
    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Option<Self> {
        Some(Self {
            world: self.world,
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
            z: self.z.checked_add(dz)?,
        })
    }

    /// The neighbouring location across the given face, if it exists.
    pub fn relative(&self, face: Face) -> Option<Self> {
        let (dx, dy, dz) = face.offset();
        self.offset(dx, dy, dz)
    }
}

/// The six faces of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    North,
    East,
    South,
    West,
    Up,
    Down,
}

impl Face {
    /// All six faces, horizontal ones first.
    pub fn all() -> [Face; 6] {
        [
            Face::North,
            Face::East,
            Face::South,
            Face::West,
            Face::Up,
            Face::Down,
        ]
    }

    /// Offset for this face as `(dx, dy, dz)`.
    pub fn offset(&self) -> (i32, i32, i32) {
        match self {
            Face::North => (0, 0, -1),
            Face::East => (1, 0, 0),
            Face::South => (0, 0, 1),
            Face::West => (-1, 0, 0),
            Face::Up => (0, 1, 0),
            Face::Down => (0, -1, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_equality_is_by_value() {
        let a = Location::new(WorldId(0), 1, 64, -3);
        let b = Location::new(WorldId(0), 1, 64, -3);
        let c = Location::new(WorldId(1), 1, 64, -3);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn locations_are_hashable() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(Location::new(WorldId(0), 0, 0, 0), "workbench");
        assert_eq!(map[&Location::new(WorldId(0), 0, 0, 0)], "workbench");
    }

    #[test]
    fn relative_steps_one_block() {
        let origin = Location::new(WorldId(2), 10, 20, 30);
        for face in Face::all() {
            let there = origin.relative(face).unwrap();
            let (dx, dy, dz) = face.offset();
            assert_eq!((there.x - 10, there.y - 20, there.z - 30), (dx, dy, dz));
            assert_eq!(there.world, WorldId(2));
        }
    }

    #[test]
    fn offset_keeps_world() {
        let loc = Location::new(WorldId(7), 0, 0, 0).offset(1, -1, 2);
        assert_eq!(loc, Some(Location::new(WorldId(7), 1, -1, 2)));
    }

    #[test]
    fn offset_past_coordinate_bounds_is_none() {
        let edge = Location::new(WorldId(0), i32::MAX, 64, i32::MIN);
        assert_eq!(edge.relative(Face::East), None);
        assert_eq!(edge.relative(Face::North), None);
        assert_eq!(
            edge.relative(Face::West),
            Some(Location::new(WorldId(0), i32::MAX - 1, 64, i32::MIN))
        );
        assert_eq!(edge.offset(0, i32::MAX, 0), None);
    }
}
