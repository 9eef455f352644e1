//! Spatial index from world locations to the factory occupying them.

use crate::id::{FactoryId, Location};
use slotmap::SecondaryMap;
use std::collections::BTreeMap;

/// Errors from location registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("factory is already registered in the location index")]
    AlreadyPlaced,
    #[error("location {0:?} is already occupied by another factory")]
    Occupied(Location),
}

/// Maps every occupied location to its factory.
///
/// Maintains a bidirectional mapping:
/// - `tiles`: location -> factory occupying it
/// - `footprints`: factory -> every location it occupies
///
/// A location maps to at most one factory. Registration is all-or-nothing.
#[derive(Debug, Default)]
pub struct LocationIndex {
    tiles: BTreeMap<Location, FactoryId>,
    footprints: SecondaryMap<FactoryId, Vec<Location>>,
}

impl LocationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under every location in `locations`.
    ///
    /// Rejects the whole registration if the factory is already placed or
    /// any location is taken; nothing is inserted in that case.
    pub fn put<'a>(
        &mut self,
        factory: FactoryId,
        locations: impl IntoIterator<Item = &'a Location>,
    ) -> Result<(), LocationError> {
        if self.footprints.contains_key(factory) {
            return Err(LocationError::AlreadyPlaced);
        }

        let mut footprint: Vec<Location> = locations.into_iter().copied().collect();
        footprint.sort();
        footprint.dedup();

        if let Some(taken) = footprint.iter().find(|loc| self.tiles.contains_key(*loc)) {
            return Err(LocationError::Occupied(*taken));
        }

        for loc in &footprint {
            self.tiles.insert(*loc, factory);
        }
        self.footprints.insert(factory, footprint);
        Ok(())
    }

    /// Unregister a factory from all its locations. Returns the locations
    /// it occupied, or `None` if it was not placed.
    pub fn remove(&mut self, factory: FactoryId) -> Option<Vec<Location>> {
        let footprint = self.footprints.remove(factory)?;
        for loc in &footprint {
            // Only drop tiles that still point at this factory.
            if self.tiles.get(loc) == Some(&factory) {
                self.tiles.remove(loc);
            }
        }
        Some(footprint)
    }

    /// Whether every location is free.
    pub fn can_place<'a>(&self, locations: impl IntoIterator<Item = &'a Location>) -> bool {
        locations
            .into_iter()
            .all(|loc| !self.tiles.contains_key(loc))
    }

    pub fn lookup(&self, loc: &Location) -> Option<FactoryId> {
        self.tiles.get(loc).copied()
    }

    pub fn occupied(&self, loc: &Location) -> bool {
        self.lookup(loc).is_some()
    }

    /// Locations occupied by a placed factory.
    pub fn footprint(&self, factory: FactoryId) -> Option<&[Location]> {
        self.footprints.get(factory).map(|v| v.as_slice())
    }

    /// Number of factories placed.
    pub fn factory_count(&self) -> usize {
        self.footprints.len()
    }

    /// Total number of occupied locations.
    pub fn location_count(&self) -> usize {
        self.tiles.len()
    }
}
