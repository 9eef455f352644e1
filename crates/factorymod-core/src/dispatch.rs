//! Turning an interaction with a center block into a new factory.
//!
//! One attempt is one synchronous step. Structure types are tried in
//! [`StructureType::PRIORITY`] order and the first complete one is the only
//! one evaluated. Every outcome other than [`CreationOutcome::Created`]
//! leaves the registries, the index and the world untouched.

use crate::factory::FactoryRegistry;
use crate::geometry::Detectors;
use crate::id::{Actor, FactoryId, Location};
use crate::item::{Inventory, ItemContent};
use crate::location::LocationIndex;
use crate::manager::commit;
use crate::notify::{Notice, NotificationSink};
use crate::registry::EggRegistry;
use crate::structure::{Structure, StructureType};
use crate::world::World;
use tracing::{debug, info, warn};

/// How a creation attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationOutcome {
    /// The anchor already belongs to a factory. Nothing was inspected.
    Occupied,
    /// No structure type has complete geometry at the anchor.
    NoStructure,
    /// The structure was complete but its contents match no recipe.
    NoRecipe(StructureType),
    /// The matched egg declined to hatch.
    Declined { egg: String },
    /// The hatched factory would overlap an existing one and was dropped.
    Overlap { egg: String },
    /// A factory was created and registered.
    Created(FactoryId),
}

/// Borrowed view of the manager state a creation attempt needs.
#[derive(Debug)]
pub struct CreationDispatcher<'a> {
    pub detectors: &'a Detectors,
    pub eggs: &'a EggRegistry,
    pub locations: &'a mut LocationIndex,
    pub factories: &'a mut FactoryRegistry,
}

impl CreationDispatcher<'_> {
    /// Try to create a factory anchored at `anchor` on behalf of `actor`.
    pub fn attempt(
        &mut self,
        world: &mut dyn World,
        anchor: Location,
        actor: &Actor,
        sink: &mut dyn NotificationSink,
    ) -> CreationOutcome {
        if self.locations.occupied(&anchor) {
            return CreationOutcome::Occupied;
        }

        let Some(structure) = self.detect(&*world, anchor) else {
            return CreationOutcome::NoStructure;
        };

        let content = content_of(&*world, &structure);

        let Some(egg) = self.eggs.recipes().lookup(structure.kind, &content) else {
            debug!(structure = ?structure.kind, ?content, "no creation recipe matches");
            sink.notify(actor, Notice::NoRecipe { structure: structure.kind });
            return CreationOutcome::NoRecipe(structure.kind);
        };
        let egg_name = egg.name().to_string();

        let Some(factory) = egg.hatch(&structure, actor) else {
            debug!(egg = %egg_name, "egg declined to hatch");
            return CreationOutcome::Declined { egg: egg_name };
        };

        let name = factory.name().to_string();
        let id = match commit(self.locations, self.factories, factory) {
            Ok(id) => id,
            Err(e) => {
                warn!(egg = %egg_name, error = %e, "hatched factory overlaps an existing one");
                sink.notify(actor, Notice::Overlap { factory: name });
                return CreationOutcome::Overlap { egg: egg_name };
            }
        };

        if let Some(inventory) = world.inventory_mut(structure.content_block) {
            inventory.clear();
        }

        info!(factory = %name, actor = %actor.name, "factory created");
        sink.notify(actor, Notice::Created { factory: name });
        CreationOutcome::Created(id)
    }

    /// First complete structure in priority order. Later detectors are
    /// not consulted once one reports complete geometry.
    fn detect(&self, world: &dyn World, anchor: Location) -> Option<Structure> {
        StructureType::PRIORITY
            .into_iter()
            .filter_map(|ty| self.detectors.get(ty))
            .find_map(|detector| detector.detect(world, anchor))
    }
}

/// Content of the block a structure is matched on, as a detached snapshot.
pub fn content_of(world: &dyn World, structure: &Structure) -> ItemContent {
    world
        .inventory(structure.content_block)
        .map(Inventory::snapshot)
        .unwrap_or_default()
}
