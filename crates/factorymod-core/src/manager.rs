//! The context object that owns every factory registry.
//!
//! [`ManagerBuilder`] is the startup phase: configuration, eggs, detectors
//! and the persistence gateway go in, then [`ManagerBuilder::build`] freezes
//! the egg and recipe registries. The resulting [`FactoryManager`] is passed
//! by reference to every event-driven entry point.

use crate::config::ManagerConfig;
use crate::dispatch::{CreationDispatcher, CreationOutcome};
use crate::egg::{Egg, EggDefinition};
use crate::factory::{Factory, FactoryRegistry};
use crate::geometry::Detectors;
use crate::id::{Actor, FactoryId, Location};
use crate::item::ItemContent;
use crate::lifecycle::{LifecycleGateway, PersistenceGateway};
use crate::location::{LocationError, LocationIndex};
use crate::material::{Material, MaterialClassifier};
use crate::notify::NotificationSink;
use crate::persist::{MemoryGateway, PersistError};
use crate::registry::EggRegistry;
use crate::structure::{StructureDetector, StructureType};
use crate::world::World;
use std::sync::Arc;
use tracing::warn;

/// Register a factory in both the registry and the location index, or in
/// neither.
pub(crate) fn commit(
    locations: &mut LocationIndex,
    factories: &mut FactoryRegistry,
    factory: Box<dyn Factory>,
) -> Result<FactoryId, LocationError> {
    if let Some(taken) = factory
        .structure()
        .blocks
        .iter()
        .find(|loc| locations.occupied(loc))
    {
        return Err(LocationError::Occupied(*taken));
    }
    let id = factories.insert(factory);
    let put = match factories.get(id) {
        Some(f) => locations.put(id, &f.structure().blocks),
        None => Ok(()),
    };
    if let Err(e) = put {
        factories.remove(id);
        return Err(e);
    }
    Ok(id)
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Startup phase of a [`FactoryManager`].
#[derive(Debug)]
pub struct ManagerBuilder {
    config: ManagerConfig,
    eggs: EggRegistry,
    detectors: Detectors,
    gateway: Option<Box<dyn PersistenceGateway>>,
}

impl ManagerBuilder {
    /// Start with the standard detectors and an in-memory gateway.
    pub fn new(config: ManagerConfig) -> Self {
        Self {
            config,
            eggs: EggRegistry::new(),
            detectors: Detectors::standard(),
            gateway: None,
        }
    }

    /// Register an egg hatched by `setup_cost` on `structure`. Overwrites
    /// an earlier recipe or name binding and returns the replaced egg.
    pub fn register_creation_egg(
        &mut self,
        structure: StructureType,
        setup_cost: ItemContent,
        egg: Arc<dyn Egg>,
    ) -> Option<Arc<dyn Egg>> {
        self.eggs.register_creation_egg(structure, setup_cost, egg)
    }

    /// Register an egg reachable only by name (upgrades).
    pub fn register_upgrade_egg(&mut self, egg: Arc<dyn Egg>) -> Option<Arc<dyn Egg>> {
        self.eggs.register_upgrade_egg(egg)
    }

    /// Register eggs from data-file definitions. `hatchery` supplies the
    /// behaviour for each definition.
    pub fn install<I, F>(&mut self, definitions: I, mut hatchery: F)
    where
        I: IntoIterator<Item = EggDefinition>,
        F: FnMut(&EggDefinition) -> Arc<dyn Egg>,
    {
        for def in definitions {
            let egg = hatchery(&def);
            if egg.name() != def.name {
                warn!(definition = %def.name, egg = egg.name(), "egg name differs from its definition");
            }
            match def.creation {
                Some((structure, setup_cost)) => {
                    self.eggs.register_creation_egg(structure, setup_cost, egg);
                }
                None => {
                    self.eggs.register_upgrade_egg(egg);
                }
            }
        }
    }

    /// Replace the detector for one structure type.
    pub fn set_detector(&mut self, detector: Box<dyn StructureDetector>) {
        self.detectors.set(detector);
    }

    /// Replace the whole detector set.
    pub fn set_detectors(&mut self, detectors: Detectors) {
        self.detectors = detectors;
    }

    pub fn set_gateway(&mut self, gateway: Box<dyn PersistenceGateway>) {
        self.gateway = Some(gateway);
    }

    pub fn eggs(&self) -> &EggRegistry {
        &self.eggs
    }

    /// Freeze the registries and build the manager.
    pub fn build(self) -> FactoryManager {
        let gateway = self
            .gateway
            .unwrap_or_else(|| Box::new(MemoryGateway::new()));
        FactoryManager {
            config: self.config,
            classifier: MaterialClassifier::new(),
            eggs: self.eggs,
            detectors: self.detectors,
            locations: LocationIndex::new(),
            factories: FactoryRegistry::new(),
            lifecycle: LifecycleGateway::new(gateway),
        }
    }
}

// ---------------------------------------------------------------------------
// FactoryManager
// ---------------------------------------------------------------------------

/// Owns every factory, their locations, and the eggs that create them.
#[derive(Debug)]
pub struct FactoryManager {
    config: ManagerConfig,
    classifier: MaterialClassifier,
    eggs: EggRegistry,
    detectors: Detectors,
    locations: LocationIndex,
    factories: FactoryRegistry,
    lifecycle: LifecycleGateway,
}

impl FactoryManager {
    pub fn builder(config: ManagerConfig) -> ManagerBuilder {
        ManagerBuilder::new(config)
    }

    // -- Configuration --

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Material used to interact with factories, stick by default.
    pub fn interaction_material(&self) -> Material {
        self.config.interaction_material
    }

    pub fn is_citadel_enabled(&self) -> bool {
        self.config.citadel_enabled
    }

    /// Power level at which factories activate. Below it they deactivate.
    pub fn redstone_power_on(&self) -> u8 {
        self.config.redstone_power_on
    }

    /// Power change, up or down, needed to switch a factory's recipe.
    pub fn redstone_recipe_change(&self) -> u8 {
        self.config.redstone_recipe_change
    }

    /// Lore given to compacted items.
    pub fn compact_lore(&self) -> Option<&str> {
        self.config.compact_lore.as_deref()
    }

    pub fn set_compact_lore(&mut self, lore: impl Into<String>) {
        self.config.compact_lore = Some(lore.into());
    }

    // -- Materials --

    pub fn is_possible_center_block(&self, material: Material) -> bool {
        self.classifier.is_possible_center_block(material)
    }

    pub fn is_possible_interaction_block(&self, material: Material) -> bool {
        self.classifier.is_possible_interaction_block(material)
    }

    // -- Eggs --

    pub fn egg(&self, name: &str) -> Option<&Arc<dyn Egg>> {
        self.eggs.by_name(name)
    }

    pub fn eggs(&self) -> &EggRegistry {
        &self.eggs
    }

    /// Setup cost of the egg named `name` on `structure`, if it has one.
    pub fn setup_cost(&self, structure: StructureType, name: &str) -> Option<&ItemContent> {
        self.eggs.recipes().cost_of(structure, name)
    }

    // -- Factories --

    /// Register a factory at every block of its structure. Rejected, with
    /// nothing registered, if any block already belongs to a factory.
    pub fn add_factory(&mut self, factory: Box<dyn Factory>) -> Result<FactoryId, LocationError> {
        let name = factory.name().to_string();
        commit(&mut self.locations, &mut self.factories, factory).inspect_err(|e| {
            warn!(factory = %name, error = %e, "factory registration rejected");
        })
    }

    /// Unregister a factory from the manager and every location it held.
    pub fn remove_factory(&mut self, id: FactoryId) -> Option<Box<dyn Factory>> {
        let factory = self.factories.remove(id)?;
        self.locations.remove(id);
        Some(factory)
    }

    pub fn factory(&self, id: FactoryId) -> Option<&dyn Factory> {
        self.factories.get(id)
    }

    pub fn factory_mut(&mut self, id: FactoryId) -> Option<&mut (dyn Factory + 'static)> {
        self.factories.get_mut(id)
    }

    pub fn factory_id_at(&self, loc: &Location) -> Option<FactoryId> {
        self.locations.lookup(loc)
    }

    /// The factory with a block at `loc`, if any.
    pub fn factory_at(&self, loc: &Location) -> Option<&dyn Factory> {
        self.factories.get(self.locations.lookup(loc)?)
    }

    pub fn factory_exists_at(&self, loc: &Location) -> bool {
        self.locations.occupied(loc)
    }

    pub fn factories(&self) -> &FactoryRegistry {
        &self.factories
    }

    pub fn locations(&self) -> &LocationIndex {
        &self.locations
    }

    pub fn factory_count(&self) -> usize {
        self.factories.len()
    }

    // -- Creation --

    /// Try to create a factory with `anchor` as its center block.
    pub fn attempt_creation(
        &mut self,
        world: &mut dyn World,
        anchor: Location,
        actor: &Actor,
        sink: &mut dyn NotificationSink,
    ) -> CreationOutcome {
        CreationDispatcher {
            detectors: &self.detectors,
            eggs: &self.eggs,
            locations: &mut self.locations,
            factories: &mut self.factories,
        }
        .attempt(world, anchor, actor, sink)
    }

    // -- Lifecycle --

    pub fn save_factories(&mut self) -> Result<(), PersistError> {
        self.lifecycle.save_all(&self.factories)
    }

    /// Load persisted factories, committing them one at a time. Entries
    /// that fail to revive or collide with an already loaded factory are
    /// skipped. Returns how many were registered.
    pub fn load_factories(&mut self) -> Result<usize, PersistError> {
        let loaded = self.lifecycle.load_all(&self.eggs)?;
        let mut committed = 0;
        for factory in loaded {
            if self.add_factory(factory).is_ok() {
                committed += 1;
            }
        }
        Ok(committed)
    }

    /// Save all factories, then deactivate each of them once.
    pub fn shut_down(&mut self) -> Result<(), PersistError> {
        self.lifecycle.shut_down(&mut self.factories)
    }
}
