//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::egg::{Egg, ReviveError};
use crate::factory::Factory;
use crate::id::*;
use crate::lifecycle::{LoadedEntry, PersistenceGateway};
use crate::material::Material;
use crate::notify::Notice;
use crate::persist::{FactoryRecord, MemoryGateway, PersistError};
use crate::registry::EggRegistry;
use crate::structure::{Structure, StructureDetector, StructureType};
use crate::world::{MemoryWorld, World};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

// ===========================================================================
// Items and actors
// ===========================================================================

pub fn iron() -> ItemKindId {
    ItemKindId(0)
}
pub fn gold() -> ItemKindId {
    ItemKindId(1)
}
pub fn coal() -> ItemKindId {
    ItemKindId(2)
}
pub fn copper() -> ItemKindId {
    ItemKindId(3)
}

pub fn steve() -> Actor {
    Actor::new(1, "steve")
}

/// Notices collected in delivery order.
pub type RecordingSink = Vec<(ActorId, Notice)>;

// ===========================================================================
// Locations and structures
// ===========================================================================

pub fn origin() -> Location {
    Location::new(WorldId(0), 0, 64, 0)
}

/// Workbench at `at`, chest to the east, furnace to the west.
pub fn cfc_structure(at: Location) -> Structure {
    Structure::new(
        StructureType::ChestCraftingFurnace,
        [at, at.offset(-1, 0, 0).unwrap()],
        at.offset(1, 0, 0).unwrap(),
    )
}

/// Dropper at `at`, one glass block east, dispenser after it.
pub fn pipe_structure(at: Location) -> Structure {
    Structure::new(
        StructureType::Pipe,
        [at.offset(1, 0, 0).unwrap(), at.offset(2, 0, 0).unwrap()],
        at,
    )
}

/// Place the blocks of [`cfc_structure`] and return the chest location.
pub fn build_cfc(world: &mut MemoryWorld, at: Location) -> Location {
    world.set(at, Material::Workbench);
    world.set(at.offset(1, 0, 0).unwrap(), Material::Chest);
    world.set(at.offset(-1, 0, 0).unwrap(), Material::Furnace);
    at.offset(1, 0, 0).unwrap()
}

/// Place the blocks of [`pipe_structure`] and return the dropper location.
pub fn build_pipe(world: &mut MemoryWorld, at: Location) -> Location {
    world.set(at, Material::Dropper);
    world.set(at.offset(1, 0, 0).unwrap(), Material::Glass);
    world.set(at.offset(2, 0, 0).unwrap(), Material::Dispenser);
    at
}

/// Dispenser at `at` with a furnace on top. Returns the dispenser location.
pub fn build_block_furnace(world: &mut MemoryWorld, at: Location) -> Location {
    world.set(at, Material::Dispenser);
    world.set(at.offset(0, 1, 0).unwrap(), Material::Furnace);
    at
}

/// Put items into the inventory at `loc`.
pub fn fill(world: &mut MemoryWorld, loc: Location, items: &[(ItemKindId, u32)]) {
    if let Some(inv) = world.inventory_mut(loc) {
        for &(kind, quantity) in items {
            inv.add(kind, quantity);
        }
    }
}

// ===========================================================================
// Journal
// ===========================================================================

/// Shared, ordered log of lifecycle calls across test doubles.
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub fn record(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }
}

// ===========================================================================
// Factories and eggs
// ===========================================================================

/// A factory with no runtime that counts deactivations.
#[derive(Debug)]
pub struct TestFactory {
    name: String,
    egg: String,
    structure: Structure,
    state: Vec<u8>,
    deactivations: u32,
    journal: Option<Journal>,
}

impl TestFactory {
    /// A factory hatched by an egg of the same name.
    pub fn new(name: &str, structure: Structure) -> Self {
        Self {
            name: name.to_string(),
            egg: name.to_string(),
            structure,
            state: Vec::new(),
            deactivations: 0,
            journal: None,
        }
    }

    pub fn with_egg(mut self, egg: &str) -> Self {
        self.egg = egg.to_string();
        self
    }

    pub fn with_state(mut self, state: Vec<u8>) -> Self {
        self.state = state;
        self
    }

    pub fn with_journal(mut self, journal: &Journal) -> Self {
        self.journal = Some(journal.clone());
        self
    }

    pub fn deactivations(&self) -> u32 {
        self.deactivations
    }

    pub fn state(&self) -> &[u8] {
        &self.state
    }
}

impl Factory for TestFactory {
    fn name(&self) -> &str {
        &self.name
    }

    fn egg_name(&self) -> &str {
        &self.egg
    }

    fn structure(&self) -> &Structure {
        &self.structure
    }

    fn deactivate(&mut self) {
        self.deactivations += 1;
        if let Some(journal) = &self.journal {
            journal.record(format!("deactivate {}", self.name));
        }
    }

    fn save_state(&self) -> Vec<u8> {
        self.state.clone()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// An egg that hatches a [`TestFactory`] named after itself, or declines.
#[derive(Debug)]
pub struct TestEgg {
    name: String,
    decline: bool,
    hatches: Cell<u32>,
}

impl TestEgg {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            decline: false,
            hatches: Cell::new(0),
        }
    }

    /// An egg whose external preconditions never hold.
    pub fn declining(name: &str) -> Self {
        Self {
            decline: true,
            ..Self::new(name)
        }
    }

    /// How often `hatch` was called.
    pub fn hatch_count(&self) -> u32 {
        self.hatches.get()
    }
}

impl Egg for TestEgg {
    fn name(&self) -> &str {
        &self.name
    }

    fn hatch(&self, structure: &Structure, _actor: &Actor) -> Option<Box<dyn Factory>> {
        self.hatches.set(self.hatches.get() + 1);
        if self.decline {
            return None;
        }
        Some(Box::new(TestFactory::new(&self.name, structure.clone())))
    }

    fn revive(&self, record: &FactoryRecord) -> Result<Box<dyn Factory>, ReviveError> {
        if record.state == b"corrupt" {
            return Err(ReviveError::InvalidState("corrupt".to_string()));
        }
        Ok(Box::new(
            TestFactory::new(&record.name, record.structure.clone())
                .with_egg(&self.name)
                .with_state(record.state.clone()),
        ))
    }
}

// ===========================================================================
// Detectors
// ===========================================================================

/// A detector that reports a fixed result and counts its invocations.
#[derive(Debug)]
pub struct CountingDetector {
    ty: StructureType,
    result: Option<Structure>,
    calls: Rc<Cell<u32>>,
}

impl CountingDetector {
    /// Reports `result` for any anchor.
    pub fn new(ty: StructureType, result: Option<Structure>) -> Self {
        Self {
            ty,
            result,
            calls: Rc::new(Cell::new(0)),
        }
    }

    /// Handle to the invocation count that outlives moving the detector.
    pub fn calls(&self) -> Rc<Cell<u32>> {
        Rc::clone(&self.calls)
    }
}

impl StructureDetector for CountingDetector {
    fn structure_type(&self) -> StructureType {
        self.ty
    }

    fn detect(&self, _world: &dyn World, _anchor: Location) -> Option<Structure> {
        self.calls.set(self.calls.get() + 1);
        self.result.clone()
    }
}

// ===========================================================================
// Gateways
// ===========================================================================

/// A [`MemoryGateway`] that journals every save.
#[derive(Debug)]
pub struct JournalGateway {
    inner: MemoryGateway,
    journal: Journal,
}

impl JournalGateway {
    pub fn new(journal: &Journal) -> Self {
        Self {
            inner: MemoryGateway::new(),
            journal: journal.clone(),
        }
    }
}

impl PersistenceGateway for JournalGateway {
    fn save(&mut self, factories: &[&dyn Factory]) -> Result<(), PersistError> {
        self.journal.record(format!("save {}", factories.len()));
        self.inner.save(factories)
    }

    fn load(&mut self, eggs: &EggRegistry) -> Result<Vec<LoadedEntry>, PersistError> {
        self.journal.record("load");
        self.inner.load(eggs)
    }
}

/// A gateway whose storage is always unavailable.
#[derive(Debug, Default)]
pub struct FailingGateway;

impl PersistenceGateway for FailingGateway {
    fn save(&mut self, _factories: &[&dyn Factory]) -> Result<(), PersistError> {
        Err(PersistError::Io(std::io::Error::other("storage unavailable")))
    }

    fn load(&mut self, _eggs: &EggRegistry) -> Result<Vec<LoadedEntry>, PersistError> {
        Err(PersistError::Io(std::io::Error::other("storage unavailable")))
    }
}
