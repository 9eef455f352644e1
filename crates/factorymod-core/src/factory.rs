//! Live factories and the registry that owns them.
//!
//! A [`Factory`] is opaque to the core: its production runtime lives
//! elsewhere. The core only needs its name, the structure it occupies, a
//! way to persist it, and a way to shut it down.

use crate::id::FactoryId;
use crate::structure::Structure;
use slotmap::SlotMap;

/// A live factory instance produced by an [`Egg`](crate::egg::Egg).
pub trait Factory: std::fmt::Debug {
    /// Display name, shown to players on creation.
    fn name(&self) -> &str;

    /// Name of the egg that hatched this factory. Used to resolve the egg
    /// again when loading persisted factories.
    fn egg_name(&self) -> &str;

    /// The structure whose blocks this factory occupies.
    fn structure(&self) -> &Structure;

    /// Stop the factory. Called once at shutdown, after saving.
    fn deactivate(&mut self);

    /// Serialize runtime state for save files. Empty by default (stateless).
    fn save_state(&self) -> Vec<u8> {
        Vec::new()
    }

    /// Downcast to `&dyn Any` for access to concrete factory types.
    fn as_any(&self) -> &dyn std::any::Any;
}

/// The set of all live factories, keyed by [`FactoryId`].
///
/// Only owns the factories. Which locations they occupy is tracked by
/// [`LocationIndex`](crate::location::LocationIndex); keeping the two in
/// step is the manager's job.
#[derive(Debug, Default)]
pub struct FactoryRegistry {
    factories: SlotMap<FactoryId, Box<dyn Factory>>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, factory: Box<dyn Factory>) -> FactoryId {
        self.factories.insert(factory)
    }

    pub fn remove(&mut self, id: FactoryId) -> Option<Box<dyn Factory>> {
        self.factories.remove(id)
    }

    pub fn get(&self, id: FactoryId) -> Option<&dyn Factory> {
        self.factories.get(id).map(|f| f.as_ref())
    }

    pub fn get_mut(&mut self, id: FactoryId) -> Option<&mut (dyn Factory + 'static)> {
        self.factories.get_mut(id).map(|f| f.as_mut())
    }

    pub fn contains(&self, id: FactoryId) -> bool {
        self.factories.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FactoryId, &dyn Factory)> {
        self.factories.iter().map(|(id, f)| (id, f.as_ref()))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (FactoryId, &mut Box<dyn Factory>)> {
        self.factories.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
