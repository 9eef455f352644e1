//! Save, load and shutdown orchestration.
//!
//! The encoding itself belongs to a [`PersistenceGateway`]; this module only
//! decides when it runs and what happens to entries that fail.

use crate::egg::ReviveError;
use crate::factory::{Factory, FactoryRegistry};
use crate::persist::PersistError;
use crate::registry::EggRegistry;
use tracing::{info, warn};

/// One persisted factory after revival, or why it could not be revived.
pub type LoadedEntry = Result<Box<dyn Factory>, ReviveError>;

/// Storage backend for live factories.
pub trait PersistenceGateway: std::fmt::Debug {
    /// Persist the full live factory set, replacing any earlier save.
    fn save(&mut self, factories: &[&dyn Factory]) -> Result<(), PersistError>;

    /// Rebuild persisted factories, resolving each one's egg by name.
    /// Failures are reported per entry.
    fn load(&mut self, eggs: &EggRegistry) -> Result<Vec<LoadedEntry>, PersistError>;
}

/// Runs a [`PersistenceGateway`] at the lifecycle boundaries.
#[derive(Debug)]
pub struct LifecycleGateway {
    gateway: Box<dyn PersistenceGateway>,
}

impl LifecycleGateway {
    pub fn new(gateway: Box<dyn PersistenceGateway>) -> Self {
        Self { gateway }
    }

    /// Hand every live factory to the gateway. Blocks until written.
    pub fn save_all(&mut self, factories: &FactoryRegistry) -> Result<(), PersistError> {
        info!(count = factories.len(), "Attempting to save factory data");
        let all: Vec<&dyn Factory> = factories.iter().map(|(_, f)| f).collect();
        self.gateway.save(&all)
    }

    /// Rebuild persisted factories. Entries that fail to revive are logged
    /// and skipped; only a failure of the whole file is an error.
    pub fn load_all(&mut self, eggs: &EggRegistry) -> Result<Vec<Box<dyn Factory>>, PersistError> {
        info!("Attempting to load factory data");
        let entries = self.gateway.load(eggs)?;
        let total = entries.len();
        let loaded: Vec<Box<dyn Factory>> = entries
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(factory) => Some(factory),
                Err(e) => {
                    warn!(error = %e, "skipping persisted factory");
                    None
                }
            })
            .collect();
        info!(loaded = loaded.len(), skipped = total - loaded.len(), "factory data loaded");
        Ok(loaded)
    }

    /// Save, then deactivate every live factory exactly once.
    ///
    /// Factories are deactivated even when the save fails; the save error
    /// is returned afterwards.
    pub fn shut_down(&mut self, factories: &mut FactoryRegistry) -> Result<(), PersistError> {
        let saved = self.save_all(factories);
        if let Err(e) = &saved {
            warn!(error = %e, "saving factories during shutdown failed");
        }
        for (_, factory) in factories.iter_mut() {
            factory.deactivate();
        }
        saved
    }
}
