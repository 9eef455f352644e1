use crate::factory::Factory;
use crate::id::Actor;
use crate::item::ItemContent;
use crate::persist::FactoryRecord;
use crate::structure::{Structure, StructureType};

/// Errors from rebuilding a factory out of a persisted record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviveError {
    #[error("no egg named '{0}' is registered")]
    UnknownEgg(String),
    #[error("egg '{0}' cannot revive persisted factories")]
    Unsupported(String),
    #[error("invalid factory state: {0}")]
    InvalidState(String),
}

/// A named factory template.
///
/// Creation eggs are matched against the contents of a completed structure;
/// upgrade-only eggs are looked up by name and never matched.
pub trait Egg: std::fmt::Debug {
    /// Unique name across all registered eggs.
    fn name(&self) -> &str;

    /// Build a factory on a completed structure for `actor`. Returning
    /// `None` declines; the egg tells the actor why if it wants to.
    fn hatch(&self, structure: &Structure, actor: &Actor) -> Option<Box<dyn Factory>>;

    /// Rebuild a factory from a save file record.
    fn revive(&self, _record: &FactoryRecord) -> Result<Box<dyn Factory>, ReviveError> {
        Err(ReviveError::Unsupported(self.name().to_string()))
    }
}

/// A data-file description of an egg: its name and, for creation eggs,
/// the structure type and exact setup cost that hatch it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EggDefinition {
    pub name: String,
    /// `None` for upgrade-only eggs.
    pub creation: Option<(StructureType, ItemContent)>,
}

impl EggDefinition {
    pub fn creation(name: &str, structure: StructureType, setup_cost: ItemContent) -> Self {
        Self {
            name: name.to_string(),
            creation: Some((structure, setup_cost)),
        }
    }

    pub fn upgrade(name: &str) -> Self {
        Self {
            name: name.to_string(),
            creation: None,
        }
    }

    pub fn is_upgrade_only(&self) -> bool {
        self.creation.is_none()
    }
}
