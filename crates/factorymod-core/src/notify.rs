use crate::id::{Actor, ActorId};
use crate::structure::StructureType;
use std::fmt;
use tracing::info;

/// A message for the actor behind a creation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A factory was created and registered.
    Created { factory: String },
    /// The structure was complete but its contents match no recipe.
    NoRecipe { structure: StructureType },
    /// The hatched factory would overlap blocks of an existing factory.
    Overlap { factory: String },
}

impl Notice {
    /// Whether this notice reports success.
    pub fn is_success(&self) -> bool {
        matches!(self, Notice::Created { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Created { factory } => write!(f, "Successfully created {factory}"),
            Notice::NoRecipe { structure } => write!(
                f,
                "There is no {} with the given creation materials",
                structure.label()
            ),
            Notice::Overlap { factory } => {
                write!(f, "{factory} would overlap an existing factory")
            }
        }
    }
}

/// Delivers notices to actors. Formatting and transport are the sink's call.
pub trait NotificationSink {
    fn notify(&mut self, actor: &Actor, notice: Notice);
}

/// Collects notices in order; handy for tests and replays.
impl NotificationSink for Vec<(ActorId, Notice)> {
    fn notify(&mut self, actor: &Actor, notice: Notice) {
        self.push((actor.id, notice));
    }
}

/// Forwards notices to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&mut self, actor: &Actor, notice: Notice) {
        info!(actor = %actor.name, success = notice.is_success(), "{notice}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_recipe_text_names_the_structure() {
        let cases = [
            (StructureType::ChestCraftingFurnace, "There is no factory with the given creation materials"),
            (StructureType::Pipe, "There is no pipe with the given creation materials"),
            (StructureType::BlockFurnace, "There is no sorter with the given creation materials"),
        ];
        for (structure, text) in cases {
            assert_eq!(Notice::NoRecipe { structure }.to_string(), text);
        }
    }

    #[test]
    fn created_text_names_the_factory() {
        let n = Notice::Created {
            factory: "Smeltery".to_string(),
        };
        assert_eq!(n.to_string(), "Successfully created Smeltery");
        assert!(n.is_success());
    }

    #[test]
    fn vec_sink_records_actor_and_notice() {
        let mut sink: Vec<(ActorId, Notice)> = Vec::new();
        let actor = Actor::new(7, "steve");
        sink.notify(
            &actor,
            Notice::NoRecipe {
                structure: StructureType::Pipe,
            },
        );
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].0, ActorId(7));
    }
}
