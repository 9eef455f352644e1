//! Creation recipes and the name-indexed egg registry.
//!
//! Both are populated at startup through
//! [`ManagerBuilder`](crate::manager::ManagerBuilder) and only read once the
//! manager is built.
//!
//! Re-registering an existing recipe key or egg name replaces the earlier
//! binding (last write wins). The replaced egg is returned and a warning is
//! logged. An egg displaced by name also loses its recipes, so every recipe
//! hatches an egg that `by_name` still resolves.

use crate::egg::Egg;
use crate::item::ItemContent;
use crate::structure::StructureType;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::warn;

// ---------------------------------------------------------------------------
// RecipeRegistry
// ---------------------------------------------------------------------------

/// Per structure type, the exact item content that hatches each egg.
#[derive(Debug, Default)]
pub struct RecipeRegistry {
    recipes: HashMap<StructureType, BTreeMap<ItemContent, Arc<dyn Egg>>>,
}

impl RecipeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `content` on `structure` to `egg`. Returns the egg previously
    /// bound to that key, if any.
    pub fn register(
        &mut self,
        structure: StructureType,
        content: ItemContent,
        egg: Arc<dyn Egg>,
    ) -> Option<Arc<dyn Egg>> {
        let replaced = self
            .recipes
            .entry(structure)
            .or_default()
            .insert(content, egg);
        if let Some(old) = &replaced {
            warn!(
                structure = ?structure,
                egg = old.name(),
                "creation recipe overwritten"
            );
        }
        replaced
    }

    /// Exact-match lookup. Supersets and subsets of a recipe do not match.
    pub fn lookup(&self, structure: StructureType, content: &ItemContent) -> Option<&Arc<dyn Egg>> {
        self.recipes.get(&structure)?.get(content)
    }

    /// Reverse lookup: the setup cost of the egg named `name` on `structure`.
    /// Structure types without any recipes yield `None`.
    pub fn cost_of(&self, structure: StructureType, name: &str) -> Option<&ItemContent> {
        self.recipes
            .get(&structure)?
            .iter()
            .find(|(_, egg)| egg.name() == name)
            .map(|(content, _)| content)
    }

    /// Drop every recipe that hatches `egg`. Returns how many were removed.
    pub fn unbind(&mut self, egg: &Arc<dyn Egg>) -> usize {
        let mut removed = 0;
        for recipes in self.recipes.values_mut() {
            let before = recipes.len();
            recipes.retain(|_, bound| !Arc::ptr_eq(bound, egg));
            removed += before - recipes.len();
        }
        removed
    }

    /// Number of recipes registered for a structure type.
    pub fn recipe_count(&self, structure: StructureType) -> usize {
        self.recipes.get(&structure).map_or(0, |r| r.len())
    }
}

// ---------------------------------------------------------------------------
// EggRegistry
// ---------------------------------------------------------------------------

/// All eggs by name, creation and upgrade-only alike, plus the creation
/// recipes.
#[derive(Debug, Default)]
pub struct EggRegistry {
    by_name: BTreeMap<String, Arc<dyn Egg>>,
    recipes: RecipeRegistry,
}

impl EggRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an egg that hatches from `content` on `structure`.
    /// Returns the egg previously bound under the same name, if any.
    pub fn register_creation_egg(
        &mut self,
        structure: StructureType,
        content: ItemContent,
        egg: Arc<dyn Egg>,
    ) -> Option<Arc<dyn Egg>> {
        self.recipes.register(structure, content, Arc::clone(&egg));
        self.index(egg)
    }

    /// Register an egg reachable by name only.
    pub fn register_upgrade_egg(&mut self, egg: Arc<dyn Egg>) -> Option<Arc<dyn Egg>> {
        self.index(egg)
    }

    fn index(&mut self, egg: Arc<dyn Egg>) -> Option<Arc<dyn Egg>> {
        let replaced = self.by_name.insert(egg.name().to_string(), Arc::clone(&egg));
        if let Some(old) = &replaced {
            let dropped = if Arc::ptr_eq(old, &egg) { 0 } else { self.recipes.unbind(old) };
            warn!(egg = old.name(), dropped_recipes = dropped, "egg name rebound");
        }
        replaced
    }

    pub fn by_name(&self, name: &str) -> Option<&Arc<dyn Egg>> {
        self.by_name.get(name)
    }

    pub fn recipes(&self) -> &RecipeRegistry {
        &self.recipes
    }

    /// Every egg in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Egg>)> {
        self.by_name.iter().map(|(name, egg)| (name.as_str(), egg))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
