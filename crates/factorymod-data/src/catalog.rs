//! Item-kind name catalog.

use factorymod_core::id::ItemKindId;
use std::collections::HashMap;

/// Item kinds by name, with ids assigned in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    ids: HashMap<String, ItemKindId>,
    names: Vec<String>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a kind under the next free id. Returns `None` if the name is
    /// already taken; the catalog is unchanged in that case.
    pub fn insert(&mut self, name: &str) -> Option<ItemKindId> {
        if self.ids.contains_key(name) {
            return None;
        }
        let id = ItemKindId(self.names.len() as u32);
        self.ids.insert(name.to_string(), id);
        self.names.push(name.to_string());
        Some(id)
    }

    pub fn get(&self, name: &str) -> Option<ItemKindId> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: ItemKindId) -> Option<&str> {
        self.names.get(id.0 as usize).map(String::as_str)
    }

    /// Name -> id map, for reference resolution.
    pub fn ids(&self) -> &HashMap<String, ItemKindId> {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate `(id, name)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemKindId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (ItemKindId(i as u32), name.as_str()))
    }
}
