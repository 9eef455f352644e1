//! Serde data file structs for FactoryMod setup.
//!
//! These structs define the on-disk format for the item catalog and egg
//! definitions. They are deserialized from RON, JSON, or TOML data files and
//! then resolved into core types by the loader. The configuration file maps
//! directly onto [`ManagerConfig`](factorymod_core::config::ManagerConfig).

use factorymod_core::structure::StructureType;
use serde::Deserialize;

// ===========================================================================
// Items
// ===========================================================================

/// An item kind in the catalog. Ids follow file order.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemData {
    pub name: String,
}

// ===========================================================================
// Eggs
// ===========================================================================

/// An egg definition in a data file.
///
/// Eggs without a `structure` are upgrade-only and cannot be created
/// directly from a structure.
#[derive(Debug, Clone, Deserialize)]
pub struct EggData {
    pub name: String,
    #[serde(default)]
    pub structure: Option<StructureType>,
    /// `(item name, quantity)` pairs. Repeated items accumulate.
    #[serde(default)]
    pub setup_cost: Vec<(String, u32)>,
}

// ===========================================================================
// TOML wrappers
// ===========================================================================

/// Wrapper for a list of items in TOML format.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlItems {
    pub items: Vec<ItemData>,
}

/// Wrapper for a list of eggs in TOML format.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlEggs {
    pub eggs: Vec<EggData>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn egg_defaults_to_upgrade_only() {
        let egg: EggData = serde_json::from_str(r#"{"name": "Smeltery II"}"#).unwrap();
        assert!(egg.structure.is_none());
        assert!(egg.setup_cost.is_empty());
    }

    #[test]
    fn egg_structure_uses_snake_case() {
        let egg: EggData = serde_json::from_str(
            r#"{"name": "Pipe", "structure": "pipe", "setup_cost": [["copper", 2]]}"#,
        )
        .unwrap();
        assert_eq!(egg.structure, Some(StructureType::Pipe));
        assert_eq!(egg.setup_cost, vec![("copper".to_string(), 2)]);
    }

    #[test]
    fn toml_eggs_wrapper() {
        let wrapper: TomlEggs = toml::from_str(
            r#"
[[eggs]]
name = "Smeltery"
structure = "chest_crafting_furnace"
setup_cost = [["iron", 5]]

[[eggs]]
name = "Smeltery II"
"#,
        )
        .unwrap();
        assert_eq!(wrapper.eggs.len(), 2);
        assert_eq!(
            wrapper.eggs[0].structure,
            Some(StructureType::ChestCraftingFurnace)
        );
        assert!(wrapper.eggs[1].structure.is_none());
    }
}
