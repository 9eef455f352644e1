use crate::material::Material;
use serde::{Deserialize, Serialize};

/// Startup configuration for a [`FactoryManager`](crate::manager::FactoryManager).
///
/// Every field has a default, so data files only need the values they change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Item players hold to interact with factories.
    pub interaction_material: Material,
    /// Whether the external block-protection integration is active.
    /// Consulted by eggs and factories, never by the core.
    pub citadel_enabled: bool,
    /// Redstone power level at or above which a factory is switched on.
    pub redstone_power_on: u8,
    /// Power change (either direction) that cycles a factory's recipe.
    pub redstone_recipe_change: u8,
    /// Lore marking compacted items, for compaction listeners.
    pub compact_lore: Option<String>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            interaction_material: Material::Stick,
            citadel_enabled: false,
            redstone_power_on: 7,
            redstone_recipe_change: 2,
            compact_lore: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = ManagerConfig::default();
        assert_eq!(c.interaction_material, Material::Stick);
        assert!(!c.citadel_enabled);
        assert_eq!(c.redstone_power_on, 7);
        assert_eq!(c.redstone_recipe_change, 2);
        assert!(c.compact_lore.is_none());
    }
}
