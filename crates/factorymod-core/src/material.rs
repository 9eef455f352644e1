use crate::structure::StructureType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Block and item materials the factory core cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    Air,
    Stone,
    Glass,
    Workbench,
    Furnace,
    BurningFurnace,
    Chest,
    Dropper,
    Dispenser,
    Stick,
}

impl Material {
    /// Whether blocks of this material carry an inventory.
    pub fn has_inventory(&self) -> bool {
        matches!(
            self,
            Material::Furnace
                | Material::BurningFurnace
                | Material::Chest
                | Material::Dropper
                | Material::Dispenser
        )
    }

    pub fn is_furnace(&self) -> bool {
        matches!(self, Material::Furnace | Material::BurningFurnace)
    }
}

/// Static material sets for anchoring detection and triggering interaction.
///
/// Assembled once from the union of every [`StructureType`]'s materials and
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct MaterialClassifier {
    center_blocks: HashSet<Material>,
    interaction_blocks: HashSet<Material>,
}

impl Default for MaterialClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialClassifier {
    pub fn new() -> Self {
        let mut center_blocks = HashSet::new();
        let mut interaction_blocks = HashSet::new();
        for ty in StructureType::PRIORITY {
            center_blocks.extend(ty.center_materials().iter().copied());
            interaction_blocks.extend(ty.interaction_materials().iter().copied());
        }
        Self {
            center_blocks,
            interaction_blocks,
        }
    }

    /// Whether a block of this material could anchor a new factory.
    pub fn is_possible_center_block(&self, material: Material) -> bool {
        self.center_blocks.contains(&material)
    }

    /// Whether interacting with a factory block of this material should
    /// trigger a reaction.
    pub fn is_possible_interaction_block(&self, material: Material) -> bool {
        self.interaction_blocks.contains(&material)
    }
}
