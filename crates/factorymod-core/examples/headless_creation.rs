//! Headless creation example: one egg, one structure, one attempt.
//!
//! Registers a "Smeltery" egg on the chest / crafting table / furnace
//! structure, builds that structure in an in-memory world, fills the chest
//! with the setup cost and asks the manager to create the factory. Then
//! saves and shuts down.
//!
//! Run with: `RUST_LOG=debug cargo run -p factorymod-core --example headless_creation`

use factorymod_core::config::ManagerConfig;
use factorymod_core::egg::{Egg, ReviveError};
use factorymod_core::factory::Factory;
use factorymod_core::id::*;
use factorymod_core::item::ItemContent;
use factorymod_core::manager::FactoryManager;
use factorymod_core::material::Material;
use factorymod_core::notify::LogSink;
use factorymod_core::persist::{FactoryRecord, MemoryGateway};
use factorymod_core::structure::{Structure, StructureType};
use factorymod_core::world::{MemoryWorld, World};
use std::sync::Arc;
use tracing::info;

const IRON: ItemKindId = ItemKindId(0);

#[derive(Debug)]
struct Smeltery {
    structure: Structure,
    active: bool,
}

impl Factory for Smeltery {
    fn name(&self) -> &str {
        "Smeltery"
    }

    fn egg_name(&self) -> &str {
        "Smeltery"
    }

    fn structure(&self) -> &Structure {
        &self.structure
    }

    fn deactivate(&mut self) {
        self.active = false;
    }

    fn save_state(&self) -> Vec<u8> {
        vec![u8::from(self.active)]
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[derive(Debug)]
struct SmelteryEgg;

impl Egg for SmelteryEgg {
    fn name(&self) -> &str {
        "Smeltery"
    }

    fn hatch(&self, structure: &Structure, actor: &Actor) -> Option<Box<dyn Factory>> {
        info!(actor = %actor.name, "hatching smeltery");
        Some(Box::new(Smeltery {
            structure: structure.clone(),
            active: true,
        }))
    }

    fn revive(&self, record: &FactoryRecord) -> Result<Box<dyn Factory>, ReviveError> {
        Ok(Box::new(Smeltery {
            structure: record.structure.clone(),
            active: record.state.first() == Some(&1),
        }))
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "factorymod_core=info".into()),
        )
        .init();

    // --- Step 1: Startup phase ---

    let mut builder = FactoryManager::builder(ManagerConfig::default());
    builder.register_creation_egg(
        StructureType::ChestCraftingFurnace,
        ItemContent::new().with(IRON, 5),
        Arc::new(SmelteryEgg),
    );
    builder.set_gateway(Box::new(MemoryGateway::new()));
    let mut manager = builder.build();

    // --- Step 2: Build the structure ---

    let mut world = MemoryWorld::new();
    let workbench = Location::new(WorldId(0), 0, 64, 0);
    let chest = workbench.offset(1, 0, 0).expect("coordinates in range");
    world.set(workbench, Material::Workbench);
    world.set(chest, Material::Chest);
    world.set(workbench.offset(-1, 0, 0).expect("coordinates in range"), Material::Furnace);
    world
        .inventory_mut(chest)
        .expect("chest has an inventory")
        .add(IRON, 5);

    // --- Step 3: Interact ---

    let actor = Actor::new(1, "steve");
    let outcome = manager.attempt_creation(&mut world, workbench, &actor, &mut LogSink);
    println!("outcome: {outcome:?}");
    println!("factory at workbench: {:?}", manager.factory_at(&workbench).map(|f| f.name()));
    println!("registered locations: {}", manager.locations().location_count());

    // A second attempt on the same anchor is ignored.
    let again = manager.attempt_creation(&mut world, workbench, &actor, &mut LogSink);
    println!("second attempt: {again:?}");

    // --- Step 4: Shut down ---

    manager.shut_down().expect("in-memory save succeeds");
    println!("shut down with {} factories", manager.factory_count());
}
