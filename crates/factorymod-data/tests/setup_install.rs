//! Loading a setup directory and running creation against it.

use factorymod_core::dispatch::CreationOutcome;
use factorymod_core::egg::Egg;
use factorymod_core::manager::FactoryManager;
use factorymod_core::structure::StructureType;
use factorymod_core::test_utils::*;
use factorymod_core::world::{MemoryWorld, World};
use factorymod_data::load_setup;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

fn make_setup_dir(suffix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "factorymod_setup_{suffix}_{}",
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();

    fs::write(dir.join("config.ron"), "(redstone_recipe_change: 3)").unwrap();
    // Ids line up with the test_utils item constructors.
    fs::write(
        dir.join("items.json"),
        r#"[{"name": "iron"}, {"name": "gold"}, {"name": "coal"}, {"name": "copper"}]"#,
    )
    .unwrap();
    fs::write(
        dir.join("eggs.toml"),
        r#"
[[eggs]]
name = "Smeltery"
structure = "chest_crafting_furnace"
setup_cost = [["iron", 5]]

[[eggs]]
name = "Copper Pipe"
structure = "pipe"
setup_cost = [["copper", 8]]

[[eggs]]
name = "Smeltery II"
"#,
    )
    .unwrap();
    dir
}

#[test]
fn installed_setup_creates_factories() {
    let dir = make_setup_dir("install");
    let setup = load_setup(&dir).unwrap();

    let mut builder = FactoryManager::builder(setup.config);
    builder.install(setup.eggs, |def| Arc::new(TestEgg::new(&def.name)) as Arc<dyn Egg>);
    let mut manager = builder.build();

    assert_eq!(manager.redstone_recipe_change(), 3);
    assert!(manager.egg("Smeltery II").is_some());
    assert_eq!(
        manager
            .setup_cost(StructureType::Pipe, "Copper Pipe")
            .map(|c| c.quantity(copper())),
        Some(8)
    );

    let mut world = MemoryWorld::new();
    let chest = build_cfc(&mut world, origin());
    fill(&mut world, chest, &[(iron(), 5)]);
    let mut sink = RecordingSink::new();

    let outcome = manager.attempt_creation(&mut world, origin(), &steve(), &mut sink);

    assert!(matches!(outcome, CreationOutcome::Created(_)));
    assert_eq!(manager.factory_at(&origin()).map(|f| f.name()), Some("Smeltery"));
    assert!(world.inventory(chest).unwrap().is_empty());

    let _ = fs::remove_dir_all(&dir);
}
