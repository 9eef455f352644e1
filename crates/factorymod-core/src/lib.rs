//! FactoryMod Core -- factory registry and creation matching.
//!
//! Factories are named constructs built from specific block arrangements.
//! This crate tracks which world locations belong to which live factory,
//! recognizes candidate structures, matches their contents against creation
//! recipes, and turns a matching structure into a registered factory in one
//! step.
//!
//! # Creation Flow
//!
//! [`manager::FactoryManager::attempt_creation`] runs for an interaction
//! with a center block:
//!
//! 1. **Occupancy** -- an anchor that already belongs to a factory is ignored.
//! 2. **Detection** -- structure types are tried in a fixed priority order;
//!    the first complete one is the only one evaluated.
//! 3. **Matching** -- the content block's inventory is snapshotted and looked
//!    up exactly in that type's recipes.
//! 4. **Hatching** -- the matched egg builds the factory, or declines.
//! 5. **Commit** -- the factory is registered at every block of its
//!    structure and the content block is emptied.
//!
//! Anything short of a full commit leaves every registry untouched.
//!
//! # Key Types
//!
//! - [`manager::FactoryManager`] -- Context object owning all registries.
//! - [`manager::ManagerBuilder`] -- Startup phase; registries freeze on build.
//! - [`item::ItemContent`] -- Structural, immutable recipe key.
//! - [`registry::RecipeRegistry`] / [`registry::EggRegistry`] -- Recipes by
//!   structure type and content, eggs by name.
//! - [`location::LocationIndex`] -- Location -> factory index.
//! - [`geometry::Detectors`] -- One structure detector per type.
//! - [`lifecycle::LifecycleGateway`] -- Save, load and shutdown.
//! - [`persist`] -- Versioned save files via bitcode.

pub mod config;
pub mod dispatch;
pub mod egg;
pub mod factory;
pub mod geometry;
pub mod id;
pub mod item;
pub mod lifecycle;
pub mod location;
pub mod manager;
pub mod material;
pub mod notify;
pub mod persist;
pub mod registry;
pub mod structure;
pub mod world;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
