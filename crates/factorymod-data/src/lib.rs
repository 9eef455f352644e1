pub mod catalog;
pub mod loader;
pub mod schema;

pub use catalog::ItemCatalog;
pub use loader::{load_setup, DataLoadError, Setup};
