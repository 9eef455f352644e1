//! Setup loading: reads data files, resolves item names, builds definitions.
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and
//! deserialization helpers, plus [`load_setup`] which turns a data directory
//! into a [`Setup`] ready for a
//! [`ManagerBuilder`](factorymod_core::manager::ManagerBuilder).

use crate::catalog::ItemCatalog;
use crate::schema::{EggData, ItemData};
use factorymod_core::config::ManagerConfig;
use factorymod_core::egg::EggDefinition;
use factorymod_core::item::ItemContent;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: &'static str, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A name reference could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    /// A duplicate name was found.
    #[error("duplicate name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name.
///
/// Looks for `{base_name}.ron`, `{base_name}.toml`, and `{base_name}.json`.
/// Returns `Ok(None)` if none exists, or `Err(ConflictingFormats)` if more
/// than one format is present.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in ["ron", "toml", "json"] {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing,
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Like [`find_data_file`], but a missing file is an error.
pub fn require_data_file(dir: &Path, base_name: &'static str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name,
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

fn parse_error(path: &Path, e: impl std::fmt::Display) -> DataLoadError {
    DataLoadError::Parse {
        file: path.to_path_buf(),
        detail: e.to_string(),
    }
}

/// Read a file and deserialize it according to its format.
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(path, e)),
    }
}

/// Deserialize a list from a file. TOML files hold the array under
/// `toml_key` in a top-level table; RON and JSON hold a bare `Vec<T>`.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    if detect_format(path)? != Format::Toml {
        return deserialize_file(path);
    }

    let content = std::fs::read_to_string(path)?;
    let table: toml::Value = toml::from_str(&content).map_err(|e| parse_error(path, e))?;
    let array = table
        .get(toml_key)
        .ok_or_else(|| parse_error(path, format!("missing key '{toml_key}' in TOML file")))?
        .clone();
    array
        .try_into()
        .map_err(|e: toml::de::Error| parse_error(path, e))
}

// ===========================================================================
// Name resolution helpers
// ===========================================================================

/// Look up a name in a map, returning an `UnresolvedRef` error if not found.
pub fn resolve_name<'a, V>(
    map: &'a HashMap<String, V>,
    name: &str,
    file: &Path,
    expected_kind: &'static str,
) -> Result<&'a V, DataLoadError> {
    map.get(name).ok_or_else(|| DataLoadError::UnresolvedRef {
        file: file.to_path_buf(),
        name: name.to_string(),
        expected_kind,
    })
}

/// Check whether a name already exists in a map, returning a `DuplicateName`
/// error if so.
pub fn check_duplicate<V>(
    map: &HashMap<String, V>,
    name: &str,
    file: &Path,
) -> Result<(), DataLoadError> {
    if map.contains_key(name) {
        Err(DataLoadError::DuplicateName {
            file: file.to_path_buf(),
            name: name.to_string(),
        })
    } else {
        Ok(())
    }
}

// ===========================================================================
// Setup
// ===========================================================================

/// Everything a manager needs from data files at startup.
#[derive(Debug, Clone)]
pub struct Setup {
    pub config: ManagerConfig,
    pub items: ItemCatalog,
    pub eggs: Vec<EggDefinition>,
}

/// Load `config.*`, `items.*` and the optional `eggs.*` from `dir`.
///
/// Item ids follow the order of the items file. Egg setup costs are
/// resolved against that catalog; an unknown item name fails the load.
pub fn load_setup(dir: &Path) -> Result<Setup, DataLoadError> {
    let config_path = require_data_file(dir, "config")?;
    let config: ManagerConfig = deserialize_file(&config_path)?;
    debug!(file = %config_path.display(), "loaded manager config");

    let items_path = require_data_file(dir, "items")?;
    let items = load_items(&items_path)?;

    let eggs = match find_data_file(dir, "eggs")? {
        Some(path) => load_eggs(&path, &items)?,
        None => Vec::new(),
    };

    info!(
        dir = %dir.display(),
        items = items.len(),
        eggs = eggs.len(),
        upgrades = eggs.iter().filter(|e| e.is_upgrade_only()).count(),
        "loaded factory setup"
    );
    Ok(Setup { config, items, eggs })
}

fn load_items(path: &Path) -> Result<ItemCatalog, DataLoadError> {
    let data: Vec<ItemData> = deserialize_list(path, "items")?;
    let mut catalog = ItemCatalog::new();
    for item in &data {
        check_duplicate(catalog.ids(), &item.name, path)?;
        catalog.insert(&item.name);
    }
    Ok(catalog)
}

fn load_eggs(path: &Path, items: &ItemCatalog) -> Result<Vec<EggDefinition>, DataLoadError> {
    let data: Vec<EggData> = deserialize_list(path, "eggs")?;
    let mut seen: HashMap<String, ()> = HashMap::new();
    let mut eggs = Vec::with_capacity(data.len());

    for egg in data {
        check_duplicate(&seen, &egg.name, path)?;
        seen.insert(egg.name.clone(), ());

        let Some(structure) = egg.structure else {
            if !egg.setup_cost.is_empty() {
                warn!(egg = %egg.name, "setup cost ignored on upgrade-only egg");
            }
            eggs.push(EggDefinition::upgrade(&egg.name));
            continue;
        };

        let mut cost = ItemContent::new();
        for (item, quantity) in &egg.setup_cost {
            let kind = *resolve_name(items.ids(), item, path, "item")?;
            cost = cost.with(kind, *quantity);
        }
        eggs.push(EggDefinition::creation(&egg.name, structure, cost));
    }

    Ok(eggs)
}

// ===========================================================================
// Tests
// ===========================================================================
