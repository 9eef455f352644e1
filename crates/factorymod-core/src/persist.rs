//! Save file encoding and the stock persistence gateways.
//!
//! Factories are saved as a versioned header followed by one
//! [`FactoryRecord`] per factory, encoded with `bitcode`. Loading decodes
//! the file and revives each record through the egg that originally
//! hatched it; a record that fails to revive is reported on its own and
//! does not spoil the others.

use crate::egg::ReviveError;
use crate::factory::Factory;
use crate::lifecycle::{LoadedEntry, PersistenceGateway};
use crate::registry::EggRegistry;
use crate::structure::Structure;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic number identifying a factory save file.
pub const SAVE_MAGIC: u32 = 0xFAC7_0D01;

/// Current format version. Increment when breaking the encoding.
pub const FORMAT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors reading or writing a whole save file.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
    #[error("bitcode decoding failed: {0}")]
    Decode(String),
    #[error("invalid magic number: expected 0x{:08X}, got 0x{:08X}", SAVE_MAGIC, .0)]
    InvalidMagic(u32),
    #[error("unsupported format version: expected {}, got {}", FORMAT_VERSION, .0)]
    UnsupportedVersion(u32),
    #[error("save file from future version {0} (this build supports up to {FORMAT_VERSION})")]
    FutureVersion(u32),
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Everything needed to bring one factory back after a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryRecord {
    /// Name of the egg that hatched the factory.
    pub egg: String,
    /// Display name of the factory.
    pub name: String,
    pub structure: Structure,
    /// Opaque runtime state from [`Factory::save_state`].
    #[serde(default)]
    pub state: Vec<u8>,
}

impl FactoryRecord {
    pub fn capture(factory: &dyn Factory) -> Self {
        Self {
            egg: factory.egg_name().to_string(),
            name: factory.name().to_string(),
            structure: factory.structure().clone(),
            state: factory.save_state(),
        }
    }
}

/// Header prepended to every save file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveHeader {
    pub magic: u32,
    pub version: u32,
    /// Number of records that follow.
    pub count: u32,
}

impl SaveHeader {
    pub fn new(count: u32) -> Self {
        Self {
            magic: SAVE_MAGIC,
            version: FORMAT_VERSION,
            count,
        }
    }

    pub fn validate(&self) -> Result<(), PersistError> {
        if self.magic != SAVE_MAGIC {
            return Err(PersistError::InvalidMagic(self.magic));
        }
        if self.version > FORMAT_VERSION {
            return Err(PersistError::FutureVersion(self.version));
        }
        if self.version < FORMAT_VERSION {
            return Err(PersistError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SaveFile {
    header: SaveHeader,
    records: Vec<FactoryRecord>,
}

/// Encode factories into save file bytes.
pub fn encode(factories: &[&dyn Factory]) -> Result<Vec<u8>, PersistError> {
    let records: Vec<FactoryRecord> = factories.iter().map(|f| FactoryRecord::capture(*f)).collect();
    let count = u32::try_from(records.len())
        .map_err(|_| PersistError::Encode(format!("{} factories exceed the record limit", records.len())))?;
    let file = SaveFile {
        header: SaveHeader::new(count),
        records,
    };
    bitcode::serialize(&file).map_err(|e| PersistError::Encode(e.to_string()))
}

/// Decode save file bytes into records, validating the header and its
/// record count.
pub fn decode(data: &[u8]) -> Result<Vec<FactoryRecord>, PersistError> {
    let file: SaveFile =
        bitcode::deserialize(data).map_err(|e| PersistError::Decode(e.to_string()))?;
    file.header.validate()?;
    if file.records.len() != file.header.count as usize {
        return Err(PersistError::Decode(format!(
            "header announces {} records, found {}",
            file.header.count,
            file.records.len()
        )));
    }
    Ok(file.records)
}

/// Revive each record through its egg. One result per record, in order.
pub fn revive_all(records: &[FactoryRecord], eggs: &EggRegistry) -> Vec<LoadedEntry> {
    records
        .iter()
        .map(|record| {
            let egg = eggs
                .by_name(&record.egg)
                .ok_or_else(|| ReviveError::UnknownEgg(record.egg.clone()))?;
            egg.revive(record)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Gateways
// ---------------------------------------------------------------------------

/// Persists factories to a single file on disk.
///
/// A missing file loads as an empty factory set.
#[derive(Debug, Clone)]
pub struct FileGateway {
    path: PathBuf,
}

impl FileGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceGateway for FileGateway {
    fn save(&mut self, factories: &[&dyn Factory]) -> Result<(), PersistError> {
        let bytes = encode(factories)?;
        debug!(path = %self.path().display(), bytes = bytes.len(), "writing factory save file");
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // Write then rename so a crash mid-save keeps the previous file.
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn load(&mut self, eggs: &EggRegistry) -> Result<Vec<LoadedEntry>, PersistError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path().display(), "no factory save file yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let records = decode(&bytes)?;
        Ok(revive_all(&records, eggs))
    }
}

/// Keeps the last save in memory. Useful for headless runs and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryGateway {
    data: Option<Vec<u8>>,
    saves: usize,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes of the last save, if any.
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Records of the last save.
    pub fn records(&self) -> Result<Vec<FactoryRecord>, PersistError> {
        self.data.as_deref().map_or(Ok(Vec::new()), decode)
    }

    /// Number of completed saves.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl PersistenceGateway for MemoryGateway {
    fn save(&mut self, factories: &[&dyn Factory]) -> Result<(), PersistError> {
        self.data = Some(encode(factories)?);
        self.saves += 1;
        Ok(())
    }

    fn load(&mut self, eggs: &EggRegistry) -> Result<Vec<LoadedEntry>, PersistError> {
        Ok(revive_all(&self.records()?, eggs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use std::sync::Arc;

    fn eggs_with(names: &[&str]) -> EggRegistry {
        let mut eggs = EggRegistry::new();
        for name in names {
            eggs.register_upgrade_egg(Arc::new(TestEgg::new(name)));
        }
        eggs
    }

    #[test]
    fn header_validation() {
        assert!(SaveHeader::new(0).validate().is_ok());

        let mut bad = SaveHeader::new(0);
        bad.magic = 0xDEAD_BEEF;
        assert!(matches!(bad.validate(), Err(PersistError::InvalidMagic(0xDEAD_BEEF))));

        let mut future = SaveHeader::new(0);
        future.version = FORMAT_VERSION + 1;
        assert!(matches!(future.validate(), Err(PersistError::FutureVersion(_))));

        let mut old = SaveHeader::new(0);
        old.version = 0;
        assert!(matches!(old.validate(), Err(PersistError::UnsupportedVersion(0))));
    }

    #[test]
    fn record_captures_factory_identity() {
        let f = TestFactory::new("Smeltery", cfc_structure(origin())).with_state(vec![1, 2, 3]);
        let record = FactoryRecord::capture(&f);
        assert_eq!(record.egg, "Smeltery");
        assert_eq!(record.name, "Smeltery");
        assert_eq!(record.structure, cfc_structure(origin()));
        assert_eq!(record.state, vec![1, 2, 3]);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(decode(&[1, 2, 3]), Err(PersistError::Decode(_))));
    }

    #[test]
    fn header_count_must_match_records() {
        let record = FactoryRecord::capture(&TestFactory::new("Smeltery", cfc_structure(origin())));
        let file = SaveFile {
            header: SaveHeader::new(2),
            records: vec![record],
        };
        let bytes = bitcode::serialize(&file).unwrap();
        assert!(matches!(decode(&bytes), Err(PersistError::Decode(_))));

        let ok = encode(&[&TestFactory::new("Smeltery", cfc_structure(origin()))]).unwrap();
        assert_eq!(decode(&ok).unwrap().len(), 1);
    }

    #[test]
    fn memory_gateway_revives_known_eggs_and_reports_unknown() {
        let a = TestFactory::new("Smeltery", cfc_structure(origin()));
        let b = TestFactory::new("Gone", pipe_structure(origin().offset(10, 0, 0).unwrap()));

        let mut gateway = MemoryGateway::new();
        gateway.save(&[&a, &b]).unwrap();
        assert_eq!(gateway.save_count(), 1);

        let loaded = gateway.load(&eggs_with(&["Smeltery"])).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].as_ref().map(|f| f.name().to_string()).ok(), Some("Smeltery".into()));
        assert_eq!(
            loaded[1].as_ref().err(),
            Some(&ReviveError::UnknownEgg("Gone".to_string()))
        );
    }

    #[test]
    fn empty_memory_gateway_loads_nothing() {
        let mut gateway = MemoryGateway::new();
        assert!(gateway.load(&EggRegistry::new()).unwrap().is_empty());
    }

    #[test]
    fn file_gateway_round_trip() {
        let dir = std::env::temp_dir().join(format!("factorymod_persist_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let mut gateway = FileGateway::new(dir.join("factories.bin"));

        assert!(gateway.load(&eggs_with(&["Smeltery"])).unwrap().is_empty());

        let f = TestFactory::new("Smeltery", cfc_structure(origin())).with_state(vec![9, 8]);
        gateway.save(&[&f]).unwrap();
        assert!(gateway.path().exists());
        assert!(!gateway.path().with_extension("tmp").exists());

        let loaded = gateway.load(&eggs_with(&["Smeltery"])).unwrap();
        assert_eq!(loaded.len(), 1);
        let revived = loaded.into_iter().next().unwrap().unwrap();
        assert_eq!(revived.structure(), &cfc_structure(origin()));
        let revived = revived.as_any().downcast_ref::<TestFactory>().unwrap();
        assert_eq!(revived.state(), &[9, 8]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_gateway_rejects_foreign_files() {
        let dir = std::env::temp_dir().join(format!("factorymod_foreign_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("factories.bin");
        std::fs::write(&path, b"not a save file").unwrap();

        let mut gateway = FileGateway::new(&path);
        assert!(gateway.load(&EggRegistry::new()).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
