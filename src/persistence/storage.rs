//! Save slots and the media that hold them

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::core::error::{Result, TycoonError};
use crate::persistence::snapshot::SaveData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SaveSlot {
    Primary,
    /// Last known good save, rotated from the primary on every write
    Backup,
}

/// A medium that can hold the two save slots
pub trait SaveStore {
    fn read(&self, slot: SaveSlot) -> Result<Option<String>>;
    fn write(&mut self, slot: SaveSlot, contents: &str) -> Result<()>;
    fn remove(&mut self, slot: SaveSlot) -> Result<()>;
}

/// Saves as JSON files in a directory
#[derive(Debug, Clone)]
pub struct FileSaveStore {
    dir: PathBuf,
}

impl FileSaveStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, slot: SaveSlot) -> PathBuf {
        match slot {
            SaveSlot::Primary => self.dir.join("save.json"),
            SaveSlot::Backup => self.dir.join("save.backup.json"),
        }
    }
}

impl SaveStore for FileSaveStore {
    fn read(&self, slot: SaveSlot) -> Result<Option<String>> {
        match fs::read_to_string(self.path(slot)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, slot: SaveSlot, contents: &str) -> Result<()> {
        let path = self.path(slot);
        let tmp = path.with_extension("json.tmp");
        fs::create_dir_all(&self.dir)
            .and_then(|_| fs::write(&tmp, contents))
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| TycoonError::Storage(format!("{}: {}", path.display(), e)))
    }

    fn remove(&mut self, slot: SaveSlot) -> Result<()> {
        match fs::remove_file(self.path(slot)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory slots with an optional per-slot byte quota
#[derive(Debug, Clone, Default)]
pub struct MemorySaveStore {
    slots: BTreeMap<SaveSlot, String>,
    quota: Option<usize>,
}

impl MemorySaveStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(bytes: usize) -> Self {
        Self {
            slots: BTreeMap::new(),
            quota: Some(bytes),
        }
    }

    pub fn raw(&self, slot: SaveSlot) -> Option<&str> {
        self.slots.get(&slot).map(String::as_str)
    }
}

impl SaveStore for MemorySaveStore {
    fn read(&self, slot: SaveSlot) -> Result<Option<String>> {
        Ok(self.slots.get(&slot).cloned())
    }

    fn write(&mut self, slot: SaveSlot, contents: &str) -> Result<()> {
        if let Some(quota) = self.quota {
            if contents.len() > quota {
                return Err(TycoonError::Storage(format!(
                    "save of {} bytes exceeds quota of {}",
                    contents.len(),
                    quota
                )));
            }
        }
        self.slots.insert(slot, contents.to_string());
        Ok(())
    }

    fn remove(&mut self, slot: SaveSlot) -> Result<()> {
        self.slots.remove(&slot);
        Ok(())
    }
}

/// Write a save, moving the previous primary into the backup slot first.
///
/// A primary that no longer loads is never rotated, so the backup always
/// holds the last good save.
pub fn save_game<S: SaveStore + ?Sized>(store: &mut S, data: &SaveData) -> Result<()> {
    let json = data.to_json()?;
    if let Some(previous) = store.read(SaveSlot::Primary)? {
        match SaveData::from_json(&previous) {
            Ok(_) => store.write(SaveSlot::Backup, &previous)?,
            Err(e) => tracing::warn!("Not rotating unreadable primary into backup: {}", e),
        }
    }
    store.write(SaveSlot::Primary, &json)
}

/// Load the primary save; `Ok(None)` when there is none
pub fn load_game<S: SaveStore + ?Sized>(store: &S) -> Result<Option<SaveData>> {
    match store.read(SaveSlot::Primary)? {
        Some(text) => SaveData::from_json(&text).map(Some).map_err(|e| {
            tracing::warn!("Primary save rejected: {}", e);
            e
        }),
        None => Ok(None),
    }
}

/// Load the backup, treating anything unusable as absent
pub fn load_backup<S: SaveStore + ?Sized>(store: &S) -> Option<SaveData> {
    let text = store.read(SaveSlot::Backup).ok().flatten()?;
    match SaveData::from_json(&text) {
        Ok(data) => Some(data),
        Err(e) => {
            tracing::warn!("Backup save rejected: {}", e);
            None
        }
    }
}

/// Primary save, else the backup when the primary is corrupted.
///
/// A version mismatch is returned as an error rather than papered over.
pub fn load_with_fallback<S: SaveStore + ?Sized>(store: &S) -> Result<Option<SaveData>> {
    match load_game(store) {
        Ok(data) => Ok(data),
        Err(e) if e.is_recoverable() => Ok(load_backup(store)),
        Err(e) => Err(e),
    }
}

pub fn delete_save<S: SaveStore + ?Sized>(store: &mut S) -> Result<()> {
    store.remove(SaveSlot::Primary)?;
    store.remove(SaveSlot::Backup)
}

pub fn has_save<S: SaveStore + ?Sized>(store: &S) -> bool {
    matches!(store.read(SaveSlot::Primary), Ok(Some(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::snapshot::CURRENT_SCHEMA_VERSION;
    use crate::progress::{AchievementTracker, UpgradeLedger};
    use crate::simulation::progression::Progression;

    fn data(currency: u64) -> SaveData {
        SaveData {
            schema_version: CURRENT_SCHEMA_VERSION,
            timestamp: 1,
            progression: Progression::new(currency),
            populations: BTreeMap::new(),
            upgrades: UpgradeLedger::new(),
            achievements: AchievementTracker::new(),
        }
    }

    #[test]
    fn test_save_rotates_backup() {
        let mut store = MemorySaveStore::new();
        assert!(!has_save(&store));
        save_game(&mut store, &data(1)).unwrap();
        assert!(load_backup(&store).is_none());
        save_game(&mut store, &data(2)).unwrap();

        assert!(has_save(&store));
        assert_eq!(load_game(&store).unwrap().unwrap().progression.currency, 2);
        assert_eq!(load_backup(&store).unwrap().progression.currency, 1);
    }

    #[test]
    fn test_corrupt_primary_falls_back() {
        let mut store = MemorySaveStore::new();
        save_game(&mut store, &data(1)).unwrap();
        save_game(&mut store, &data(2)).unwrap();
        store.write(SaveSlot::Primary, "not json").unwrap();

        assert!(matches!(load_game(&store), Err(TycoonError::Parse(_))));
        let recovered = load_with_fallback(&store).unwrap().unwrap();
        assert_eq!(recovered.progression.currency, 1);
    }

    #[test]
    fn test_failed_save_keeps_good_backup() {
        let quota = data(1).to_json().unwrap().len();
        let mut store = MemorySaveStore::with_quota(quota);
        save_game(&mut store, &data(1)).unwrap();
        save_game(&mut store, &data(1)).unwrap();
        store.write(SaveSlot::Primary, "garbage").unwrap();

        // Too large for the quota, after the rotation step has run
        let err = save_game(&mut store, &data(1_000_000)).unwrap_err();
        assert!(matches!(err, TycoonError::Storage(_)));

        assert_eq!(store.raw(SaveSlot::Primary), Some("garbage"));
        let recovered = load_with_fallback(&store).unwrap().unwrap();
        assert_eq!(recovered.progression.currency, 1);
    }

    #[test]
    fn test_quota_surfaces_storage_error() {
        let mut store = MemorySaveStore::with_quota(16);
        let err = save_game(&mut store, &data(1)).unwrap_err();
        assert!(matches!(err, TycoonError::Storage(_)));
        assert!(err.is_recoverable());
        assert!(!has_save(&store));
    }

    #[test]
    fn test_delete_clears_both_slots() {
        let mut store = MemorySaveStore::new();
        save_game(&mut store, &data(1)).unwrap();
        save_game(&mut store, &data(2)).unwrap();
        delete_save(&mut store).unwrap();
        assert!(!has_save(&store));
        assert!(load_backup(&store).is_none());
        assert!(load_game(&store).unwrap().is_none());
    }
}
