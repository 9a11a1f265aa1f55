//! Durable key-value storage and the active/draft settings pair built on it.

use std::{
    collections::{BTreeMap, HashMap},
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use directories::ProjectDirs;

use crate::{
    error::{PersistenceError, SettingsError},
    settings::{FALLBACK_LOCATION, SettingUpdate, Settings},
};

/// Key under which the default location is persisted.
pub const DEFAULT_LOCATION_KEY: &str = "defaultLocation";

pub trait KeyValueStore: Send + Sync + Debug {
    fn put(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
}

/// Process-local store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn put(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries
            .lock()
            .map_err(|_| PersistenceError::Format("memory store lock poisoned".into()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self
            .entries
            .lock()
            .map_err(|_| PersistenceError::Format("memory store lock poisoned".into()))?
            .get(key)
            .cloned())
    }
}

/// TOML table of string keys on disk. Every `put` rewrites the file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `store.toml` in the platform data directory.
    pub fn open_default() -> Result<Self, PersistenceError> {
        let dirs = ProjectDirs::from("dev", "weatherdash", "weatherdash").ok_or_else(|| {
            PersistenceError::Format("could not determine platform data directory".into())
        })?;
        Ok(Self::new(dirs.data_dir().join("store.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, PersistenceError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        toml::from_str(&contents).map_err(|e| PersistenceError::Format(e.to_string()))
    }
}

impl KeyValueStore for FileStore {
    fn put(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let mut entries = match self.read_all() {
            Ok(entries) => entries,
            Err(PersistenceError::Format(reason)) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %reason,
                    "Store file unreadable; rewriting it"
                );
                BTreeMap::new()
            }
            Err(err) => return Err(err),
        };
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents =
            toml::to_string_pretty(&entries).map_err(|e| PersistenceError::Format(e.to_string()))?;
        fs::write(&self.path, contents)?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.read_all()?.remove(key))
    }
}

/// Active settings plus an independently edited draft.
///
/// `active` only changes through [`commit`](Self::commit) and
/// [`reset_to_defaults`](Self::reset_to_defaults); both replace the whole record.
#[derive(Debug)]
pub struct SettingsStore {
    active: Settings,
    draft: Settings,
    storage: Box<dyn KeyValueStore>,
}

impl SettingsStore {
    /// Start from `preferences`, taking the default location from storage when
    /// one was persisted. Otherwise the preferences' own location is used, and
    /// [`FALLBACK_LOCATION`] if that is blank.
    pub fn load(storage: Box<dyn KeyValueStore>, preferences: Settings) -> Self {
        let fallback = if preferences.default_location.trim().is_empty() {
            FALLBACK_LOCATION.to_string()
        } else {
            preferences.default_location.clone()
        };

        let default_location = match storage.get(DEFAULT_LOCATION_KEY) {
            Ok(Some(saved)) if !saved.trim().is_empty() => saved,
            Ok(_) => fallback,
            Err(err) => {
                tracing::warn!(error = %err, "Could not read persisted default location");
                fallback
            }
        };

        let active = Settings { default_location, ..preferences };
        Self { draft: active.clone(), active, storage }
    }

    pub fn active(&self) -> &Settings {
        &self.active
    }

    pub fn draft(&self) -> &Settings {
        &self.draft
    }

    pub fn open_editing(&mut self) {
        self.draft = self.active.clone();
    }

    pub fn update_draft(&mut self, update: SettingUpdate) {
        self.draft.apply(update);
    }

    pub fn update_draft_field(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let update = SettingUpdate::parse(key, value)?;
        self.update_draft(update);
        Ok(())
    }

    pub fn commit(&mut self) {
        self.active = self.draft.clone();
        self.persist_default_location();
        tracing::info!(default_location = %self.active.default_location, "Settings committed");
    }

    pub fn discard(&mut self) {
        self.draft = self.active.clone();
    }

    pub fn reset_to_defaults(&mut self) {
        self.active = Settings::default();
        self.draft = Settings::default();
        self.persist_default_location();
        tracing::info!("Settings reset to defaults");
    }

    fn persist_default_location(&self) {
        if let Err(err) = self.storage.put(DEFAULT_LOCATION_KEY, &self.active.default_location) {
            tracing::warn!(error = %err, "Could not persist default location; keeping it in memory");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{TemperatureUnit, WindUnit};

    /// Storage that fails every operation.
    #[derive(Debug)]
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn put(&self, _: &str, _: &str) -> Result<(), PersistenceError> {
            Err(PersistenceError::Io(std::io::Error::other("disk on fire")))
        }

        fn get(&self, _: &str) -> Result<Option<String>, PersistenceError> {
            Err(PersistenceError::Io(std::io::Error::other("disk on fire")))
        }
    }

    fn store_with(mem: &MemoryStore) -> SettingsStore {
        SettingsStore::load(Box::new(mem.clone()), Settings::default())
    }

    #[test]
    fn initial_state_falls_back_to_london() {
        let store = store_with(&MemoryStore::new());
        assert_eq!(store.active().default_location, "London");
        assert_eq!(store.active(), store.draft());
    }

    #[test]
    fn blank_preference_location_falls_back_to_london() {
        let prefs = Settings { default_location: "  ".into(), ..Settings::default() };
        let store = SettingsStore::load(Box::new(MemoryStore::new()), prefs);
        assert_eq!(store.active().default_location, "London");
    }

    #[test]
    fn initial_state_uses_persisted_location() {
        let mem = MemoryStore::new();
        mem.put(DEFAULT_LOCATION_KEY, "Tokyo").unwrap();

        let store = store_with(&mem);
        assert_eq!(store.active().default_location, "Tokyo");
        assert_eq!(store.draft().default_location, "Tokyo");
    }

    #[test]
    fn discard_leaves_active_untouched() {
        let mut store = store_with(&MemoryStore::new());
        let before = store.active().temp_unit;

        store.open_editing();
        store.update_draft_field("tempUnit", "F").unwrap();
        assert_eq!(store.draft().temp_unit, TemperatureUnit::F);
        assert_eq!(store.active().temp_unit, before);

        store.discard();
        assert_eq!(store.active().temp_unit, before);
        assert_eq!(store.draft(), store.active());
    }

    #[test]
    fn commit_persists_default_location() {
        let mem = MemoryStore::new();
        let mut store = store_with(&mem);

        store.update_draft_field("defaultLocation", "Paris").unwrap();
        store.update_draft(SettingUpdate::WindUnit(WindUnit::Ms));
        store.commit();

        assert_eq!(mem.get(DEFAULT_LOCATION_KEY).unwrap().as_deref(), Some("Paris"));
        assert_eq!(store.active().default_location, "Paris");
        assert_eq!(store.active().wind_unit, WindUnit::Ms);
    }

    #[test]
    fn open_editing_copies_active_over_stale_draft() {
        let mut store = store_with(&MemoryStore::new());
        store.update_draft(SettingUpdate::Animations(false));

        store.open_editing();
        assert!(store.draft().animations);
    }

    #[test]
    fn bad_update_leaves_draft_unchanged() {
        let mut store = store_with(&MemoryStore::new());
        let before = store.draft().clone();

        assert!(store.update_draft_field("pressureUnit", "atm").is_err());
        assert!(store.update_draft_field("nope", "1").is_err());
        assert_eq!(store.draft(), &before);
    }

    #[test]
    fn reset_restores_defaults_and_persists_london() {
        let mem = MemoryStore::new();
        mem.put(DEFAULT_LOCATION_KEY, "Lima").unwrap();
        let mut store = store_with(&mem);

        store.update_draft(SettingUpdate::TempUnit(TemperatureUnit::F));
        store.commit();
        store.reset_to_defaults();

        assert_eq!(store.active(), &Settings::default());
        assert_eq!(store.draft(), &Settings::default());
        assert_eq!(mem.get(DEFAULT_LOCATION_KEY).unwrap().as_deref(), Some("London"));
    }

    #[test]
    fn broken_storage_degrades_silently() {
        let mut store = SettingsStore::load(Box::new(BrokenStore), Settings::default());
        assert_eq!(store.active().default_location, "London");

        store.update_draft_field("defaultLocation", "Rome").unwrap();
        store.commit();
        assert_eq!(store.active().default_location, "Rome");
    }

    #[test]
    fn file_store_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.toml");

        let store = FileStore::new(&path);
        assert_eq!(store.get(DEFAULT_LOCATION_KEY).unwrap(), None);

        store.put(DEFAULT_LOCATION_KEY, "Berlin").unwrap();
        store.put("other", "value").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get(DEFAULT_LOCATION_KEY).unwrap().as_deref(), Some("Berlin"));
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn file_store_reports_corrupt_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.toml");
        fs::write(&path, "this is = = not toml").unwrap();

        let err = FileStore::new(&path).get(DEFAULT_LOCATION_KEY).unwrap_err();
        assert!(matches!(err, PersistenceError::Format(_)));
    }

    #[test]
    fn commit_over_corrupt_file_rewrites_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.toml");
        fs::write(&path, "garbage = = =").unwrap();

        let mut store = SettingsStore::load(Box::new(FileStore::new(&path)), Settings::default());
        assert_eq!(store.active().default_location, "London");

        store.update_draft_field("defaultLocation", "Paris").unwrap();
        store.commit();

        let file = FileStore::new(&path);
        assert_eq!(file.get(DEFAULT_LOCATION_KEY).unwrap().as_deref(), Some("Paris"));
    }
}
