use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, TimepieceError};

const SETTINGS_FILE: &str = "settings.json";
const KEY_USE_12_HOUR: &str = "use12Hour";
const KEY_SWATCH_ID: &str = "chosenSwatchId";
const KEY_SWATCH_COLOR: &str = "chosenSwatchColor";

/// What the last session left behind for the accent color. Empty values
/// count as unset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SavedSwatch {
    pub id: Option<String>,
    pub color: Option<String>,
}

/// Flat string key/value settings persisted as one JSON object.
///
/// Persistence is best effort: a missing or unreadable file starts the
/// session with no saved values, and failed writes only log a warning.
pub struct SettingsStore {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl SettingsStore {
    pub fn open(dir: &Path) -> Self {
        let path = dir.join(SETTINGS_FILE);
        let values = match read_values(&path) {
            Ok(values) => values,
            Err(e) => {
                log::warn!("Could not load settings: {}", e);
                BTreeMap::new()
            }
        };
        Self {
            path: Some(path),
            values,
        }
    }

    /// A store that never touches the disk.
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            values: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data =
            serde_json::to_string_pretty(&self.values).map_err(TimepieceError::EncodeSettings)?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Absent means 12-hour, and that default is written back so the next
    /// load is explicit.
    pub fn load_use_12_hour(&mut self) -> bool {
        match self.get(KEY_USE_12_HOUR) {
            Some(saved) => saved == "true",
            None => {
                self.save_use_12_hour(true);
                true
            }
        }
    }

    pub fn save_use_12_hour(&mut self, use_12_hour: bool) {
        if let Err(e) = self.set(KEY_USE_12_HOUR, if use_12_hour { "true" } else { "false" }) {
            log::warn!("Failed to save hour format: {}", e);
        }
    }

    pub fn load_swatch(&self) -> SavedSwatch {
        let saved = |key| {
            self.get(key)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        SavedSwatch {
            id: saved(KEY_SWATCH_ID),
            color: saved(KEY_SWATCH_COLOR),
        }
    }

    pub fn save_swatch_id(&mut self, id: &str) {
        if let Err(e) = self.set(KEY_SWATCH_ID, id) {
            log::warn!("Could not save swatch to storage: {}", e);
        }
    }
}

fn read_values(path: &Path) -> Result<BTreeMap<String, String>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|source| TimepieceError::MalformedSettings {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_format_defaults_to_12_hour_and_is_written_back() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SettingsStore::open(dir.path());
        assert!(store.load_use_12_hour());

        let reopened = SettingsStore::open(dir.path());
        assert_eq!(reopened.get("use12Hour"), Some("true"));
    }

    #[test]
    fn saved_format_round_trips_through_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SettingsStore::open(dir.path());
        store.save_use_12_hour(false);

        let mut reopened = SettingsStore::open(dir.path());
        assert!(!reopened.load_use_12_hour());
    }

    #[test]
    fn unexpected_format_value_reads_as_24_hour() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), r#"{"use12Hour":"yes"}"#).unwrap();
        let mut store = SettingsStore::open(dir.path());
        assert!(!store.load_use_12_hour());
        assert_eq!(store.get("use12Hour"), Some("yes"));
    }

    #[test]
    fn both_swatch_keys_are_loaded() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(SETTINGS_FILE),
            r##"{"chosenSwatchColor":"#ff0000","chosenSwatchId":"swatch-teal"}"##,
        )
        .unwrap();
        let store = SettingsStore::open(dir.path());
        let saved = store.load_swatch();
        assert_eq!(saved.id.as_deref(), Some("swatch-teal"));
        assert_eq!(saved.color.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn swatch_color_is_the_fallback() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), r##"{"chosenSwatchColor":"#ff0000"}"##).unwrap();
        let store = SettingsStore::open(dir.path());
        assert_eq!(store.load_swatch().id, None);
        assert_eq!(store.load_swatch().color.as_deref(), Some("#ff0000"));
        assert_eq!(SettingsStore::in_memory().load_swatch(), SavedSwatch::default());
    }

    #[test]
    fn malformed_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "not json").unwrap();
        let mut store = SettingsStore::open(dir.path());
        assert_eq!(store.load_swatch(), SavedSwatch::default());
        // the default still gets written over the broken file
        assert!(store.load_use_12_hour());
        assert_eq!(SettingsStore::open(dir.path()).get("use12Hour"), Some("true"));
    }

    #[test]
    fn write_failure_keeps_the_session_value() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();
        let mut store = SettingsStore::open(&blocker.join("nested"));
        store.save_swatch_id("swatch-rose");
        assert_eq!(store.load_swatch().id.as_deref(), Some("swatch-rose"));
    }
}
