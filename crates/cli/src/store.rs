//! File-backed `SettingsStore`: a JSON object of key -> raw string value.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use trifield::settings::SettingsStore;

pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    dirty: bool,
}

impl JsonFileStore {
    /// Open `path`; a missing file is an empty store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let raw = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_slice(&raw)
                .with_context(|| format!("parsing settings store {}", path.display()))?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            entries,
            dirty: false,
        })
    }

    /// Write back if anything changed.
    pub fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_vec_pretty(&self.entries)?)
            .with_context(|| format!("writing {}", self.path.display()))?;
        self.dirty = false;
        Ok(())
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use trifield::settings::{load_settings, save_settings, SearchSettings, SETTINGS_KEY};

    #[test]
    fn persists_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/settings.json");
        let mut store = JsonFileStore::open(&path).unwrap();
        assert_eq!(load_settings(&store), SearchSettings::default());
        let s = SearchSettings {
            max_results: 3,
            ..SearchSettings::default()
        };
        save_settings(&mut store, &s);
        store.flush().unwrap();
        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(load_settings(&reopened), s);
    }

    #[test]
    fn legacy_record_on_disk_is_migrated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut doc = BTreeMap::new();
        doc.insert(
            SETTINGS_KEY.to_string(),
            r#"{"tolerance":5,"maxResults":20,"maxPortals":300}"#.to_string(),
        );
        fs::write(&path, serde_json::to_vec(&doc).unwrap()).unwrap();
        let store = JsonFileStore::open(&path).unwrap();
        let s = load_settings(&store);
        assert_eq!(s.threshold, SearchSettings::default().threshold);
        assert_eq!(s.max_results, 20);
    }
}
