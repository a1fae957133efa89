use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    sync::RwLock,
};

use intake_core::{CoreError, KeyValueStore};
use tracing::{debug, warn};

const STORE_FILE_NAME: &str = "store.json";
const TMP_SUFFIX: &str = "tmp";

/// File-backed key-value store.
///
/// All entries live in one JSON object on disk. Reads come from an in-memory
/// copy loaded at open; every write rewrites the file through a temp file.
pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Opens `store.json` inside `dir`, creating the directory when missing.
    pub fn open_in(dir: &Path) -> Result<Self, CoreError> {
        fs::create_dir_all(dir)?;
        Self::open(dir.join(STORE_FILE_NAME))
    }

    pub fn open(path: PathBuf) -> Result<Self, CoreError> {
        let entries = if path.exists() {
            let data = fs::read_to_string(&path)?;
            if data.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&data).map_err(|err| {
                    CoreError::Serde(format!("{}: {}", path.display(), err))
                })?
            }
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), keys = entries.len(), "opened json store");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Opens the store, moving an unreadable file aside instead of failing.
    pub fn open_or_recover(dir: &Path) -> Result<Self, CoreError> {
        match Self::open_in(dir) {
            Err(CoreError::Serde(reason)) => {
                let path = dir.join(STORE_FILE_NAME);
                let aside = path.with_extension("corrupt");
                warn!(%reason, aside = %aside.display(), "store file unreadable, starting fresh");
                fs::rename(&path, &aside)?;
                Self::open(path)
            }
            other => other,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), CoreError> {
        let data = serde_json::to_string_pretty(entries)?;
        write_atomic(&self.path, &data)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let entries = self.entries.read().map_err(lock_poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut entries = self.entries.write().map_err(lock_poisoned)?;
        if entries.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    /// Applies the whole batch and rewrites the file once.
    fn set_many(&self, batch: &[(&str, String)]) -> Result<(), CoreError> {
        let mut entries = self.entries.write().map_err(lock_poisoned)?;
        let mut changed = false;
        for (key, value) in batch {
            if entries.get(*key) != Some(value) {
                entries.insert(key.to_string(), value.clone());
                changed = true;
            }
        }
        if changed {
            self.flush(&entries)?;
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CoreError> {
        let mut entries = self.entries.write().map_err(lock_poisoned)?;
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CoreError> {
        let entries = self.entries.read().map_err(lock_poisoned)?;
        Ok(entries.keys().cloned().collect())
    }
}

fn lock_poisoned<T>(_: T) -> CoreError {
    CoreError::Storage("json store lock poisoned".into())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    {
        let mut file = File::create(&tmp)?;
        file.write_all(data.as_bytes())?;
        file.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}
