//! Dark-mode preference with pluggable persistence.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::warn;

pub const DARK_MODE_KEY: &str = "darkMode";

/// Key/value preference storage (JSON values), the portal's `localStorage`.
pub trait PreferenceStorage: Send + Sync {
    fn get(&self, key: &str) -> anyhow::Result<Option<Value>>;
    fn set(&self, key: &str, value: Value) -> anyhow::Result<()>;
}

#[derive(Default)]
pub struct MemoryPreferenceStorage {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryPreferenceStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStorage for MemoryPreferenceStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<Value>> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> anyhow::Result<()> {
        self.values.lock().insert(key.to_string(), value);
        Ok(())
    }
}

/// Preferences kept as one JSON object in a file.
pub struct FilePreferenceStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FilePreferenceStorage {
    pub const FILE_NAME: &'static str = "preferences.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// `preferences.json` inside the portal home directory
    /// (`~/.wayforward` unless `home_dir` is given), created if missing.
    pub fn in_home_dir(home_dir: Option<String>) -> anyhow::Result<Self> {
        let dir = runtime::paths::home_dir::resolve_home_dir(home_dir, ".wayforward", true)
            .context("failed to resolve portal home directory")?;
        Ok(Self::new(dir.join(Self::FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> anyhow::Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&raw)
            .with_context(|| format!("invalid JSON in {}", self.path.display()))?
        {
            Value::Object(map) => Ok(map),
            _ => anyhow::bail!("{} does not hold a JSON object", self.path.display()),
        }
    }
}

impl PreferenceStorage for FilePreferenceStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<Value>> {
        let _guard = self.lock.lock();
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: Value) -> anyhow::Result<()> {
        let _guard = self.lock.lock();
        let mut all = self.read_all()?;
        all.insert(key.to_string(), value);
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&Value::Object(all))?)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

/// Current theme. Dark unless the user switched it off.
pub struct ThemeStore<S: PreferenceStorage> {
    storage: S,
    dark_mode: bool,
}

impl<S: PreferenceStorage> ThemeStore<S> {
    pub fn load(storage: S) -> Self {
        let dark_mode = match storage.get(DARK_MODE_KEY) {
            Ok(Some(Value::Bool(b))) => b,
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "failed to read theme preference");
                true
            }
        };
        Self { storage, dark_mode }
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn set_dark_mode(&mut self, value: bool) -> anyhow::Result<()> {
        self.dark_mode = value;
        self.storage.set(DARK_MODE_KEY, Value::Bool(value))
    }

    pub fn toggle(&mut self) -> anyhow::Result<bool> {
        self.set_dark_mode(!self.dark_mode)?;
        Ok(self.dark_mode)
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}
