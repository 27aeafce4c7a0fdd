use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use super::Storage;
use crate::error::{ArgformError, Result};
use crate::value::Value;

/// JSON-file-backed storage.
///
/// The whole store is one flat JSON object, key per argument name, loaded
/// at open and rewritten on every mutation. Settings files are tiny; the
/// eager flush keeps the on-disk state honest even if the host never
/// shuts down cleanly.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // BTreeMap so the file is stably ordered across rewrites.
    values: BTreeMap<String, Value>,
}

impl FileStorage {
    /// Open (or create on first write) a settings file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    /// Open the per-user settings file for an application, e.g.
    /// `~/.config/<org>/<app>/settings.json` on Linux.
    pub fn user_scope(organization: &str, application: &str) -> Result<Self> {
        let dirs = ProjectDirs::from("", organization, application)
            .ok_or(ArgformError::NoSettingsDir)?;
        Self::open(dirs.config_dir().join("settings.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn value(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn set_value(&mut self, key: &str, value: &Value) -> Result<()> {
        self.values.insert(key.to_string(), value.clone());
        self.flush()
    }

    fn clear(&mut self) -> Result<()> {
        self.values.clear();
        self.flush()
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
