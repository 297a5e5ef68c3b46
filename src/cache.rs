//! Field cache: mirrors raw field text across sessions under stable keys
//! (`g5P1`, `g5P2`, ...). The core never depends on it for correctness.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Key/value store for raw field text.
pub trait FieldCache {
    fn get(&self, key: &str) -> Option<String>;
    /// Store `value`; an empty value removes the key.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<C: FieldCache + ?Sized> FieldCache for Box<C> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Process-local cache; the default for sessions without persistence.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: HashMap<String, String>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FieldCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if value.is_empty() {
            self.entries.remove(key);
        } else {
            self.entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CacheSnapshot {
    #[serde(default)]
    fields: BTreeMap<String, String>,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
}

/// JSON snapshot on disk, rewritten on every change.
#[derive(Debug, Clone)]
pub struct JsonFileCache {
    path: PathBuf,
    snapshot: CacheSnapshot,
}

impl JsonFileCache {
    /// Open `path`; a missing file is an empty cache.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let snapshot = if path.exists() {
            let data = fs::read_to_string(&path)
                .with_context(|| format!("reading field cache {}", path.display()))?;
            if data.trim().is_empty() {
                CacheSnapshot::default()
            } else {
                serde_json::from_str(&data)
                    .with_context(|| format!("parsing field cache {}", path.display()))?
            }
        } else {
            CacheSnapshot::default()
        };
        Ok(Self { path, snapshot })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the snapshot was last written.
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot.saved_at
    }

    fn persist(&mut self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("creating cache dir {}", dir.display()))?;
            }
        }
        self.snapshot.saved_at = Some(Utc::now());
        let body = serde_json::to_string_pretty(&self.snapshot).context("serializing field cache")?;
        fs::write(&self.path, body)
            .with_context(|| format!("writing field cache {}", self.path.display()))
    }
}

impl FieldCache for JsonFileCache {
    fn get(&self, key: &str) -> Option<String> {
        self.snapshot.fields.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let changed = if value.is_empty() {
            self.snapshot.fields.remove(key).is_some()
        } else {
            self.snapshot.fields.insert(key.to_string(), value.to_string()) != Some(value.to_string())
        };
        if changed {
            self.persist()?;
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.snapshot.fields.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}
