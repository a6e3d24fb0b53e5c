//! Extended owner names.
//!
//! A sign line holds 15 characters. With extended names enabled the owner
//! line stores a short key instead of the player name; the registry maps each
//! key back to the full name so ownership checks still find the real owner.
//! Names that fit keep themselves as their key. Longer names take their first
//! 14 characters plus one suffix character, so up to 62 long names may share
//! a prefix before the registry runs out.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::shop::errors::ShopError;

/// Characters available on one sign line.
pub const SIGN_LINE_LIMIT: usize = 15;

const SUFFIXES: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// "Same person, several names" policy used for ownership checks.
pub trait NameEquivalence: Send + Sync {
    /// Make sure `full_name` has a key, returning it.
    fn register(&mut self, full_name: &str) -> Result<String, ShopError>;

    /// Drop every key allocated to `full_name`. True if any was dropped.
    fn unregister(&mut self, full_name: &str) -> bool;

    /// Key to write on the owner line for `full_name`.
    fn short_key_for(&mut self, full_name: &str) -> Result<String, ShopError>;

    /// Whether the owner line `key` belongs to `candidate`.
    fn matches(&self, key: &str, candidate: &str) -> bool;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryFile {
    entries: BTreeMap<String, String>,
}

/// Key table backed by an optional JSON file.
#[derive(Debug, Default)]
pub struct NameRegistry {
    entries: BTreeMap<String, String>,
    path: Option<PathBuf>,
}

impl NameRegistry {
    /// In-memory registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry persisted at `path`. A missing file starts empty.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ShopError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str::<RegistryFile>(&contents)?.entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("Loaded {} name registry entries from {}", entries.len(), path.display());
        Ok(Self {
            entries,
            path: Some(path),
        })
    }

    /// Write the table to its file; in-memory registries do nothing.
    pub fn save(&self) -> Result<(), ShopError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let file = RegistryFile {
            entries: self.entries.clone(),
        };
        let contents = serde_json::to_string_pretty(&file)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Full name behind `key`, if it was allocated.
    pub fn full_name(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    fn key_of(&self, full_name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, name)| name.as_str() == full_name)
            .map(|(key, _)| key.as_str())
    }

    fn allocate(&mut self, full_name: &str) -> Result<String, ShopError> {
        if let Some(key) = self.key_of(full_name) {
            return Ok(key.to_string());
        }

        let key = if full_name.chars().count() <= SIGN_LINE_LIMIT
            && !self.entries.contains_key(full_name)
        {
            Some(full_name.to_string())
        } else {
            let prefix: String = full_name.chars().take(SIGN_LINE_LIMIT - 1).collect();
            SUFFIXES
                .iter()
                .map(|&c| format!("{}{}", prefix, c as char))
                .find(|candidate| !self.entries.contains_key(candidate))
        };

        let key = key.ok_or_else(|| ShopError::OutOfEntries(full_name.to_string()))?;
        self.entries.insert(key.clone(), full_name.to_string());
        self.persist();
        Ok(key)
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            warn!("Failed to save name registry: {}", e);
        }
    }
}

impl NameEquivalence for NameRegistry {
    fn register(&mut self, full_name: &str) -> Result<String, ShopError> {
        self.allocate(full_name)
    }

    fn unregister(&mut self, full_name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|_, name| name != full_name);
        let removed = self.entries.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    fn short_key_for(&mut self, full_name: &str) -> Result<String, ShopError> {
        self.allocate(full_name)
    }

    fn matches(&self, key: &str, candidate: &str) -> bool {
        match self.entries.get(key) {
            Some(name) => name == candidate,
            None => key == candidate,
        }
    }
}
