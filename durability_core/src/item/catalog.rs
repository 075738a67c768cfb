//! Catalog - Registry of item definitions (static entries + dynamic entries)

use super::ItemDefinition;
use crate::config::ConfigError;
use crate::types::ItemId;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

/// Catalog handle shared between the host and the scaler subscription
pub type SharedCatalog = Rc<RefCell<Catalog>>;

/// Container for loading catalogs from JSON
#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    entries: Vec<ItemDefinition>,
    #[serde(default)]
    dynamic: Vec<ItemDefinition>,
}

/// Item catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Entries loaded with the game data
    entries: Vec<ItemDefinition>,
    /// Entries registered at runtime, keyed by id
    dynamic: BTreeMap<ItemId, ItemDefinition>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Create a catalog from static entries
    pub fn from_entries(entries: Vec<ItemDefinition>) -> Self {
        Catalog {
            entries,
            dynamic: BTreeMap::new(),
        }
    }

    /// Parse a catalog from a JSON string
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let file: CatalogFile = serde_json::from_str(content)?;
        let mut catalog = Catalog::from_entries(file.entries);
        for entry in file.dynamic {
            catalog.dynamic.insert(entry.id, entry);
        }
        Ok(catalog)
    }

    /// Load a catalog from a JSON file
    pub fn load_json(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serialize the catalog (including captured base values)
    pub fn to_json(&self) -> Result<String, ConfigError> {
        let file = CatalogFile {
            entries: self.entries.clone(),
            dynamic: self.dynamic.values().cloned().collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Wrap into a shared handle
    pub fn into_shared(self) -> SharedCatalog {
        Rc::new(RefCell::new(self))
    }

    /// Add a static entry
    pub fn push(&mut self, entry: ItemDefinition) {
        self.entries.push(entry);
    }

    /// Register a runtime entry, replacing any dynamic entry with the same id.
    /// Returns the stored entry so the caller can run registration hooks on it.
    pub fn add_dynamic_entry(&mut self, entry: ItemDefinition) -> &mut ItemDefinition {
        match self.dynamic.entry(entry.id) {
            Entry::Occupied(mut slot) => {
                slot.insert(entry);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(entry),
        }
    }

    pub fn remove_dynamic_entry(&mut self, id: ItemId) -> Option<ItemDefinition> {
        self.dynamic.remove(&id)
    }

    /// Look up an entry; static entries win over dynamic ones
    pub fn get(&self, id: ItemId) -> Option<&ItemDefinition> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .or_else(|| self.dynamic.get(&id))
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut ItemDefinition> {
        match self.entries.iter().position(|e| e.id == id) {
            Some(index) => self.entries.get_mut(index),
            None => self.dynamic.get_mut(&id),
        }
    }

    /// All entries, static first
    pub fn iter(&self) -> impl Iterator<Item = &ItemDefinition> {
        self.entries.iter().chain(self.dynamic.values())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ItemDefinition> {
        self.entries.iter_mut().chain(self.dynamic.values_mut())
    }

    pub fn len(&self) -> usize {
        self.entries.len() + self.dynamic.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
