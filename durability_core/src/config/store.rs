//! Persisted settings stores

use super::ConfigError;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// A value as the host's settings storage hands it back
#[derive(Debug, Clone, PartialEq)]
pub enum SavedValue {
    Float(f64),
    Bool(bool),
    Text(String),
}

impl SavedValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SavedValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SavedValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SavedValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

/// Read side of the host's persisted settings. Only consulted at load time.
pub trait SettingsStore {
    /// `None` when nothing was saved under `key`
    fn get_saved_value(&self, key: &str) -> Option<SavedValue>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, SavedValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn set(&mut self, key: &str, value: SavedValue) {
        self.values.insert(key.to_string(), value);
    }

    pub fn with(mut self, key: &str, value: SavedValue) -> Self {
        self.set(key, value);
        self
    }
}

impl SettingsStore for MemoryStore {
    fn get_saved_value(&self, key: &str) -> Option<SavedValue> {
        self.values.get(key).cloned()
    }
}

/// Store backed by a flat TOML table keyed by the persisted setting names:
///
/// ```toml
/// DurabilityMultiplier = 3.0
/// WhitelistedTags = "Weapon,Armor"
/// ```
#[derive(Debug, Clone, Default)]
pub struct TomlStore {
    table: toml::Table,
}

impl TomlStore {
    /// Parse a store from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = content.parse()?;
        Ok(TomlStore { table })
    }

    /// Load a store from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }
}

impl SettingsStore for TomlStore {
    fn get_saved_value(&self, key: &str) -> Option<SavedValue> {
        match self.table.get(key)? {
            toml::Value::Float(v) => Some(SavedValue::Float(*v)),
            toml::Value::Integer(v) => Some(SavedValue::Float(*v as f64)),
            toml::Value::Boolean(v) => Some(SavedValue::Bool(*v)),
            toml::Value::String(v) => Some(SavedValue::Text(v.clone())),
            toml::Value::Array(items) => {
                // Tag lists may be written as arrays; join into the persisted form
                let tags: Vec<&str> = items.iter().filter_map(|v| v.as_str()).collect();
                Some(SavedValue::Text(tags.join(",")))
            }
            other => {
                log::debug!("Unsupported saved value for '{}': {}", key, other.type_str());
                None
            }
        }
    }
}
