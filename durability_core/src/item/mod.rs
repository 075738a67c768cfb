//! Item definitions (catalog entries) and live item state

mod catalog;

pub use catalog::{Catalog, SharedCatalog};

use crate::types::{tags, ItemId, TagSet, Tagged};
use serde::{Deserialize, Serialize};

/// Durability numbers of a catalog entry.
///
/// `base_*` fields hold the unscaled originals. They are written at most once
/// (on the first scaling pass or late registration) and every later rescale reads
/// from them, so repeated multiplier changes never compound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurabilityConstants {
    /// Live ceiling shown to the player
    pub max_durability: f64,
    /// Durability assigned to newly spawned instances
    pub default_durability: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_max_durability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_default_durability: Option<f64>,
}

impl DurabilityConstants {
    pub fn new(max_durability: f64, default_durability: f64) -> Self {
        DurabilityConstants {
            max_durability,
            default_durability,
            base_max_durability: None,
            base_default_durability: None,
        }
    }

    /// Base ceiling if captured, otherwise what would be captured now
    pub fn base_max_or_current(&self) -> f64 {
        self.base_max_durability.unwrap_or(self.max_durability)
    }

    /// Base default durability if captured, otherwise the live value
    pub fn base_default_or_current(&self) -> f64 {
        self.base_default_durability.unwrap_or(self.default_durability)
    }

    /// Capture the base ceiling if absent and return it
    pub fn capture_base_max(&mut self) -> f64 {
        *self.base_max_durability.get_or_insert(self.max_durability)
    }

    /// Capture the base default durability if absent and return it
    pub fn capture_base_default(&mut self) -> f64 {
        *self
            .base_default_durability
            .get_or_insert(self.default_durability)
    }
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    /// Base sell value, used for repair pricing
    #[serde(default)]
    pub value: u32,
    #[serde(default)]
    pub uses_durability: bool,
    #[serde(default)]
    pub tags: TagSet,
    /// Absent on entries the host never gave durability numbers
    #[serde(default)]
    pub constants: Option<DurabilityConstants>,
}

impl ItemDefinition {
    /// Create a durability-using definition with full default durability
    pub fn new(id: impl Into<ItemId>, name: &str, max_durability: f64) -> Self {
        ItemDefinition {
            id: id.into(),
            name: name.to_string(),
            value: 0,
            uses_durability: true,
            tags: TagSet::new(),
            constants: Some(DurabilityConstants::new(max_durability, max_durability)),
        }
    }

    /// Create a definition without any durability system
    pub fn without_durability(id: impl Into<ItemId>, name: &str) -> Self {
        ItemDefinition {
            id: id.into(),
            name: name.to_string(),
            value: 0,
            uses_durability: false,
            tags: TagSet::new(),
            constants: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }

    /// Override the spawn durability (pre-damaged definitions)
    pub fn with_default_durability(mut self, default_durability: f64) -> Self {
        if let Some(constants) = self.constants.as_mut() {
            constants.default_durability = default_durability;
        }
        self
    }

    pub fn max_durability(&self) -> Option<f64> {
        self.constants.as_ref().map(|c| c.max_durability)
    }

    pub fn default_durability(&self) -> Option<f64> {
        self.constants.as_ref().map(|c| c.default_durability)
    }

    /// Spawn a fresh instance with the current ceiling and default durability
    pub fn spawn(&self) -> ItemState {
        let (max, durability) = self
            .constants
            .as_ref()
            .map(|c| (c.max_durability, c.default_durability))
            .unwrap_or((0.0, 0.0));

        ItemState {
            item_id: self.id,
            name: self.name.clone(),
            value: self.value,
            uses_durability: self.uses_durability,
            tags: self.tags.clone(),
            max_durability: max,
            durability,
            durability_loss: 0.0,
        }
    }
}

impl Tagged for ItemDefinition {
    fn uses_durability(&self) -> bool {
        self.uses_durability
    }

    fn tags(&self) -> &TagSet {
        &self.tags
    }
}

/// A live item instance as the repair station sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemState {
    pub item_id: ItemId,
    #[serde(default)]
    pub name: String,
    pub value: u32,
    pub uses_durability: bool,
    #[serde(default)]
    pub tags: TagSet,
    /// Original ceiling, before any repair erosion
    pub max_durability: f64,
    /// Current usable durability
    pub durability: f64,
    /// Fraction of `max_durability` eroded by earlier ordinary repairs (0..1)
    pub durability_loss: f64,
}

impl ItemState {
    /// Ceiling after erosion: `max * (1 - loss)`
    pub fn effective_ceiling(&self) -> f64 {
        self.max_durability * (1.0 - self.durability_loss)
    }

    /// Durability missing below the effective ceiling
    pub fn missing_durability(&self) -> f64 {
        (self.effective_ceiling() - self.durability).max(0.0)
    }

    /// Host repairability flag
    pub fn is_repairable(&self) -> bool {
        self.has_tag(tags::REPAIRABLE)
    }

    pub fn with_durability(mut self, durability: f64) -> Self {
        self.durability = durability;
        self
    }

    pub fn with_loss(mut self, durability_loss: f64) -> Self {
        self.durability_loss = durability_loss;
        self
    }
}

impl Tagged for ItemState {
    fn uses_durability(&self) -> bool {
        self.uses_durability
    }

    fn tags(&self) -> &TagSet {
        &self.tags
    }
}
