//! Core types shared across the durability engine

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Set of classification tags attached to a catalog entry
pub type TagSet = BTreeSet<String>;

/// Well-known tag names used by the host catalog
pub mod tags {
    pub const WEAPON: &str = "Weapon";
    pub const ARMOR: &str = "Armor";
    /// Host flag: the repair station accepts this item at all
    pub const REPAIRABLE: &str = "Repairable";
}

/// Identifier for a catalog entry (the host's type id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl From<u32> for ItemId {
    fn from(id: u32) -> Self {
        ItemId(id)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Anything the whitelist can judge: catalog definitions and live item instances
pub trait Tagged {
    /// Whether this entry takes part in the durability system
    fn uses_durability(&self) -> bool;

    /// Classification tags
    fn tags(&self) -> &TagSet;

    /// Check for a single tag
    fn has_tag(&self, tag: &str) -> bool {
        self.tags().contains(tag)
    }
}

/// Build a tag set from string slices
pub fn tag_set<I, S>(tags: I) -> TagSet
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    tags.into_iter().map(Into::into).collect()
}

/// Float comparison used for settings change detection
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon
}
