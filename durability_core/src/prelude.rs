//! Prelude module for convenient imports
//!
//! ```rust
//! use durability_core::prelude::*;
//! ```

// Items
pub use crate::item::{Catalog, DurabilityConstants, ItemDefinition, ItemState, SharedCatalog};
pub use crate::types::{ItemId, Tagged};

// Config
pub use crate::config::{
    default_settings, ConfigObserver, DurabilityConfig, MemoryStore, SavedValue, Settings,
    SettingsStore, TomlStore,
};
pub use crate::whitelist::Whitelist;

// Scaling
pub use crate::scaling::{CatalogRescaler, CatalogScaler, ScaleOutcome};

// Repair
pub use crate::repair::{RepairEconomy, RepairGuard, RepairMode, RepairOutcome, RepairView};

// Runtime
pub use crate::localization::{Language, Localizer, StringTable};
pub use crate::runtime::{DurabilityMod, HostDependencies};
