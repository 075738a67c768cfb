//! durability_core - Durability scaling and repair economy for game item catalogs
//!
//! This library provides:
//! - CatalogScaler: Multiplies catalog durability ceilings without compounding
//! - Whitelist: Tag filter deciding which entries are affected
//! - RepairEconomy: Repair modes, restore surcharge and panel previews
//! - DurabilityConfig: Validated settings with change notification
//! - DurabilityMod: Startup and host hook entry points

pub mod config;
pub mod item;
pub mod localization;
pub mod prelude;
pub mod repair;
pub mod runtime;
pub mod scaling;
pub mod types;
pub mod whitelist;

// Re-export core types for convenience
pub use config::{default_settings, ConfigError, DurabilityConfig, Settings};
pub use item::{Catalog, DurabilityConstants, ItemDefinition, ItemState, SharedCatalog};
pub use localization::{Language, Localizer, StringTable};
pub use repair::{RepairEconomy, RepairError, RepairMode, RepairView};
pub use runtime::{DurabilityMod, HostDependencies, StartupError};
pub use scaling::{CatalogScaler, ScaleError, ScaleOutcome};
pub use types::{ItemId, TagSet};
pub use whitelist::Whitelist;
