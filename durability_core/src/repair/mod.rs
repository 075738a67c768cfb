//! Repair economy - which repair mode applies to an item, what restoring its
//! ceiling costs, and what the repair panel should show

mod execution;
mod preview;
mod price;
mod view;

pub use execution::{vanilla_repair, RepairGuard, RepairOutcome};
pub use preview::{format_amount, DurabilityPreview, PriceBreakdown};
pub use price::{restore_surcharge, RestoreCost};
pub use view::{ErrorLatch, RepairView, RestoreToggle};

use crate::config::Settings;
use crate::item::ItemState;
use thiserror::Error;

/// Fixed normalization applied to every restore surcharge
pub const RESTORE_PRICE_FACTOR: f64 = 0.5;

/// Items whose effective ceiling is below this cannot be repaired
pub const MIN_REPAIRABLE_CEILING: f64 = 1.0;

/// Durability deltas below this are shown as zero
pub const DISPLAY_EPSILON: f64 = 0.01;

/// Bad live item state handed in by the host
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepairError {
    #[error("max durability must be positive, got {0}")]
    InvalidMaxDurability(f64),
    #[error("{field} is not a finite number ({value})")]
    NonFinite { field: &'static str, value: f64 },
    #[error("durability loss {0} is outside [0, 1]")]
    LossOutOfRange(f64),
}

/// Repair behavior chosen for one item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairMode {
    /// Host behavior untouched
    Vanilla,
    /// Heal durability, keep the ceiling where it is
    NoLoss,
    /// Heal durability and clear all ceiling erosion, for a surcharge
    Restore,
}

/// Per-query view over the current settings and the panel's restore toggle
#[derive(Debug, Clone, Copy)]
pub struct RepairEconomy<'a> {
    settings: &'a Settings,
    restore_toggle: bool,
}

impl<'a> RepairEconomy<'a> {
    pub fn new(settings: &'a Settings, restore_toggle: bool) -> Self {
        RepairEconomy {
            settings,
            restore_toggle,
        }
    }

    pub fn settings(&self) -> &Settings {
        self.settings
    }

    /// Restore needs both the global setting and the panel toggle
    pub fn restore_enabled(&self) -> bool {
        self.settings.restore_max_durability && self.restore_toggle
    }

    /// Whether the durability features touch this item at all
    pub fn is_eligible(&self, item: &ItemState) -> bool {
        item.uses_durability && self.settings.whitelist.is_eligible(item)
    }

    /// Mode for this item. Restore wins over loss suppression.
    pub fn mode_for(&self, item: &ItemState) -> RepairMode {
        if !self.is_eligible(item) {
            RepairMode::Vanilla
        } else if self.restore_enabled() {
            RepairMode::Restore
        } else if self.settings.no_max_durability_loss {
            RepairMode::NoLoss
        } else {
            RepairMode::Vanilla
        }
    }
}

/// Reject item states the formulas cannot work with
pub(crate) fn validate_item(item: &ItemState) -> Result<(), RepairError> {
    if !item.max_durability.is_finite() {
        return Err(RepairError::NonFinite {
            field: "max_durability",
            value: item.max_durability,
        });
    }
    if item.max_durability <= 0.0 {
        return Err(RepairError::InvalidMaxDurability(item.max_durability));
    }
    if !item.durability.is_finite() {
        return Err(RepairError::NonFinite {
            field: "durability",
            value: item.durability,
        });
    }
    if !(0.0..=1.0).contains(&item.durability_loss) {
        return Err(RepairError::LossOutOfRange(item.durability_loss));
    }
    Ok(())
}
