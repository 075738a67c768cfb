//! Numbers shown on the repair panel: durability preview and price breakdown

use super::{validate_item, RepairEconomy, RepairError, RepairMode, DISPLAY_EPSILON};
use crate::item::ItemState;
use std::fmt;

/// Ceiling change a repair will cause
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DurabilityPreview {
    /// Restore mode: ordinary healing plus recovered ceiling
    Restore {
        /// Durability healed up to the current effective ceiling
        normal: f64,
        /// Ceiling recovered by clearing erosion
        restore: f64,
        total: f64,
    },
    /// Loss suppression: the ceiling does not move
    NoLoss,
}

impl DurabilityPreview {
    /// Preview text prefixed by the localized label
    pub fn render(&self, label: &str) -> String {
        format!("{} {}", label, self)
    }
}

impl fmt::Display for DurabilityPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurabilityPreview::Restore {
                normal,
                restore,
                total,
            } => write!(
                f,
                "+{} (+{} +{})",
                format_amount(*total),
                format_amount(*normal),
                format_amount(*restore)
            ),
            DurabilityPreview::NoLoss => write!(f, "-0.0"),
        }
    }
}

/// Host total price split into its base and restore parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub total: u32,
    pub base: u32,
    pub surcharge: u32,
}

impl fmt::Display for PriceBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} +{})", self.total, self.base, self.surcharge)
    }
}

/// Format with at most one decimal place: `12.0 -> "12"`, `7.46 -> "7.5"`
pub fn format_amount(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    // Avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    if rounded.fract() == 0.0 {
        format!("{:.0}", rounded)
    } else {
        format!("{:.1}", rounded)
    }
}

impl RepairEconomy<'_> {
    /// Preview for the panel, or `None` to leave the host text alone
    pub fn durability_preview(
        &self,
        item: &ItemState,
    ) -> Result<Option<DurabilityPreview>, RepairError> {
        match self.mode_for(item) {
            RepairMode::Vanilla => Ok(None),
            RepairMode::NoLoss => Ok(Some(DurabilityPreview::NoLoss)),
            RepairMode::Restore => {
                validate_item(item)?;
                let ceiling = item.effective_ceiling();

                let mut normal = ceiling - item.durability;
                if normal < DISPLAY_EPSILON {
                    normal = 0.0;
                }
                let restore = item.max_durability - ceiling;

                Ok(Some(DurabilityPreview::Restore {
                    normal,
                    restore,
                    total: normal + restore,
                }))
            }
        }
    }

    /// Split the host's total price (which already includes the surcharge).
    /// `None` when there is no surcharge to show.
    pub fn price_breakdown(
        &self,
        item: &ItemState,
        total_price: u32,
    ) -> Result<Option<PriceBreakdown>, RepairError> {
        let Some(cost) = self.restore_cost(item)? else {
            return Ok(None);
        };
        if cost.surcharge == 0 {
            return Ok(None);
        }

        Ok(Some(PriceBreakdown {
            total: total_price,
            base: total_price.saturating_sub(cost.surcharge),
            surcharge: cost.surcharge,
        }))
    }
}
