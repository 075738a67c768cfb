//! Restore surcharge pricing

use super::{validate_item, RepairEconomy, RepairError, RepairMode, RESTORE_PRICE_FACTOR};
use crate::item::ItemState;

/// Relative tolerance that keeps float noise (68.00000000000001) from adding a coin
const PRICE_RELATIVE_EPSILON: f64 = 1e-12;

/// Cost breakdown of restoring an item's ceiling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestoreCost {
    /// Erosion already on the item
    pub existing_loss: f64,
    /// Erosion this repair would add under host rules
    pub potential_loss: f64,
    /// `existing_loss + potential_loss`, capped at 1
    pub total_fraction: f64,
    pub surcharge: u32,
}

/// `ceil(value × fraction × cost_multiplier × 0.5)`, never negative
pub fn restore_surcharge(value: u32, restored_fraction: f64, cost_multiplier: f64) -> u32 {
    let raw = value as f64 * restored_fraction * cost_multiplier * RESTORE_PRICE_FACTOR;
    if raw.is_nan() || raw <= 0.0 {
        return 0;
    }
    (raw * (1.0 - PRICE_RELATIVE_EPSILON)).ceil().min(u32::MAX as f64) as u32
}

impl RepairEconomy<'_> {
    /// Restore cost for the item, or `None` when restore mode does not apply
    pub fn restore_cost(&self, item: &ItemState) -> Result<Option<RestoreCost>, RepairError> {
        if self.mode_for(item) != RepairMode::Restore {
            return Ok(None);
        }
        validate_item(item)?;

        let existing_loss = item.durability_loss;
        let potential_loss =
            item.missing_durability() * self.settings.vanilla_repair_loss_rate / item.max_durability;
        let total_fraction = (existing_loss + potential_loss).min(1.0);

        Ok(Some(RestoreCost {
            existing_loss,
            potential_loss,
            total_fraction,
            surcharge: restore_surcharge(
                item.value,
                total_fraction,
                self.settings.restore_cost_multiplier,
            ),
        }))
    }

    /// Host price plus the restore surcharge (if any)
    pub fn repair_price(&self, item: &ItemState, base_price: u32) -> Result<u32, RepairError> {
        let surcharge = self.restore_cost(item)?.map_or(0, |cost| cost.surcharge);
        Ok(base_price.saturating_add(surcharge))
    }
}
