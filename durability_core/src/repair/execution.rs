//! Repair execution - state captured before the host repair and the corrections
//! applied after it

use super::{RepairEconomy, RepairMode, MIN_REPAIRABLE_CEILING};
use crate::item::ItemState;

/// Item state captured before the host repair runs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RepairGuard {
    loss_before: f64,
}

impl RepairGuard {
    pub fn loss_before(&self) -> f64 {
        self.loss_before
    }
}

/// What the post-repair step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairOutcome {
    /// Host result kept as-is
    Unchanged,
    /// Erosion cleared, durability back to the original ceiling
    CeilingRestored,
    /// Erosion put back to its pre-repair value, durability at that ceiling
    LossSuppressed,
}

/// The host's ordinary repair: heal to the effective ceiling and erode it by
/// `healed × loss_rate / max`
pub fn vanilla_repair(item: &mut ItemState, loss_rate: f64) {
    if item.max_durability <= 0.0 {
        return;
    }
    let healed = item.missing_durability();
    let erosion = healed * loss_rate / item.max_durability;
    item.durability_loss = (item.durability_loss + erosion).clamp(0.0, 1.0);
    item.durability = item.effective_ceiling();
}

impl RepairEconomy<'_> {
    /// Pre-repair hook
    pub fn before_repair(&self, item: &ItemState) -> RepairGuard {
        RepairGuard {
            loss_before: item.durability_loss,
        }
    }

    /// Post-repair hook: correct the host result for the active mode
    pub fn after_repair(&self, item: &mut ItemState, guard: RepairGuard) -> RepairOutcome {
        match self.mode_for(item) {
            RepairMode::Restore if item.durability_loss > 0.0 => {
                item.durability_loss = 0.0;
                item.durability = item.max_durability;
                RepairOutcome::CeilingRestored
            }
            RepairMode::NoLoss if item.durability_loss != guard.loss_before => {
                item.durability_loss = guard.loss_before;
                item.durability = item.effective_ceiling();
                RepairOutcome::LossSuppressed
            }
            _ => RepairOutcome::Unchanged,
        }
    }

    /// Whether the repair button is available for this item
    pub fn can_repair(&self, item: &ItemState) -> bool {
        if !item.uses_durability
            || item.effective_ceiling() < MIN_REPAIRABLE_CEILING
            || !item.is_repairable()
        {
            return false;
        }

        // Eroded items can pay to restore even at full current durability
        if self.mode_for(item) == RepairMode::Restore && item.durability_loss > 0.0 {
            return true;
        }

        item.durability < item.effective_ceiling()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::config::Settings;

    #[test]
    fn test_vanilla_repair_erodes() {
        let mut item = weapon(100.0, 0.0, 50.0);
        vanilla_repair(&mut item, 0.2);
        // Healed 50 -> erosion 50 × 0.2 / 100 = 0.1
        assert!((item.durability_loss - 0.1).abs() < 1e-9);
        assert!((item.durability - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_loss_keeps_fraction() {
        let settings = Settings {
            vanilla_repair_loss_rate: 0.2,
            ..no_loss_settings()
        };
        let economy = RepairEconomy::new(&settings, true);
        let mut item = weapon(100.0, 0.1, 40.0);

        let guard = economy.before_repair(&item);
        vanilla_repair(&mut item, settings.vanilla_repair_loss_rate);
        assert!(item.durability_loss > 0.1);

        let outcome = economy.after_repair(&mut item, guard);
        assert_eq!(outcome, RepairOutcome::LossSuppressed);
        assert!((item.durability_loss - 0.1).abs() < f64::EPSILON);
        assert!((item.durability - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_loss_without_erosion_is_unchanged() {
        let settings = no_loss_settings();
        let economy = RepairEconomy::new(&settings, true);
        let mut item = weapon(100.0, 0.1, 40.0);

        let guard = economy.before_repair(&item);
        vanilla_repair(&mut item, 0.0);
        assert_eq!(economy.after_repair(&mut item, guard), RepairOutcome::Unchanged);
        assert!((item.durability_loss - 0.1).abs() < f64::EPSILON);
        assert!((item.durability - item.effective_ceiling()).abs() < 1e-9);
    }

    #[test]
    fn test_restore_clears_loss() {
        let settings = Settings {
            vanilla_repair_loss_rate: 0.2,
            ..restore_settings()
        };
        let economy = RepairEconomy::new(&settings, true);
        let mut item = weapon(100.0, 0.3, 20.0);

        let guard = economy.before_repair(&item);
        vanilla_repair(&mut item, settings.vanilla_repair_loss_rate);
        assert_eq!(economy.after_repair(&mut item, guard), RepairOutcome::CeilingRestored);
        assert!(item.durability_loss.abs() < f64::EPSILON);
        assert!((item.durability - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_restore_toggle_off_is_vanilla() {
        let settings = restore_settings();
        let economy = RepairEconomy::new(&settings, false);
        let mut item = weapon(100.0, 0.3, 20.0);

        let guard = economy.before_repair(&item);
        vanilla_repair(&mut item, 0.0);
        assert_eq!(economy.after_repair(&mut item, guard), RepairOutcome::Unchanged);
        assert!((item.durability_loss - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_can_repair_gates() {
        let settings = restore_settings();
        let economy = RepairEconomy::new(&settings, true);

        // Full durability but eroded: restore makes it repairable
        assert!(economy.can_repair(&weapon(100.0, 0.2, 80.0)));
        // Full and pristine
        assert!(!economy.can_repair(&weapon(100.0, 0.0, 100.0)));
        // Damaged
        assert!(economy.can_repair(&weapon(100.0, 0.0, 10.0)));

        // Missing Repairable tag
        let mut item = weapon(100.0, 0.0, 10.0);
        item.tags.remove("Repairable");
        assert!(!economy.can_repair(&item));

        // Ceiling eroded below 1
        assert!(!economy.can_repair(&weapon(100.0, 0.995, 0.0)));
    }

    #[test]
    fn test_can_repair_without_restore() {
        let settings = Settings::default();
        let economy = RepairEconomy::new(&settings, true);
        assert!(!economy.can_repair(&weapon(100.0, 0.2, 80.0)));
        assert!(economy.can_repair(&weapon(100.0, 0.2, 70.0)));
    }
}
