//! Catalog scaling - multiplier applied to every eligible catalog entry
//!
//! Scaling always starts from the captured base values:
//! `max = base_max × multiplier`, `default = base_default × multiplier`.
//! Repeated passes with different multipliers end where a single pass with the
//! last multiplier would, and pre-damaged definitions keep their spawn fraction.

mod subscription;

pub use subscription::CatalogRescaler;

use crate::config::Settings;
use crate::item::{Catalog, DurabilityConstants, ItemDefinition};
use crate::types::ItemId;
use crate::whitelist::Whitelist;
use thiserror::Error;

/// Base ceilings at or below this mean the entry has no real durability system
pub const MIN_SCALABLE_DURABILITY: f64 = 1.0;

/// A malformed catalog entry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScaleError {
    #[error("{field} is not a finite number ({value})")]
    NonFinite { field: &'static str, value: f64 },
    #[error("{field} is negative ({value})")]
    Negative { field: &'static str, value: f64 },
}

/// Why an entry was left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Entry does not use durability
    NoDurability,
    /// Entry claims durability but has no constants block
    MissingConstants,
    /// Base ceiling <= 1
    NoDurabilitySystem,
}

/// Result of scaling a single entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleOutcome {
    Scaled { max_durability: f64, default_durability: f64 },
    /// Entry fell off the whitelist and was put back to its base values
    Reverted,
    Skipped(SkipReason),
    /// Not whitelisted and never scaled
    NotEligible,
}

/// Summary of a full catalog pass
#[derive(Debug, Clone, Default)]
pub struct RescaleReport {
    pub scaled: usize,
    pub reverted: usize,
    pub skipped: usize,
    pub failed: Vec<(ItemId, ScaleError)>,
}

impl RescaleReport {
    fn record(&mut self, id: ItemId, result: Result<ScaleOutcome, ScaleError>) {
        match result {
            Ok(ScaleOutcome::Scaled { .. }) => self.scaled += 1,
            Ok(ScaleOutcome::Reverted) => self.reverted += 1,
            Ok(_) => self.skipped += 1,
            Err(e) => self.failed.push((id, e)),
        }
    }
}

/// Applies a multiplier to catalog entries filtered by a whitelist
#[derive(Debug, Clone)]
pub struct CatalogScaler {
    multiplier: f64,
    whitelist: Whitelist,
}

impl CatalogScaler {
    pub fn new(multiplier: f64, whitelist: Whitelist) -> Self {
        CatalogScaler {
            multiplier,
            whitelist,
        }
    }

    /// Scaler for the current settings
    pub fn from_settings(settings: &Settings) -> Self {
        CatalogScaler::new(settings.multiplier, settings.whitelist.clone())
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Scale one entry. Nothing is written when the entry is malformed.
    pub fn apply(&self, item: &mut ItemDefinition) -> Result<ScaleOutcome, ScaleError> {
        if !item.uses_durability {
            return Ok(ScaleOutcome::Skipped(SkipReason::NoDurability));
        }

        let eligible = self.whitelist.is_eligible(&*item);
        let Some(constants) = item.constants.as_mut() else {
            return Ok(ScaleOutcome::Skipped(SkipReason::MissingConstants));
        };

        if !eligible {
            return Ok(revert(constants));
        }

        // Validate before capturing so a bad value never becomes a base
        let base_max = checked("max_durability", constants.base_max_or_current())?;
        let base_default = checked("default_durability", constants.base_default_or_current())?;

        constants.capture_base_max();
        if base_max <= MIN_SCALABLE_DURABILITY {
            return Ok(ScaleOutcome::Skipped(SkipReason::NoDurabilitySystem));
        }
        constants.max_durability = base_max * self.multiplier;

        constants.capture_base_default();
        constants.default_durability = base_default * self.multiplier;

        Ok(ScaleOutcome::Scaled {
            max_durability: constants.max_durability,
            default_durability: constants.default_durability,
        })
    }

    /// Scale every entry of the catalog. Malformed entries are logged and skipped.
    pub fn rescale_all(&self, catalog: &mut Catalog) -> RescaleReport {
        let mut report = RescaleReport::default();

        for item in catalog.iter_mut() {
            let result = self.apply(item);
            match &result {
                Err(e) => log::warn!("Skipping catalog entry {} ({}): {}", item.id, item.name, e),
                Ok(ScaleOutcome::Skipped(SkipReason::MissingConstants)) => log::warn!(
                    "Catalog entry {} ({}) uses durability but has no constants",
                    item.id,
                    item.name
                ),
                Ok(outcome) => log::debug!("Catalog entry {}: {:?}", item.id, outcome),
            }
            report.record(item.id, result);
        }

        log::info!(
            "Rescaled catalog at {:.2}x: {} scaled, {} reverted, {} skipped, {} failed",
            self.multiplier,
            report.scaled,
            report.reverted,
            report.skipped,
            report.failed.len()
        );
        report
    }

    /// Registration hook for entries added after the initial pass
    pub fn on_entry_registered(&self, item: &mut ItemDefinition) -> Option<ScaleOutcome> {
        match self.apply(item) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                log::warn!("Skipping registered entry {} ({}): {}", item.id, item.name, e);
                None
            }
        }
    }
}

/// Put a previously scaled entry back to its base values
fn revert(constants: &mut DurabilityConstants) -> ScaleOutcome {
    match (constants.base_max_durability, constants.base_default_durability) {
        (Some(base_max), base_default) if base_max > MIN_SCALABLE_DURABILITY => {
            constants.max_durability = base_max;
            if let Some(base_default) = base_default {
                constants.default_durability = base_default;
            }
            ScaleOutcome::Reverted
        }
        _ => ScaleOutcome::NotEligible,
    }
}

fn checked(field: &'static str, value: f64) -> Result<f64, ScaleError> {
    if !value.is_finite() {
        Err(ScaleError::NonFinite { field, value })
    } else if value < 0.0 {
        Err(ScaleError::Negative { field, value })
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weapon(max: f64) -> ItemDefinition {
        ItemDefinition::new(1, "Rifle", max).with_tags(["Weapon"])
    }

    fn scaler(multiplier: f64) -> CatalogScaler {
        CatalogScaler::new(multiplier, Whitelist::default())
    }

    #[test]
    fn test_scale_single_entry() {
        let mut item = weapon(100.0);
        let outcome = scaler(2.5).apply(&mut item).unwrap();

        assert!(matches!(outcome, ScaleOutcome::Scaled { .. }));
        assert!((item.max_durability().unwrap() - 250.0).abs() < 1e-9);
        assert!((item.default_durability().unwrap() - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_compounding() {
        let mut item = weapon(100.0);
        scaler(5.0).apply(&mut item).unwrap();
        scaler(3.0).apply(&mut item).unwrap();

        // 100 × 3, never 100 × 5 × 3
        assert!((item.max_durability().unwrap() - 300.0).abs() < 1e-9);
        let constants = item.constants.unwrap();
        assert_eq!(constants.base_max_durability, Some(100.0));
    }

    #[test]
    fn test_pre_damaged_default_keeps_fraction() {
        let mut item = weapon(100.0).with_default_durability(50.0);
        scaler(5.0).apply(&mut item).unwrap();

        assert!((item.max_durability().unwrap() - 500.0).abs() < 1e-9);
        assert!((item.default_durability().unwrap() - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_skip_without_durability() {
        let mut item = ItemDefinition::without_durability(2, "Bread").with_tags(["Weapon"]);
        assert_eq!(
            scaler(2.0).apply(&mut item).unwrap(),
            ScaleOutcome::Skipped(SkipReason::NoDurability)
        );
    }

    #[test]
    fn test_skip_missing_constants() {
        let mut item = weapon(100.0);
        item.constants = None;
        assert_eq!(
            scaler(2.0).apply(&mut item).unwrap(),
            ScaleOutcome::Skipped(SkipReason::MissingConstants)
        );
    }

    #[test]
    fn test_skip_tiny_ceiling() {
        let mut item = weapon(1.0);
        assert_eq!(
            scaler(4.0).apply(&mut item).unwrap(),
            ScaleOutcome::Skipped(SkipReason::NoDurabilitySystem)
        );
        assert!((item.max_durability().unwrap() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_not_whitelisted_untouched() {
        let mut item = ItemDefinition::new(3, "Canteen", 100.0).with_tags(["Tool"]);
        assert_eq!(scaler(2.0).apply(&mut item).unwrap(), ScaleOutcome::NotEligible);
        assert!((item.max_durability().unwrap() - 100.0).abs() < f64::EPSILON);
        assert!(item.constants.unwrap().base_max_durability.is_none());
    }

    #[test]
    fn test_revert_when_removed_from_whitelist() {
        let mut item = weapon(100.0).with_default_durability(40.0);
        scaler(3.0).apply(&mut item).unwrap();

        let armor_only = CatalogScaler::new(3.0, Whitelist::new(["Armor"]));
        assert_eq!(armor_only.apply(&mut item).unwrap(), ScaleOutcome::Reverted);
        assert!((item.max_durability().unwrap() - 100.0).abs() < 1e-9);
        assert!((item.default_durability().unwrap() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_entry_not_captured() {
        let mut item = weapon(f64::NAN);
        assert!(matches!(
            scaler(2.0).apply(&mut item),
            Err(ScaleError::NonFinite { field: "max_durability", .. })
        ));
        assert!(item.constants.unwrap().base_max_durability.is_none());
    }

    #[test]
    fn test_rescale_all_continues_past_failures() {
        let mut bad = ItemDefinition::new(2, "Broken", 100.0).with_tags(["Armor"]);
        bad = bad.with_default_durability(-5.0);

        let mut catalog = Catalog::from_entries(vec![
            weapon(100.0),
            bad,
            ItemDefinition::new(3, "Vest", 60.0).with_tags(["Armor"]),
            ItemDefinition::without_durability(4, "Bread"),
        ]);
        catalog.add_dynamic_entry(ItemDefinition::new(50, "Modded Axe", 30.0).with_tags(["Weapon"]));

        let report = scaler(2.0).rescale_all(&mut catalog);
        assert_eq!(report.scaled, 3);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, ItemId(2));

        assert!((catalog.get(ItemId(3)).unwrap().max_durability().unwrap() - 120.0).abs() < 1e-9);
        assert!((catalog.get(ItemId(50)).unwrap().max_durability().unwrap() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_registered_entry_uses_current_multiplier() {
        let mut item = ItemDefinition::new(77, "Generated Helmet", 40.0).with_tags(["Armor"]);
        let outcome = scaler(4.0).on_entry_registered(&mut item);
        assert!(matches!(outcome, Some(ScaleOutcome::Scaled { .. })));
        assert!((item.max_durability().unwrap() - 160.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            multiplier: 2.0,
            whitelist: Whitelist::allow_all(),
            ..Settings::default()
        };
        let scaler = CatalogScaler::from_settings(&settings);
        let mut item = ItemDefinition::new(9, "Untagged Tool", 10.0);
        scaler.apply(&mut item).unwrap();
        assert!((item.max_durability().unwrap() - 20.0).abs() < 1e-9);
    }
}
