//! Durability settings and the owned configuration object that validates and
//! broadcasts them

use super::store::{SavedValue, SettingsStore};
use super::ConfigError;
use crate::types::approx_eq;
use crate::whitelist::Whitelist;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Persisted settings keys
pub mod keys {
    pub const DURABILITY_MULTIPLIER: &str = "DurabilityMultiplier";
    pub const NO_MAX_DURABILITY_LOSS: &str = "NoMaxDurabilityLoss";
    pub const RESTORE_MAX_DURABILITY: &str = "RestoreMaxDurability";
    pub const RESTORE_COST_MULTIPLIER: &str = "RestoreCostMultiplier";
    pub const WHITELISTED_TAGS: &str = "WhitelistedTags";
}

/// Float settings closer than this are considered unchanged
pub const FLOAT_EPSILON: f64 = 1e-3;

/// Lowest accepted durability multiplier
pub const MIN_MULTIPLIER: f64 = 1.0;

/// Accepted restore cost multipliers
pub const RESTORE_COST_RANGE: RangeInclusive<f64> = 0.5..=3.0;

/// Snapshot of every durability setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Scale applied to every eligible ceiling and default durability (>= 1.0)
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    /// Repairs heal durability without eroding the ceiling
    #[serde(default)]
    pub no_max_durability_loss: bool,
    /// Repairs may pay to clear erosion entirely. Wins over `no_max_durability_loss`.
    #[serde(default)]
    pub restore_max_durability: bool,
    /// Price scale of the restore surcharge, within [0.5, 3.0]
    #[serde(default = "default_restore_cost_multiplier")]
    pub restore_cost_multiplier: f64,
    /// Ceiling erosion per point of ordinary repair, owned by the host
    #[serde(default)]
    pub vanilla_repair_loss_rate: f64,
    #[serde(default, rename = "whitelist_tags")]
    pub whitelist: Whitelist,
}

fn default_multiplier() -> f64 {
    1.0
}

fn default_restore_cost_multiplier() -> f64 {
    2.0
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            multiplier: default_multiplier(),
            no_max_durability_loss: false,
            restore_max_durability: false,
            restore_cost_multiplier: default_restore_cost_multiplier(),
            vanilla_repair_loss_rate: 0.0,
            whitelist: Whitelist::default(),
        }
    }
}

impl Settings {
    /// Check every ranged field
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_multiplier(self.multiplier)?;
        check_restore_cost(self.restore_cost_multiplier)?;
        check_loss_rate(self.vanilla_repair_loss_rate)?;
        Ok(())
    }
}

/// Get default settings from the bundled TOML, falling back to built-in values
pub fn default_settings() -> Settings {
    let toml = include_str!("../../config/default_settings.toml");
    super::parse_toml::<Settings>(toml)
        .ok()
        .filter(|s| s.validate().is_ok())
        .unwrap_or_default()
}

fn check_multiplier(value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= MIN_MULTIPLIER {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange {
            key: keys::DURABILITY_MULTIPLIER,
            value,
            expected: ">= 1.0",
        })
    }
}

fn check_restore_cost(value: f64) -> Result<f64, ConfigError> {
    if RESTORE_COST_RANGE.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange {
            key: keys::RESTORE_COST_MULTIPLIER,
            value,
            expected: "0.5..=3.0",
        })
    }
}

fn check_loss_rate(value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange {
            key: "VanillaRepairLossRate",
            value,
            expected: ">= 0.0",
        })
    }
}

/// Receives the new settings after every effective change
pub trait ConfigObserver {
    fn on_config_changed(&mut self, settings: &Settings);
}

impl<F> ConfigObserver for F
where
    F: FnMut(&Settings),
{
    fn on_config_changed(&mut self, settings: &Settings) {
        self(settings)
    }
}

/// Outcome of loading persisted settings
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Keys whose saved value was accepted
    pub applied: Vec<&'static str>,
    /// Saved values that were discarded
    pub rejected: Vec<ConfigError>,
}

/// Owned configuration state.
///
/// Setters validate before accepting. A setter that changes a value notifies every
/// observer exactly once; writing the current value (floats within
/// [`FLOAT_EPSILON`]) is a no-op.
pub struct DurabilityConfig {
    settings: Settings,
    observers: Vec<Box<dyn ConfigObserver>>,
}

impl DurabilityConfig {
    pub fn new(settings: Settings) -> Self {
        DurabilityConfig {
            settings,
            observers: Vec::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn multiplier(&self) -> f64 {
        self.settings.multiplier
    }

    pub fn no_max_durability_loss(&self) -> bool {
        self.settings.no_max_durability_loss
    }

    pub fn restore_max_durability(&self) -> bool {
        self.settings.restore_max_durability
    }

    pub fn restore_cost_multiplier(&self) -> f64 {
        self.settings.restore_cost_multiplier
    }

    pub fn vanilla_repair_loss_rate(&self) -> f64 {
        self.settings.vanilla_repair_loss_rate
    }

    pub fn whitelist(&self) -> &Whitelist {
        &self.settings.whitelist
    }

    /// Register an observer. It is not called for the current state.
    pub fn subscribe(&mut self, observer: impl ConfigObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Returns `Ok(true)` if the value changed
    pub fn set_multiplier(&mut self, value: f64) -> Result<bool, ConfigError> {
        let value = check_multiplier(value)?;
        if approx_eq(self.settings.multiplier, value, FLOAT_EPSILON) {
            return Ok(false);
        }
        self.settings.multiplier = value;
        self.notify();
        Ok(true)
    }

    pub fn set_no_max_durability_loss(&mut self, value: bool) -> bool {
        if self.settings.no_max_durability_loss == value {
            return false;
        }
        self.settings.no_max_durability_loss = value;
        self.notify();
        true
    }

    pub fn set_restore_max_durability(&mut self, value: bool) -> bool {
        if self.settings.restore_max_durability == value {
            return false;
        }
        self.settings.restore_max_durability = value;
        self.notify();
        true
    }

    pub fn set_restore_cost_multiplier(&mut self, value: f64) -> Result<bool, ConfigError> {
        let value = check_restore_cost(value)?;
        if approx_eq(self.settings.restore_cost_multiplier, value, FLOAT_EPSILON) {
            return Ok(false);
        }
        self.settings.restore_cost_multiplier = value;
        self.notify();
        Ok(true)
    }

    /// Host-side rate; not part of the persisted settings
    pub fn set_vanilla_repair_loss_rate(&mut self, value: f64) -> Result<bool, ConfigError> {
        let value = check_loss_rate(value)?;
        if approx_eq(self.settings.vanilla_repair_loss_rate, value, FLOAT_EPSILON) {
            return Ok(false);
        }
        self.settings.vanilla_repair_loss_rate = value;
        self.notify();
        Ok(true)
    }

    pub fn set_whitelist(&mut self, whitelist: Whitelist) -> bool {
        if self.settings.whitelist == whitelist {
            return false;
        }
        self.settings.whitelist = whitelist;
        self.notify();
        true
    }

    /// Set the whitelist from its comma-separated persisted form
    pub fn set_whitelist_tags(&mut self, input: &str) -> bool {
        self.set_whitelist(Whitelist::parse(input))
    }

    /// Apply every valid saved value, then notify once.
    ///
    /// Missing keys keep the current value. Out-of-range or mistyped values are
    /// discarded (never clamped) and reported.
    pub fn load(&mut self, store: &dyn SettingsStore) -> LoadReport {
        let mut report = LoadReport::default();

        if let Some(saved) = store.get_saved_value(keys::DURABILITY_MULTIPLIER) {
            match float_value(keys::DURABILITY_MULTIPLIER, &saved).and_then(check_multiplier) {
                Ok(value) => {
                    self.settings.multiplier = value;
                    report.applied.push(keys::DURABILITY_MULTIPLIER);
                }
                Err(e) => report.rejected.push(e),
            }
        }

        if let Some(saved) = store.get_saved_value(keys::NO_MAX_DURABILITY_LOSS) {
            match bool_value(keys::NO_MAX_DURABILITY_LOSS, &saved) {
                Ok(value) => {
                    self.settings.no_max_durability_loss = value;
                    report.applied.push(keys::NO_MAX_DURABILITY_LOSS);
                }
                Err(e) => report.rejected.push(e),
            }
        }

        if let Some(saved) = store.get_saved_value(keys::RESTORE_MAX_DURABILITY) {
            match bool_value(keys::RESTORE_MAX_DURABILITY, &saved) {
                Ok(value) => {
                    self.settings.restore_max_durability = value;
                    report.applied.push(keys::RESTORE_MAX_DURABILITY);
                }
                Err(e) => report.rejected.push(e),
            }
        }

        if let Some(saved) = store.get_saved_value(keys::RESTORE_COST_MULTIPLIER) {
            match float_value(keys::RESTORE_COST_MULTIPLIER, &saved).and_then(check_restore_cost)
            {
                Ok(value) => {
                    self.settings.restore_cost_multiplier = value;
                    report.applied.push(keys::RESTORE_COST_MULTIPLIER);
                }
                Err(e) => report.rejected.push(e),
            }
        }

        if let Some(saved) = store.get_saved_value(keys::WHITELISTED_TAGS) {
            match saved.as_str() {
                Some(text) => {
                    self.settings.whitelist = Whitelist::parse(text);
                    report.applied.push(keys::WHITELISTED_TAGS);
                }
                None => report.rejected.push(ConfigError::WrongType {
                    key: keys::WHITELISTED_TAGS,
                    expected: "string",
                }),
            }
        }

        for rejected in &report.rejected {
            log::debug!("Discarded saved setting: {}", rejected);
        }
        log::info!(
            "Settings loaded: multiplier={:.1}, no_loss={}, restore_max={}, restore_cost={:.1}, whitelist=[{}]",
            self.settings.multiplier,
            self.settings.no_max_durability_loss,
            self.settings.restore_max_durability,
            self.settings.restore_cost_multiplier,
            self.settings.whitelist,
        );

        self.notify();
        report
    }

    fn notify(&mut self) {
        for observer in &mut self.observers {
            observer.on_config_changed(&self.settings);
        }
    }
}

impl Default for DurabilityConfig {
    fn default() -> Self {
        DurabilityConfig::new(default_settings())
    }
}

impl fmt::Debug for DurabilityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DurabilityConfig")
            .field("settings", &self.settings)
            .field("observers", &self.observers.len())
            .finish()
    }
}

fn float_value(key: &'static str, saved: &SavedValue) -> Result<f64, ConfigError> {
    saved.as_f64().ok_or(ConfigError::WrongType {
        key,
        expected: "number",
    })
}

fn bool_value(key: &'static str, saved: &SavedValue) -> Result<bool, ConfigError> {
    saved.as_bool().ok_or(ConfigError::WrongType {
        key,
        expected: "bool",
    })
}
