//! DurabilityMod - wires configuration, catalog scaling and the repair economy
//! to the host's hook points

use crate::config::{default_settings, DurabilityConfig, LoadReport, SettingsStore};
use crate::item::{ItemDefinition, ItemState, SharedCatalog};
use crate::localization::{text_keys, Localizer, StringTable};
use crate::repair::{ErrorLatch, RepairEconomy, RepairGuard, RepairOutcome, RepairView};
use crate::scaling::{CatalogRescaler, CatalogScaler, ScaleOutcome};
use thiserror::Error;

/// Host services the engine needs at startup
#[derive(Default)]
pub struct HostDependencies {
    pub catalog: Option<SharedCatalog>,
    pub store: Option<Box<dyn SettingsStore>>,
    pub localizer: Option<Box<dyn Localizer>>,
}

impl HostDependencies {
    pub fn new(catalog: SharedCatalog, store: impl SettingsStore + 'static) -> Self {
        HostDependencies {
            catalog: Some(catalog),
            store: Some(Box::new(store)),
            localizer: None,
        }
    }

    pub fn with_localizer(mut self, localizer: impl Localizer + 'static) -> Self {
        self.localizer = Some(Box::new(localizer));
        self
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StartupError {
    #[error("host item catalog is not available")]
    MissingCatalog,
    #[error("host settings store is not available")]
    MissingSettingsStore,
}

/// Running engine instance
pub struct DurabilityMod {
    config: DurabilityConfig,
    catalog: SharedCatalog,
    store: Box<dyn SettingsStore>,
    localizer: Box<dyn Localizer>,
    view: RepairView,
    price_errors: ErrorLatch,
    load_report: LoadReport,
}

impl DurabilityMod {
    /// Subscribe the catalog to configuration changes, then load saved settings.
    /// The load notification performs the initial rescale.
    pub fn start(deps: HostDependencies) -> Result<Self, StartupError> {
        let catalog = deps.catalog.ok_or(StartupError::MissingCatalog)?;
        let store = deps.store.ok_or(StartupError::MissingSettingsStore)?;
        let localizer = deps
            .localizer
            .unwrap_or_else(|| Box::new(StringTable::default()));

        let mut config = DurabilityConfig::new(default_settings());
        config.subscribe(CatalogRescaler::new(catalog.clone()));
        let load_report = config.load(store.as_ref());

        log::info!(
            "Durability engine started ({} catalog entries, {} saved settings applied)",
            catalog.borrow().len(),
            load_report.applied.len()
        );

        Ok(DurabilityMod {
            config,
            catalog,
            store,
            localizer,
            view: RepairView::new(),
            price_errors: ErrorLatch::default(),
            load_report,
        })
    }

    /// Start, or log why not and leave the host untouched
    pub fn enable(deps: HostDependencies) -> Option<Self> {
        match Self::start(deps) {
            Ok(engine) => Some(engine),
            Err(e) => {
                log::error!("Durability engine disabled: {}", e);
                None
            }
        }
    }

    pub fn config(&self) -> &DurabilityConfig {
        &self.config
    }

    /// Setters on the returned config notify the catalog rescaler
    pub fn config_mut(&mut self) -> &mut DurabilityConfig {
        &mut self.config
    }

    pub fn catalog(&self) -> &SharedCatalog {
        &self.catalog
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    /// Re-read the settings store (host settings screen closed)
    pub fn reload_settings(&mut self) -> &LoadReport {
        self.load_report = self.config.load(self.store.as_ref());
        &self.load_report
    }

    pub fn view(&self) -> &RepairView {
        &self.view
    }

    /// Host hook for entries created after startup
    pub fn on_entry_registered(&self, item: &mut ItemDefinition) -> Option<ScaleOutcome> {
        CatalogScaler::from_settings(self.config.settings()).on_entry_registered(item)
    }

    /// Insert a dynamic entry into the shared catalog and scale it
    pub fn register_dynamic_entry(&self, entry: ItemDefinition) -> Option<ScaleOutcome> {
        let scaler = CatalogScaler::from_settings(self.config.settings());
        let mut catalog = self.catalog.borrow_mut();
        scaler.on_entry_registered(catalog.add_dynamic_entry(entry))
    }

    pub fn economy(&self) -> RepairEconomy<'_> {
        RepairEconomy::new(self.config.settings(), self.view.is_restore_enabled())
    }

    pub fn before_repair(&self, item: &ItemState) -> RepairGuard {
        self.economy().before_repair(item)
    }

    pub fn after_repair(&self, item: &mut ItemState, guard: RepairGuard) -> RepairOutcome {
        let outcome = self.economy().after_repair(item, guard);
        if outcome != RepairOutcome::Unchanged {
            log::debug!("Repair of {} corrected: {:?}", item.name, outcome);
        }
        outcome
    }

    pub fn can_repair(&self, item: &ItemState) -> bool {
        self.economy().can_repair(item)
    }

    /// Host price hook. Falls back to the host price when the item is unusable.
    pub fn repair_price(&mut self, item: &ItemState, base_price: u32) -> u32 {
        let result = RepairEconomy::new(self.config.settings(), self.view.is_restore_enabled())
            .repair_price(item, base_price);
        match result {
            Ok(price) => {
                self.price_errors.clear();
                price
            }
            Err(e) => {
                self.price_errors.report("Repair price", e);
                base_price
            }
        }
    }

    /// Panel toggle; the host re-queries price and preview afterwards
    pub fn set_restore_toggle(&mut self, enabled: bool) {
        self.view.set_restore_enabled(enabled);
    }

    pub fn restore_toggle_label(&self) -> String {
        self.localizer
            .get_text(text_keys::RESTORE_TOGGLE, "Restore Max")
    }

    /// Recompute the panel texts for the selected item. Returns false when the
    /// item could not be rendered; the previous texts stay and the error is
    /// logged by the view.
    pub fn refresh_view(&mut self, item: &ItemState, host_price: u32) -> bool {
        let label = self
            .localizer
            .get_text(text_keys::MAX_DURABILITY, "Max Durability");
        self.view
            .refresh(self.config.settings(), item, host_price, &label)
            .is_ok()
    }
}

impl std::fmt::Debug for DurabilityMod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DurabilityMod")
            .field("config", &self.config)
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{keys, MemoryStore, SavedValue};
    use crate::item::Catalog;
    use crate::localization::Language;
    use crate::types::ItemId;

    fn catalog() -> SharedCatalog {
        Catalog::from_entries(vec![
            ItemDefinition::new(1, "Rifle", 100.0)
                .with_tags(["Weapon", "Repairable"])
                .with_value(1000),
            ItemDefinition::new(2, "Canteen", 40.0).with_tags(["Tool"]),
        ])
        .into_shared()
    }

    fn start(store: MemoryStore) -> DurabilityMod {
        DurabilityMod::start(HostDependencies::new(catalog(), store)).unwrap()
    }

    fn max_of(engine: &DurabilityMod, id: u32) -> f64 {
        engine
            .catalog()
            .borrow()
            .get(ItemId(id))
            .and_then(ItemDefinition::max_durability)
            .unwrap()
    }

    #[test]
    fn test_missing_dependencies() {
        let deps = HostDependencies {
            store: Some(Box::new(MemoryStore::default())),
            ..Default::default()
        };
        assert_eq!(DurabilityMod::start(deps).unwrap_err(), StartupError::MissingCatalog);

        let deps = HostDependencies {
            catalog: Some(catalog()),
            ..Default::default()
        };
        assert!(DurabilityMod::enable(deps).is_none());
    }

    #[test]
    fn test_startup_applies_saved_multiplier() {
        let engine = start(MemoryStore::default().with(keys::DURABILITY_MULTIPLIER, SavedValue::Float(3.0)));
        assert!((max_of(&engine, 1) - 300.0).abs() < f64::EPSILON);
        // Not whitelisted
        assert!((max_of(&engine, 2) - 40.0).abs() < f64::EPSILON);
        assert_eq!(engine.load_report().applied, vec![keys::DURABILITY_MULTIPLIER]);
    }

    #[test]
    fn test_startup_subscribes_rescaler_once() {
        let engine = start(MemoryStore::default());
        assert_eq!(engine.config().observer_count(), 1);
    }

    #[test]
    fn test_refresh_view_keeps_text_on_bad_item() {
        let mut engine = start(MemoryStore::default().with(keys::RESTORE_MAX_DURABILITY, SavedValue::Bool(true)));
        let good = engine.catalog().borrow().get(ItemId(1)).unwrap().spawn()
            .with_loss(0.1)
            .with_durability(60.0);
        assert!(engine.refresh_view(&good, 180));

        let broken = engine.catalog().borrow().get(ItemId(1)).unwrap().spawn().with_loss(1.5);
        assert!(!engine.refresh_view(&broken, 999));
        assert!(!engine.refresh_view(&broken, 999));
        assert_eq!(engine.view().price_text(), "180 (80 +100)");
        assert_eq!(engine.view().durability_text(), Some("Max Durability +40 (+30 +10)"));
        assert!(engine.view().last_error().is_some());

        assert!(engine.refresh_view(&good, 180));
        assert!(engine.view().last_error().is_none());
    }

    #[test]
    fn test_config_change_rescales() {
        let mut engine = start(MemoryStore::default());
        engine.config_mut().set_multiplier(5.0).unwrap();
        engine.config_mut().set_multiplier(2.0).unwrap();
        assert!((max_of(&engine, 1) - 200.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_dynamic_entry_scaled_on_register() {
        let engine = start(MemoryStore::default().with(keys::DURABILITY_MULTIPLIER, SavedValue::Float(2.0)));
        let outcome = engine.register_dynamic_entry(
            ItemDefinition::new(50, "Modded Helmet", 60.0).with_tags(["Armor"]),
        );
        assert!(matches!(outcome, Some(ScaleOutcome::Scaled { .. })));
        assert!((max_of(&engine, 50) - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_repair_price_with_restore() {
        let mut engine = start(MemoryStore::default().with(keys::RESTORE_MAX_DURABILITY, SavedValue::Bool(true)));
        let item = engine.catalog().borrow().get(ItemId(1)).unwrap().spawn()
            .with_loss(0.1)
            .with_durability(60.0);

        assert_eq!(engine.repair_price(&item, 80), 180);
        engine.set_restore_toggle(false);
        assert_eq!(engine.repair_price(&item, 80), 80);
    }

    #[test]
    fn test_repair_price_falls_back_on_bad_item() {
        let mut engine = start(MemoryStore::default().with(keys::RESTORE_MAX_DURABILITY, SavedValue::Bool(true)));
        let item = engine.catalog().borrow().get(ItemId(1)).unwrap().spawn().with_loss(f64::NAN);
        assert_eq!(engine.repair_price(&item, 75), 75);
    }

    #[test]
    fn test_refresh_view_uses_localized_label() {
        let store = MemoryStore::default().with(keys::RESTORE_MAX_DURABILITY, SavedValue::Bool(true));
        let deps = HostDependencies::new(catalog(), store)
            .with_localizer(StringTable::with_defaults(Language::ChineseSimplified));
        let mut engine = DurabilityMod::start(deps).unwrap();
        let item = engine.catalog().borrow().get(ItemId(1)).unwrap().spawn()
            .with_loss(0.1)
            .with_durability(60.0);

        assert!(engine.refresh_view(&item, 180));
        assert_eq!(engine.view().durability_text(), Some("耐久上限 +40 (+30 +10)"));
        assert_eq!(engine.view().price_text(), "180 (80 +100)");
        assert_eq!(engine.restore_toggle_label(), "恢复上限");
    }
}
