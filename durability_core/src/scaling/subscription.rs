//! CatalogRescaler - reruns the catalog pass whenever the configuration changes

use super::CatalogScaler;
use crate::config::{ConfigObserver, Settings};
use crate::item::SharedCatalog;

/// Config observer that rescales the whole shared catalog on every change
#[derive(Debug, Clone)]
pub struct CatalogRescaler {
    catalog: SharedCatalog,
}

impl CatalogRescaler {
    pub fn new(catalog: SharedCatalog) -> Self {
        CatalogRescaler { catalog }
    }
}

impl ConfigObserver for CatalogRescaler {
    fn on_config_changed(&mut self, settings: &Settings) {
        // The host never mutates the catalog during a pass; a held borrow means a
        // change was fired from inside a catalog callback.
        match self.catalog.try_borrow_mut() {
            Ok(mut catalog) => {
                CatalogScaler::from_settings(settings).rescale_all(&mut catalog);
            }
            Err(_) => log::error!("Catalog is busy; rescale for config change skipped"),
        }
    }
}
