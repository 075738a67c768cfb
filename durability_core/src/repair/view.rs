//! RepairView - panel-local state: restore toggle and the last rendered texts

use super::{RepairEconomy, RepairError};
use crate::config::Settings;
use crate::item::ItemState;

/// The panel's "restore ceiling" switch.
///
/// Starts enabled for every new panel instance and is never persisted. It only
/// shows while the global restore setting is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreToggle {
    pub enabled: bool,
    pub visible: bool,
}

impl Default for RestoreToggle {
    fn default() -> Self {
        RestoreToggle {
            enabled: true,
            visible: false,
        }
    }
}

impl RestoreToggle {
    pub fn update_visibility(&mut self, settings: &Settings) {
        self.visible = settings.restore_max_durability;
    }
}

/// Logs an error the first time it is seen, then stays quiet until a different
/// error or a success resets it
#[derive(Debug, Clone, Default)]
pub struct ErrorLatch {
    last: Option<RepairError>,
}

impl ErrorLatch {
    /// Returns true if the error was logged
    pub fn report(&mut self, context: &str, error: RepairError) -> bool {
        if self.last.as_ref() == Some(&error) {
            return false;
        }
        log::error!("{} failed: {}", context, error);
        self.last = Some(error);
        true
    }

    pub fn clear(&mut self) {
        self.last = None;
    }

    pub fn last(&self) -> Option<&RepairError> {
        self.last.as_ref()
    }
}

/// Display state of the repair panel
#[derive(Debug, Clone, Default)]
pub struct RepairView {
    pub toggle: RestoreToggle,
    price_text: String,
    /// `None` leaves the host's own durability text in place
    durability_text: Option<String>,
    errors: ErrorLatch,
}

impl RepairView {
    pub fn new() -> Self {
        RepairView::default()
    }

    pub fn is_restore_enabled(&self) -> bool {
        self.toggle.enabled
    }

    pub fn set_restore_enabled(&mut self, enabled: bool) {
        self.toggle.enabled = enabled;
    }

    pub fn price_text(&self) -> &str {
        &self.price_text
    }

    pub fn durability_text(&self) -> Option<&str> {
        self.durability_text.as_deref()
    }

    pub fn last_error(&self) -> Option<&RepairError> {
        self.errors.last()
    }

    /// Recompute both texts for the selected item.
    ///
    /// `host_price` is the host's total price (surcharge included). On error the
    /// previous texts stay on screen.
    pub fn refresh(
        &mut self,
        settings: &Settings,
        item: &ItemState,
        host_price: u32,
        label: &str,
    ) -> Result<(), RepairError> {
        self.toggle.update_visibility(settings);
        let economy = RepairEconomy::new(settings, self.toggle.enabled);

        match render(&economy, item, host_price, label) {
            Ok((price_text, durability_text)) => {
                self.price_text = price_text;
                self.durability_text = durability_text;
                self.errors.clear();
                Ok(())
            }
            Err(e) => {
                self.errors.report("Repair panel refresh", e.clone());
                Err(e)
            }
        }
    }
}

fn render(
    economy: &RepairEconomy<'_>,
    item: &ItemState,
    host_price: u32,
    label: &str,
) -> Result<(String, Option<String>), RepairError> {
    let price_text = economy
        .price_breakdown(item, host_price)?
        .map_or_else(|| host_price.to_string(), |b| b.to_string());
    let durability_text = economy
        .durability_preview(item)?
        .map(|preview| preview.render(label));
    Ok((price_text, durability_text))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;

    #[test]
    fn test_toggle_defaults() {
        let view = RepairView::new();
        assert!(view.is_restore_enabled());
        assert!(!view.toggle.visible);
    }

    #[test]
    fn test_refresh_restore_mode() {
        let settings = restore_settings();
        let mut view = RepairView::new();
        let item = weapon(100.0, 0.1, 60.0);

        view.refresh(&settings, &item, 180, "Max Durability").unwrap();
        assert!(view.toggle.visible);
        assert_eq!(view.price_text(), "180 (80 +100)");
        assert_eq!(view.durability_text(), Some("Max Durability +40 (+30 +10)"));
    }

    #[test]
    fn test_refresh_toggle_off_shows_host_values() {
        let settings = restore_settings();
        let mut view = RepairView::new();
        view.set_restore_enabled(false);

        view.refresh(&settings, &weapon(100.0, 0.1, 60.0), 80, "Max Durability")
            .unwrap();
        assert_eq!(view.price_text(), "80");
        assert_eq!(view.durability_text(), None);
    }

    #[test]
    fn test_error_keeps_previous_text() {
        let settings = restore_settings();
        let mut view = RepairView::new();
        view.refresh(&settings, &weapon(100.0, 0.1, 60.0), 180, "Max Durability")
            .unwrap();

        let broken = weapon(100.0, f64::NAN, 60.0);
        assert!(view
            .refresh(&settings, &broken, 999, "Max Durability")
            .is_err());
        assert_eq!(view.price_text(), "180 (80 +100)");
        assert!(view.last_error().is_some());
    }

    #[test]
    fn test_error_latch_logs_once() {
        let mut latch = ErrorLatch::default();
        let error = RepairError::LossOutOfRange(2.0);
        assert!(latch.report("test", error.clone()));
        assert!(!latch.report("test", error.clone()));
        assert!(latch.report("test", RepairError::InvalidMaxDurability(0.0)));
        latch.clear();
        assert!(latch.report("test", error));
    }
}
