//! Process-wide store settings.
//!
//! Loaded once at startup and explicitly reloadable. A failed load resets the
//! store to the disabled/0 default so discount math never observes a missing
//! value; the error is still returned so the refresh sequencer can report the
//! step against its label.

use tracing::debug;

use crate::backend::Backend;
use crate::error::PosError;
use crate::types::StoreSettings;

#[derive(Debug, Default)]
pub struct SettingsStore {
    current: StoreSettings,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &StoreSettings {
        &self.current
    }

    pub async fn reload<B: Backend>(&mut self, backend: &B) -> Result<(), PosError> {
        match backend.get_settings().await {
            Ok(settings) => {
                debug!(
                    cash_discount_enabled = settings.cash_discount_enabled,
                    cash_discount_percent = settings.cash_discount_percent,
                    "settings reloaded"
                );
                self.current = settings;
                Ok(())
            }
            Err(err) => {
                self.current = StoreSettings::default();
                Err(err)
            }
        }
    }
}
