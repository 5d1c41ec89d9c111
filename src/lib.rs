//! Corner POS - terminal client runtime.
//!
//! Client-side state orchestration for a single point-of-sale terminal: a
//! continuously-refreshed mirror of the remote catalog/cash/sales backend,
//! the cart and its derived totals, the cash-session gate, the
//! sale-confirmation workflow, and the failure-isolated bootstrap/refresh
//! sequencer. Rendering is delegated to an external collaborator through the
//! [`present::Presenter`] contract; the backend stays authoritative for
//! prices, stock, and totals — this layer only mirrors and previews them.

pub mod api;
pub mod backend;
pub mod bootstrap;
pub mod cart;
pub mod cash;
pub mod catalog;
pub mod config;
pub mod error;
pub mod present;
pub mod sale;
pub mod settings;
pub mod stock;
pub mod terminal;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::ApiClient;
pub use backend::{Backend, HttpBackend};
pub use bootstrap::{RefreshReport, StepOutcome};
pub use cart::{Cart, CartLine, DiscountPreview};
pub use cash::{CashGate, CashState};
pub use catalog::CatalogCache;
pub use error::PosError;
pub use present::{LogPresenter, Notice, Presenter, View};
pub use settings::SettingsStore;
pub use terminal::Terminal;
