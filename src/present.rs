//! Presentation collaborator contract.
//!
//! The core never formats currency or dates; it hands each view raw JSON
//! (numbers and ISO strings) through `render`, and every success or failure
//! the operator should see goes through `notify` as a readable message. What
//! the collaborator does with either is its own business.

use serde_json::Value;
use tracing::{error, info};

/// Views the terminal pushes data to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Cart,
    Receipt,
    Dashboard,
    LowStock,
    SalesToday,
    Catalog,
    CashStatus,
}

impl View {
    pub fn label(&self) -> &'static str {
        match self {
            View::Cart => "cart",
            View::Receipt => "receipt",
            View::Dashboard => "dashboard",
            View::LowStock => "low-stock",
            View::SalesToday => "sales-today",
            View::Catalog => "catalog",
            View::CashStatus => "cash-status",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Ok,
    Err,
}

pub trait Presenter {
    fn render(&self, view: View, data: &Value);
    fn notify(&self, kind: Notice, message: &str);
}

/// Default presenter: logs renders and notices through `tracing`. Useful for
/// headless runs and as the stand-in until a real front end is attached.
#[derive(Debug, Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn render(&self, view: View, data: &Value) {
        info!(view = view.label(), data = %data, "render");
    }

    fn notify(&self, kind: Notice, message: &str) {
        match kind {
            Notice::Ok => info!("{message}"),
            Notice::Err => error!("{message}"),
        }
    }
}
