//! Terminal runtime.
//!
//! Owns the process-wide state containers (catalog cache, cart, cash gate,
//! settings) and the presentation collaborator, and wires them together into
//! the operator-facing operations. Execution is single-threaded and
//! cooperative: state is only mutated between network suspension points, so
//! the containers are plain owned fields with no locking.
//!
//! Policy on notifications: refresh operations return their error to the
//! caller (the refresh sequencer reports them keyed by step label); direct
//! operator actions notify success and failure themselves.

use serde_json::{json, Value};
use tracing::warn;

use crate::backend::Backend;
use crate::cart::Cart;
use crate::cash::CashGate;
use crate::catalog::CatalogCache;
use crate::error::PosError;
use crate::present::{Notice, Presenter, View};
use crate::settings::SettingsStore;
use crate::types::{CashClose, CashOpen, PaymentMethod};

pub struct Terminal<B: Backend> {
    backend: B,
    presenter: Box<dyn Presenter>,
    catalog: CatalogCache,
    cart: Cart,
    cash: CashGate,
    settings: SettingsStore,
    payment_method: PaymentMethod,
}

impl<B: Backend> Terminal<B> {
    pub fn new(backend: B, presenter: Box<dyn Presenter>) -> Self {
        Terminal {
            backend,
            presenter,
            catalog: CatalogCache::new(),
            cart: Cart::new(),
            cash: CashGate::new(),
            settings: SettingsStore::new(),
            payment_method: PaymentMethod::Cash,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn catalog(&self) -> &CatalogCache {
        &self.catalog
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cash(&self) -> &CashGate {
        &self.cash
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Select the payment method for the sale in progress. Re-renders the
    /// cart because the discount preview depends on it.
    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
        self.render_cart();
    }

    // -----------------------------------------------------------------------
    // Refresh operations (errors are the caller's to report)
    // -----------------------------------------------------------------------

    /// Fetch the full product list and swap the catalog wholesale. Cart
    /// totals resolve against the new catalog on the next render, so the
    /// cart view is refreshed too.
    pub async fn refresh_catalog(&mut self) -> Result<(), PosError> {
        let products = self.backend.list_products().await?;
        self.catalog.replace(products);
        self.render_catalog();
        self.render_cart();
        Ok(())
    }

    pub async fn reload_settings(&mut self) -> Result<(), PosError> {
        let result = self.settings.reload(&self.backend).await;
        // Discount preview may have changed either way (failure resets to
        // the no-discount default).
        self.render_cart();
        result
    }

    /// Re-derive the cash gate from the backend and render the new status.
    pub async fn refresh_cash(&mut self) -> Result<(), PosError> {
        let result = self.cash.refresh(&self.backend).await;
        self.render_cash_status();
        result
    }

    pub async fn refresh_dashboard(&mut self) -> Result<(), PosError> {
        let dashboard = self.backend.dashboard_today().await?;
        let data = serde_json::to_value(&dashboard).map_err(|e| PosError::Decode(e.to_string()))?;
        self.presenter.render(View::Dashboard, &data);
        Ok(())
    }

    pub async fn refresh_low_stock(&mut self) -> Result<(), PosError> {
        let items = self.backend.low_stock().await?;
        let data = serde_json::to_value(&items).map_err(|e| PosError::Decode(e.to_string()))?;
        self.presenter.render(View::LowStock, &data);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    pub fn set_search(&mut self, query: &str) {
        self.catalog.set_query(query);
        self.render_catalog();
    }

    // -----------------------------------------------------------------------
    // Cart actions
    // -----------------------------------------------------------------------

    /// Add a variant to the cart. The cash gate is re-derived first; selling
    /// against a closed register is refused before touching the cart.
    pub async fn add_to_cart(&mut self, variant_id: i64, quantity: u32) -> Result<(), PosError> {
        if self.refresh_cash().await.is_err() || !self.cash.is_open() {
            return self.action_failed(PosError::precondition("cash session closed"));
        }
        if let Err(err) = self.cart.add_line(&self.catalog, variant_id, quantity) {
            return self.action_failed(err);
        }
        self.render_cart();
        self.presenter.notify(Notice::Ok, "Item added to cart");
        Ok(())
    }

    pub fn remove_from_cart(&mut self, index: usize) {
        self.cart.remove_line(index);
        self.render_cart();
        self.presenter.notify(Notice::Ok, "Item removed");
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
        self.render_cart();
        self.presenter.notify(Notice::Ok, "Cart cleared");
    }

    // -----------------------------------------------------------------------
    // Cash actions
    // -----------------------------------------------------------------------

    pub async fn open_cash(
        &mut self,
        opening_amount: f64,
        opened_by: Option<String>,
    ) -> Result<(), PosError> {
        if !opening_amount.is_finite() || opening_amount < 0.0 {
            return self.action_failed(PosError::validation("Opening amount must be >= 0"));
        }
        let req = CashOpen {
            opening_amount,
            opened_by,
        };
        let result = self.cash.open(&self.backend, &req).await;
        self.render_cash_status();
        match result {
            Ok(_) => {
                self.presenter.notify(Notice::Ok, "Cash session opened");
                self.refresh_dashboard_soft().await;
                Ok(())
            }
            Err(err) => self.action_failed(err),
        }
    }

    /// Close the current session. Operator confirmation is a precondition
    /// supplied by the caller before invoking this.
    pub async fn close_cash(
        &mut self,
        closing_amount: f64,
        closed_by: Option<String>,
    ) -> Result<(), PosError> {
        if !closing_amount.is_finite() || closing_amount < 0.0 {
            return self.action_failed(PosError::validation("Closing amount must be >= 0"));
        }
        let req = CashClose {
            closing_amount,
            closed_by,
        };
        let result = self.cash.close(&self.backend, &req).await;
        self.render_cash_status();
        match result {
            Ok(_) => {
                self.presenter.notify(Notice::Ok, "Cash session closed");
                self.refresh_dashboard_soft().await;
                Ok(())
            }
            Err(err) => self.action_failed(err),
        }
    }

    /// Dashboard refresh that follows a cash mutation; its failure only
    /// warrants a notification, never fails the action that triggered it.
    async fn refresh_dashboard_soft(&mut self) {
        if let Err(err) = self.refresh_dashboard().await {
            warn!(error = %err, "dashboard refresh after cash action failed");
            self.presenter
                .notify(Notice::Err, &format!("dashboard: {err}"));
        }
    }

    // -----------------------------------------------------------------------
    // Shared helpers (crate-internal)
    // -----------------------------------------------------------------------

    /// Surface a failure to the operator as a readable notification.
    pub(crate) fn notify_error(&self, err: &PosError) {
        self.presenter.notify(Notice::Err, &err.to_string());
    }

    pub(crate) fn action_failed(&self, err: PosError) -> Result<(), PosError> {
        self.notify_error(&err);
        Err(err)
    }

    pub(crate) fn presenter(&self) -> &dyn Presenter {
        self.presenter.as_ref()
    }

    pub(crate) fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    pub(crate) fn render_cart(&self) {
        let lines: Vec<Value> = self
            .cart
            .lines()
            .iter()
            .map(|line| {
                let price = self
                    .catalog
                    .find_variant(line.variant_id)
                    .map(|v| v.price)
                    .unwrap_or(0.0);
                json!({
                    "variant_id": line.variant_id,
                    "quantity": line.quantity,
                    "label": line.label,
                    "unit_price": price,
                    "line_total": price * f64::from(line.quantity),
                })
            })
            .collect();

        let preview = self
            .cart
            .discount_preview(&self.catalog, self.payment_method, self.settings.current());
        let data = json!({
            "lines": lines,
            "subtotal": self.cart.subtotal(&self.catalog),
            "payment_method": self.payment_method.as_str(),
            "discount": preview,
        });
        self.presenter.render(View::Cart, &data);
    }

    pub(crate) fn render_catalog(&self) {
        let data = json!({
            "query": self.catalog.query(),
            "view": self.catalog.view(),
            "variants": self.catalog.flat_variants().iter().map(|v| json!({
                "product_id": v.product_id,
                "variant_id": v.variant_id,
                "label": v.label,
                "price": v.price,
                "stock": v.stock,
                "stock_min": v.stock_min,
            })).collect::<Vec<_>>(),
        });
        self.presenter.render(View::Catalog, &data);
    }

    pub(crate) fn render_cash_status(&self) {
        let data = json!({
            "open": self.cash.is_open(),
            "session": self.cash.session(),
        });
        self.presenter.render(View::CashStatus, &data);
    }
}
