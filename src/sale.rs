//! Sale confirmation workflow and sales history.
//!
//! Confirmation checks its preconditions in order (open cash session, then
//! non-empty cart), submits ids and quantities only, and on success drives the
//! dependent refreshes — catalog, dashboard, low stock, today's sales — each
//! isolated so one failing fetch cannot abort the others, before clearing the
//! cart. A failed submission leaves the cart untouched for a manual retry.

use chrono::Utc;
use tracing::{info, warn};

use crate::backend::Backend;
use crate::error::PosError;
use crate::present::{Notice, View};
use crate::terminal::Terminal;
use crate::types::{PaymentMethod, Sale, SaleDraft};

/// Today's date as YYYY-MM-DD, the backend's sales-list day format.
pub fn today_iso() -> String {
    Utc::now().date_naive().to_string()
}

impl<B: Backend> Terminal<B> {
    /// Confirm the sale in progress using the selected payment method.
    pub async fn confirm_sale(&mut self) -> Result<Sale, PosError> {
        // Precondition 1: the gate is re-derived, never trusted from memory.
        if self.refresh_cash().await.is_err() || !self.cash().is_open() {
            let err = PosError::precondition("cash session closed");
            self.notify_error(&err);
            return Err(err);
        }
        // Precondition 2: something to sell.
        if self.cart().is_empty() {
            let err = PosError::precondition("empty cart");
            self.notify_error(&err);
            return Err(err);
        }

        let draft = SaleDraft {
            payment_method: self.payment_method(),
            items: self.cart().draft_items(),
        };

        let sale = match self.backend().create_sale(&draft).await {
            Ok(sale) => sale,
            Err(err) => {
                // Cart stays as-is so the operator can retry without
                // re-entering items.
                self.notify_error(&err);
                return Err(err);
            }
        };

        info!(sale_id = sale.id, total = sale.total, "sale confirmed");
        self.render_receipt(&sale);
        self.presenter()
            .notify(Notice::Ok, &format!("Sale #{} recorded", sale.id));

        // Dependent refreshes, failure-isolated: the sale is already
        // committed on the backend, a stale side view must not undo that.
        let result = self.refresh_catalog().await;
        self.report_refresh("catalog", result);
        let result = self.refresh_dashboard().await;
        self.report_refresh("dashboard", result);
        let result = self.refresh_low_stock().await;
        self.report_refresh("low stock", result);
        let result = self.refresh_sales_today(None, None).await;
        self.report_refresh("sales today", result);

        self.cart_mut().clear();
        self.render_cart();
        Ok(sale)
    }

    /// Fetch and render the sales list for a day (default: today), optionally
    /// filtered by payment method.
    pub async fn refresh_sales_today(
        &mut self,
        day: Option<&str>,
        payment_method: Option<PaymentMethod>,
    ) -> Result<(), PosError> {
        let day = day.map(str::to_string).unwrap_or_else(today_iso);
        let sales = self.backend().sales_for_day(&day, payment_method).await?;
        let data = serde_json::json!({
            "day": day,
            "payment_method": payment_method.map(|pm| pm.as_str()),
            "count": sales.len(),
            "sales": sales,
        });
        self.presenter().render(View::SalesToday, &data);
        Ok(())
    }

    /// Fetch one confirmed sale and render it as a receipt (used from the
    /// history list).
    pub async fn view_sale(&mut self, sale_id: i64) -> Result<(), PosError> {
        match self.backend().get_sale(sale_id).await {
            Ok(sale) => {
                self.render_receipt(&sale);
                Ok(())
            }
            Err(err) => {
                self.notify_error(&err);
                Err(err)
            }
        }
    }

    fn render_receipt(&self, sale: &Sale) {
        match serde_json::to_value(sale) {
            Ok(data) => self.presenter().render(View::Receipt, &data),
            Err(err) => warn!(error = %err, "receipt serialization failed"),
        }
    }

    /// Report a post-sale refresh outcome against its label without letting
    /// it propagate.
    fn report_refresh(&self, label: &str, result: Result<(), PosError>) {
        if let Err(err) = result {
            warn!(step = label, error = %err, "post-sale refresh step failed");
            self.presenter()
                .notify(Notice::Err, &format!("{label}: {err}"));
        }
    }
}
