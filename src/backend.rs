//! Typed backend surface.
//!
//! [`Backend`] is the seam between the terminal's workflows and the remote
//! service: one async method per consumed endpoint. The production
//! implementation, [`HttpBackend`], decodes the JSON bodies returned by
//! [`ApiClient`] into the `types` structs; tests substitute an in-memory fake.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::ApiClient;
use crate::error::PosError;
use crate::types::{
    CashClose, CashOpen, CashSession, DashboardToday, LowStockItem, NewProduct, NewVariant,
    PaymentMethod, Product, Sale, SaleDraft, StoreSettings, Variant, VariantPatch,
};

/// Remote operations the terminal consumes.
///
/// Every method maps to exactly one request; callers decide what to do with a
/// failure (there are no retries at this level).
#[allow(async_fn_in_trait)]
pub trait Backend {
    async fn get_settings(&self) -> Result<StoreSettings, PosError>;

    /// The current open cash session. An error response (including "no open
    /// session") is how the backend signals Closed.
    async fn current_cash_session(&self) -> Result<CashSession, PosError>;
    async fn open_cash(&self, req: &CashOpen) -> Result<CashSession, PosError>;
    async fn close_cash(&self, req: &CashClose) -> Result<CashSession, PosError>;

    async fn list_products(&self) -> Result<Vec<Product>, PosError>;
    async fn create_product(&self, req: &NewProduct) -> Result<Product, PosError>;
    async fn create_variant(&self, product_id: i64, req: &NewVariant)
        -> Result<Variant, PosError>;
    async fn update_variant(&self, variant_id: i64, req: &VariantPatch)
        -> Result<Variant, PosError>;

    async fn dashboard_today(&self) -> Result<DashboardToday, PosError>;
    async fn low_stock(&self) -> Result<Vec<LowStockItem>, PosError>;

    async fn sales_for_day(
        &self,
        day: &str,
        payment_method: Option<PaymentMethod>,
    ) -> Result<Vec<Sale>, PosError>;
    async fn get_sale(&self, sale_id: i64) -> Result<Sale, PosError>;
    async fn create_sale(&self, draft: &SaleDraft) -> Result<Sale, PosError>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

pub struct HttpBackend {
    client: ApiClient,
}

impl HttpBackend {
    pub fn new(client: ApiClient) -> Self {
        HttpBackend { client }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, PosError> {
        let value = self.client.call(Method::GET, path, None).await?;
        decode(value)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &impl serde::Serialize,
    ) -> Result<T, PosError> {
        let body = serde_json::to_value(body).map_err(|e| PosError::Decode(e.to_string()))?;
        let value = self.client.call(method, path, Some(&body)).await?;
        decode(value)
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, PosError> {
    serde_json::from_value(value).map_err(|e| PosError::Decode(e.to_string()))
}

impl Backend for HttpBackend {
    async fn get_settings(&self) -> Result<StoreSettings, PosError> {
        self.get("/settings/").await
    }

    async fn current_cash_session(&self) -> Result<CashSession, PosError> {
        self.get("/cash/current").await
    }

    async fn open_cash(&self, req: &CashOpen) -> Result<CashSession, PosError> {
        self.send(Method::POST, "/cash/open", req).await
    }

    async fn close_cash(&self, req: &CashClose) -> Result<CashSession, PosError> {
        self.send(Method::POST, "/cash/close", req).await
    }

    async fn list_products(&self) -> Result<Vec<Product>, PosError> {
        self.get("/products/").await
    }

    async fn create_product(&self, req: &NewProduct) -> Result<Product, PosError> {
        self.send(Method::POST, "/products/", req).await
    }

    async fn create_variant(
        &self,
        product_id: i64,
        req: &NewVariant,
    ) -> Result<Variant, PosError> {
        self.send(Method::POST, &format!("/products/{product_id}/variants"), req)
            .await
    }

    async fn update_variant(
        &self,
        variant_id: i64,
        req: &VariantPatch,
    ) -> Result<Variant, PosError> {
        self.send(Method::PATCH, &format!("/products/variants/{variant_id}"), req)
            .await
    }

    async fn dashboard_today(&self) -> Result<DashboardToday, PosError> {
        self.get("/dashboard/today").await
    }

    async fn low_stock(&self) -> Result<Vec<LowStockItem>, PosError> {
        self.get("/reports/low-stock").await
    }

    async fn sales_for_day(
        &self,
        day: &str,
        payment_method: Option<PaymentMethod>,
    ) -> Result<Vec<Sale>, PosError> {
        let mut path = format!("/sales/?day={day}");
        if let Some(pm) = payment_method {
            path.push_str("&payment_method=");
            path.push_str(pm.as_str());
        }
        self.get(&path).await
    }

    async fn get_sale(&self, sale_id: i64) -> Result<Sale, PosError> {
        self.get(&format!("/sales/{sale_id}")).await
    }

    async fn create_sale(&self, draft: &SaleDraft) -> Result<Sale, PosError> {
        self.send(Method::POST, "/sales/", draft).await
    }
}
