//! Wire types shared with the catalog/cash/sales backend.
//!
//! These mirror the backend's response and request schemas one-to-one. The
//! terminal never constructs a `Sale` locally; it only displays what the
//! backend returns after accepting a submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub active: bool,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    pub id: i64,
    pub product_id: i64,
    pub variant_name: String,
    #[serde(default)]
    pub sku: Option<String>,
    pub price: f64,
    pub stock: i64,
    #[serde(default)]
    pub stock_min: Option<i64>,
}

/// Request body for `POST /products/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub category: Option<String>,
    pub active: bool,
}

/// Request body for `POST /products/{id}/variants`.
#[derive(Debug, Clone, Serialize)]
pub struct NewVariant {
    pub variant_name: String,
    pub sku: Option<String>,
    pub price: f64,
    pub stock: i64,
    pub stock_min: Option<i64>,
}

/// Request body for `PATCH /products/variants/{id}`. Only the present fields
/// are sent; the backend leaves the rest untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VariantPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_min: Option<i64>,
}

// ---------------------------------------------------------------------------
// Cash session
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashSession {
    pub id: i64,
    pub opened_at: DateTime<Utc>,
    #[serde(default)]
    pub opened_by: Option<String>,
    pub opening_amount: f64,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_by: Option<String>,
    #[serde(default)]
    pub closing_amount: Option<f64>,
    #[serde(default)]
    pub expected_amount: Option<f64>,
    #[serde(default)]
    pub difference_amount: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CashOpen {
    pub opening_amount: f64,
    pub opened_by: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CashClose {
    pub closing_amount: f64,
    pub closed_by: Option<String>,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Store-wide settings relevant to the terminal. Defaults to "no discount"
/// so the cart math never observes a missing value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default)]
    pub cash_discount_enabled: bool,
    #[serde(default)]
    pub cash_discount_percent: f64,
}

// ---------------------------------------------------------------------------
// Sales
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Transfer,
    CardMp,
}

impl PaymentMethod {
    /// Wire value, also used for the sales-list query filter.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Transfer => "TRANSFER",
            PaymentMethod::CardMp => "CARD_MP",
        }
    }
}

/// Line of a sale submission: ids and quantities only. Prices and totals are
/// computed by the backend, never sent from the terminal.
#[derive(Debug, Clone, Serialize)]
pub struct SaleDraftItem {
    pub variant_id: i64,
    pub quantity: u32,
}

/// Request body for `POST /sales/`.
#[derive(Debug, Clone, Serialize)]
pub struct SaleDraft {
    pub payment_method: PaymentMethod,
    pub items: Vec<SaleDraftItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItem {
    pub id: i64,
    pub variant_id: i64,
    pub quantity: i64,
    pub unit_price_at_sale: f64,
    pub line_total: f64,
}

/// A confirmed sale as returned by the backend. Read-only projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub payment_method: String,
    #[serde(default)]
    pub discount_percent: Option<f64>,
    pub subtotal: f64,
    pub total: f64,
    #[serde(default)]
    pub items: Vec<SaleItem>,
}

// ---------------------------------------------------------------------------
// Dashboard and reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    pub payment_method: String,
    pub total: f64,
    pub count_sales: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopItem {
    pub variant_id: i64,
    pub variant_name: String,
    pub product_id: i64,
    pub product_name: String,
    pub quantity_sold: i64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardToday {
    /// YYYY-MM-DD, as reported by the backend.
    pub day: String,
    pub total_sales: i64,
    pub gross_total: f64,
    #[serde(default)]
    pub breakdown: Vec<PaymentBreakdown>,
    #[serde(default)]
    pub top_items: Vec<TopItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowStockItem {
    pub variant_id: i64,
    pub variant_name: String,
    pub product_id: i64,
    pub product_name: String,
    pub stock: i64,
    pub stock_min: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_wire_values() {
        assert_eq!(
            serde_json::to_value(PaymentMethod::Cash).unwrap(),
            serde_json::json!("CASH")
        );
        assert_eq!(
            serde_json::to_value(PaymentMethod::CardMp).unwrap(),
            serde_json::json!("CARD_MP")
        );
        let parsed: PaymentMethod = serde_json::from_str("\"TRANSFER\"").unwrap();
        assert_eq!(parsed, PaymentMethod::Transfer);
    }

    #[test]
    fn test_variant_patch_omits_absent_fields() {
        let patch = VariantPatch {
            stock: Some(7),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({ "stock": 7 }));
    }

    #[test]
    fn test_sale_decodes_backend_shape() {
        let raw = serde_json::json!({
            "id": 3,
            "created_at": "2025-04-02T14:30:00Z",
            "payment_method": "CASH",
            "discount_percent": 10.0,
            "subtotal": 15.0,
            "total": 13.5,
            "items": [
                { "id": 1, "variant_id": 10, "quantity": 3,
                  "unit_price_at_sale": 5.0, "line_total": 15.0 }
            ]
        });
        let sale: Sale = serde_json::from_value(raw).unwrap();
        assert_eq!(sale.items.len(), 1);
        assert_eq!(sale.total, 13.5);
    }
}
