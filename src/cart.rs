//! Cart aggregate.
//!
//! The operator's in-progress selection of variants and quantities for one
//! sale. Prices are never stored on a line: totals resolve each variant
//! against the current catalog at read time, so a stale cart self-corrects
//! the moment the catalog refreshes. A variant that can no longer be resolved
//! contributes 0 to the subtotal rather than failing the computation.

use serde::Serialize;

use crate::catalog::CatalogCache;
use crate::error::PosError;
use crate::types::{PaymentMethod, SaleDraftItem, StoreSettings};

#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    pub variant_id: i64,
    pub quantity: u32,
    /// Human-readable `product - variant`, frozen at add time. The catalog
    /// may rename the variant later; the label on the line does not change.
    pub label: String,
}

/// Cash-discount preview. The authoritative discount is recomputed by the
/// backend inside the confirmed sale.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DiscountPreview {
    pub percent: f64,
    pub discounted_total: f64,
}

#[derive(Debug, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add a quantity of a variant.
    ///
    /// If a line for the variant already exists its quantity is incremented;
    /// otherwise a new line is appended. At most one line per variant.
    pub fn add_line(
        &mut self,
        catalog: &CatalogCache,
        variant_id: i64,
        quantity: u32,
    ) -> Result<(), PosError> {
        if quantity == 0 {
            return Err(PosError::validation("Quantity must be greater than zero"));
        }
        let variant = catalog
            .find_variant(variant_id)
            .ok_or_else(|| PosError::validation(format!("Unknown variant {variant_id}")))?;

        if let Some(line) = self.lines.iter_mut().find(|l| l.variant_id == variant_id) {
            line.quantity += quantity;
            return Ok(());
        }

        let label = match catalog.find_product_of_variant(variant_id) {
            Some(p) => format!("{} - {}", p.name, variant.variant_name),
            None => variant.variant_name.clone(),
        };
        self.lines.push(CartLine {
            variant_id,
            quantity,
            label,
        });
        Ok(())
    }

    /// Remove a line by position. Out-of-range indices are a silent no-op;
    /// callers only offer indices taken from the rendered cart.
    pub fn remove_line(&mut self, index: usize) {
        if index < self.lines.len() {
            self.lines.remove(index);
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of resolved price × quantity over all lines. Exactly 0 when empty.
    pub fn subtotal(&self, catalog: &CatalogCache) -> f64 {
        self.lines
            .iter()
            .map(|line| {
                let price = catalog
                    .find_variant(line.variant_id)
                    .map(|v| v.price)
                    .unwrap_or(0.0);
                price * f64::from(line.quantity)
            })
            .sum()
    }

    /// Client-side estimate of the cash discount. `None` means "no discount":
    /// payment is not cash, the discount is disabled, the percent is not
    /// positive, or the cart is empty.
    pub fn discount_preview(
        &self,
        catalog: &CatalogCache,
        payment_method: PaymentMethod,
        settings: &StoreSettings,
    ) -> Option<DiscountPreview> {
        if payment_method != PaymentMethod::Cash
            || !settings.cash_discount_enabled
            || settings.cash_discount_percent <= 0.0
            || self.lines.is_empty()
        {
            return None;
        }
        let percent = settings.cash_discount_percent;
        Some(DiscountPreview {
            percent,
            discounted_total: self.subtotal(catalog) * (1.0 - percent / 100.0),
        })
    }

    /// Submission items: ids and quantities only, no prices.
    pub fn draft_items(&self) -> Vec<SaleDraftItem> {
        self.lines
            .iter()
            .map(|l| SaleDraftItem {
                variant_id: l.variant_id,
                quantity: l.quantity,
            })
            .collect()
    }
}
