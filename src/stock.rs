//! Stock adjustment and catalog administration.
//!
//! Delta and absolute stock mutations against a single variant, with local
//! pre-validation mirroring the backend's invariants (stock never negative).
//! The backend only accepts absolute values, so a delta is resolved against
//! the cached stock before submission. Every successful mutation triggers a
//! full catalog refresh so search results, admin lists, and cart price
//! lookups observe the change immediately.

use tracing::{info, warn};

use crate::backend::Backend;
use crate::error::PosError;
use crate::present::Notice;
use crate::terminal::Terminal;
use crate::types::{NewProduct, NewVariant, VariantPatch};

impl<B: Backend> Terminal<B> {
    /// Apply a signed stock delta to a variant. The resulting absolute stock
    /// is what gets submitted.
    pub async fn apply_stock_delta(&mut self, variant_id: i64, delta: i64) -> Result<(), PosError> {
        if delta == 0 {
            return self.action_failed(PosError::validation(
                "Stock delta must be non-zero (e.g. 5 or -2)",
            ));
        }
        let current = match self.catalog().find_variant(variant_id) {
            Some(v) => v.stock,
            None => {
                return self.action_failed(PosError::validation(format!(
                    "Variant {variant_id} is not loaded; refresh the catalog first"
                )));
            }
        };
        let next = current + delta;
        if next < 0 {
            return self.action_failed(PosError::validation(format!(
                "Stock cannot go negative ({current} {delta:+} = {next})"
            )));
        }

        let patch = VariantPatch {
            stock: Some(next),
            ..Default::default()
        };
        match self.backend().update_variant(variant_id, &patch).await {
            Ok(updated) => {
                info!(
                    variant_id,
                    before = current,
                    after = updated.stock,
                    "stock delta applied"
                );
                self.presenter().notify(
                    Notice::Ok,
                    &format!("Stock updated: {current} -> {}", updated.stock),
                );
                self.refresh_catalog_after_mutation().await;
                Ok(())
            }
            Err(err) => self.action_failed(err),
        }
    }

    /// Set a variant's stock to an absolute value.
    pub async fn set_stock(&mut self, variant_id: i64, value: i64) -> Result<(), PosError> {
        if value < 0 {
            return self.action_failed(PosError::validation("Stock must be >= 0"));
        }
        let patch = VariantPatch {
            stock: Some(value),
            ..Default::default()
        };
        match self.backend().update_variant(variant_id, &patch).await {
            Ok(updated) => {
                info!(variant_id, stock = updated.stock, "stock set");
                self.presenter()
                    .notify(Notice::Ok, &format!("Stock set to {}", updated.stock));
                self.refresh_catalog_after_mutation().await;
                Ok(())
            }
            Err(err) => self.action_failed(err),
        }
    }

    // -----------------------------------------------------------------------
    // Catalog administration
    // -----------------------------------------------------------------------

    pub async fn create_product(
        &mut self,
        name: &str,
        category: Option<String>,
        active: bool,
    ) -> Result<(), PosError> {
        let name = name.trim();
        if name.is_empty() {
            return self.action_failed(PosError::validation("Product name is required"));
        }
        let req = NewProduct {
            name: name.to_string(),
            category: category.filter(|c| !c.trim().is_empty()),
            active,
        };
        match self.backend().create_product(&req).await {
            Ok(product) => {
                self.presenter()
                    .notify(Notice::Ok, &format!("Product \"{}\" created", product.name));
                self.refresh_catalog_after_mutation().await;
                Ok(())
            }
            Err(err) => self.action_failed(err),
        }
    }

    pub async fn create_variant(
        &mut self,
        product_id: i64,
        variant: NewVariant,
    ) -> Result<(), PosError> {
        if variant.variant_name.trim().is_empty() {
            return self.action_failed(PosError::validation("Variant name is required"));
        }
        if !variant.price.is_finite() || variant.price < 0.0 {
            return self.action_failed(PosError::validation("Price must be >= 0"));
        }
        if variant.stock < 0 {
            return self.action_failed(PosError::validation("Stock must be >= 0"));
        }
        if variant.stock_min.is_some_and(|m| m < 0) {
            return self.action_failed(PosError::validation("Minimum stock must be >= 0"));
        }
        match self.backend().create_variant(product_id, &variant).await {
            Ok(created) => {
                self.presenter().notify(
                    Notice::Ok,
                    &format!("Variant \"{}\" created", created.variant_name),
                );
                self.refresh_catalog_after_mutation().await;
                Ok(())
            }
            Err(err) => self.action_failed(err),
        }
    }

    /// Edit a variant's descriptive fields or price. Stock changes go through
    /// [`Terminal::apply_stock_delta`] / [`Terminal::set_stock`].
    pub async fn update_variant(
        &mut self,
        variant_id: i64,
        patch: VariantPatch,
    ) -> Result<(), PosError> {
        if patch.variant_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return self.action_failed(PosError::validation("Variant name cannot be empty"));
        }
        if patch.price.is_some_and(|p| !p.is_finite() || p < 0.0) {
            return self.action_failed(PosError::validation("Price must be >= 0"));
        }
        if patch.stock_min.is_some_and(|m| m < 0) {
            return self.action_failed(PosError::validation("Minimum stock must be >= 0"));
        }
        match self.backend().update_variant(variant_id, &patch).await {
            Ok(updated) => {
                self.presenter().notify(
                    Notice::Ok,
                    &format!("Variant \"{}\" updated", updated.variant_name),
                );
                self.refresh_catalog_after_mutation().await;
                Ok(())
            }
            Err(err) => self.action_failed(err),
        }
    }

    /// Catalog refresh following a successful mutation. The mutation already
    /// committed, so a refresh failure is surfaced but does not fail the
    /// operation (a retry would re-apply the mutation).
    async fn refresh_catalog_after_mutation(&mut self) {
        if let Err(err) = self.refresh_catalog().await {
            warn!(error = %err, "catalog refresh after mutation failed");
            self.presenter()
                .notify(Notice::Err, &format!("catalog: {err}"));
        }
    }
}
