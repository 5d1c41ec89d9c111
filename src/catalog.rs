//! Catalog cache.
//!
//! Holds the full product/variant list fetched from the backend plus a
//! derived, search-filtered view used at sale time. The cache is replaced
//! wholesale on every refresh (no partial merge) and is always a hint, never
//! ground truth: price and stock decisions are re-validated by the backend.

use tracing::trace;

use crate::types::{Product, Variant};

/// Flattened variant summary for admin pickers.
#[derive(Debug, Clone)]
pub struct VariantSummary {
    pub product_id: i64,
    pub variant_id: i64,
    /// `product - variant`, the same label frozen onto cart lines.
    pub label: String,
    pub price: f64,
    pub stock: i64,
    pub stock_min: Option<i64>,
}

#[derive(Debug, Default)]
pub struct CatalogCache {
    products: Vec<Product>,
    view: Vec<Product>,
    query: String,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole cache in one swap, then recompute the filtered view.
    pub fn replace(&mut self, products: Vec<Product>) {
        trace!(count = products.len(), "catalog replaced");
        self.products = products;
        self.apply_search();
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// The search-filtered view. With an empty query this is the full cache
    /// in its original order.
    pub fn view(&self) -> &[Product] {
        &self.view
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.trim().to_string();
        self.apply_search();
    }

    /// Recompute the filtered view from the current query.
    ///
    /// A product is included if its name or category matches, or if at least
    /// one variant matches. When only variants matched, the view product
    /// carries just those variants; otherwise it carries all of them.
    fn apply_search(&mut self) {
        let q = self.query.to_lowercase();
        if q.is_empty() {
            self.view = self.products.clone();
            return;
        }

        let mut filtered = Vec::new();
        for p in &self.products {
            let name_hit = p.name.to_lowercase().contains(&q);
            let category_hit = p
                .category
                .as_deref()
                .map(|c| c.to_lowercase().contains(&q))
                .unwrap_or(false);

            let matched_variants: Vec<Variant> = p
                .variants
                .iter()
                .filter(|v| v.variant_name.to_lowercase().contains(&q))
                .cloned()
                .collect();

            if name_hit || category_hit || !matched_variants.is_empty() {
                let variants = if name_hit || category_hit {
                    p.variants.clone()
                } else {
                    matched_variants
                };
                filtered.push(Product {
                    variants,
                    ..p.clone()
                });
            }
        }
        self.view = filtered;
    }

    /// Linear lookup across all products' variants. `None` means "not yet
    /// loaded", not a hard error.
    pub fn find_variant(&self, variant_id: i64) -> Option<&Variant> {
        self.products
            .iter()
            .flat_map(|p| p.variants.iter())
            .find(|v| v.id == variant_id)
    }

    /// The product owning a variant, if loaded.
    pub fn find_product_of_variant(&self, variant_id: i64) -> Option<&Product> {
        self.products
            .iter()
            .find(|p| p.variants.iter().any(|v| v.id == variant_id))
    }

    /// Flatten every variant with its owning product's name.
    pub fn flat_variants(&self) -> Vec<VariantSummary> {
        let mut out = Vec::new();
        for p in &self.products {
            for v in &p.variants {
                out.push(VariantSummary {
                    product_id: p.id,
                    variant_id: v.id,
                    label: format!("{} - {}", p.name, v.variant_name),
                    price: v.price,
                    stock: v.stock,
                    stock_min: v.stock_min,
                });
            }
        }
        out
    }
}
