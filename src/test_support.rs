//! In-memory doubles for tests: a scriptable backend and a recording
//! presenter. Single-threaded by design, matching the runtime's cooperative
//! model, so plain `RefCell` interior mutability is enough.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use chrono::Utc;
use serde_json::Value;

use crate::backend::Backend;
use crate::error::PosError;
use crate::present::{Notice, Presenter, View};
use crate::types::{
    CashClose, CashOpen, CashSession, DashboardToday, LowStockItem, NewProduct, NewVariant,
    PaymentMethod, Product, Sale, SaleDraft, SaleItem, StoreSettings, Variant, VariantPatch,
};

// ---------------------------------------------------------------------------
// Fake backend
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeState {
    pub products: Vec<Product>,
    pub session: Option<CashSession>,
    pub settings: StoreSettings,
    pub low_stock: Vec<LowStockItem>,
    pub sales: Vec<Sale>,
    pub failing: HashSet<&'static str>,
    pub calls: Vec<&'static str>,
    pub sale_drafts: Vec<Value>,
    pub patches: Vec<(i64, Value)>,
    next_sale_id: i64,
    next_entity_id: i64,
}

#[derive(Default)]
pub struct FakeBackend {
    inner: RefCell<FakeState>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        let backend = Self::new();
        backend.inner.borrow_mut().products = products;
        backend
    }

    pub fn set_settings(&self, settings: StoreSettings) {
        self.inner.borrow_mut().settings = settings;
    }

    pub fn set_low_stock(&self, items: Vec<LowStockItem>) {
        self.inner.borrow_mut().low_stock = items;
    }

    pub fn set_open_session(&self) {
        self.inner.borrow_mut().session = Some(CashSession {
            id: 1,
            opened_at: Utc::now(),
            opened_by: Some("test".to_string()),
            opening_amount: 100.0,
            closed_at: None,
            closed_by: None,
            closing_amount: None,
            expected_amount: None,
            difference_amount: None,
        });
    }

    pub fn clear_session(&self) {
        self.inner.borrow_mut().session = None;
    }

    /// Force the named endpoint to fail with an HTTP 500 until cleared.
    pub fn fail(&self, endpoint: &'static str) {
        self.inner.borrow_mut().failing.insert(endpoint);
    }

    pub fn recover(&self, endpoint: &'static str) {
        self.inner.borrow_mut().failing.remove(endpoint);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.inner.borrow().calls.clone()
    }

    pub fn calls_named(&self, endpoint: &str) -> usize {
        self.inner
            .borrow()
            .calls
            .iter()
            .filter(|c| **c == endpoint)
            .count()
    }

    pub fn sale_drafts(&self) -> Vec<Value> {
        self.inner.borrow().sale_drafts.clone()
    }

    pub fn patches(&self) -> Vec<(i64, Value)> {
        self.inner.borrow().patches.clone()
    }

    pub fn products_snapshot(&self) -> Vec<Product> {
        self.inner.borrow().products.clone()
    }

    fn guard(&self, endpoint: &'static str) -> Result<(), PosError> {
        let mut state = self.inner.borrow_mut();
        state.calls.push(endpoint);
        if state.failing.contains(endpoint) {
            Err(PosError::Api {
                status: 500,
                detail: format!("{endpoint} failed"),
            })
        } else {
            Ok(())
        }
    }
}

impl Backend for FakeBackend {
    async fn get_settings(&self) -> Result<StoreSettings, PosError> {
        self.guard("get_settings")?;
        Ok(self.inner.borrow().settings.clone())
    }

    async fn current_cash_session(&self) -> Result<CashSession, PosError> {
        self.guard("current_cash_session")?;
        self.inner.borrow().session.clone().ok_or(PosError::Api {
            status: 404,
            detail: "No open cash session".to_string(),
        })
    }

    async fn open_cash(&self, req: &CashOpen) -> Result<CashSession, PosError> {
        self.guard("open_cash")?;
        let session = CashSession {
            id: 1,
            opened_at: Utc::now(),
            opened_by: req.opened_by.clone(),
            opening_amount: req.opening_amount,
            closed_at: None,
            closed_by: None,
            closing_amount: None,
            expected_amount: None,
            difference_amount: None,
        };
        self.inner.borrow_mut().session = Some(session.clone());
        Ok(session)
    }

    async fn close_cash(&self, req: &CashClose) -> Result<CashSession, PosError> {
        self.guard("close_cash")?;
        let mut state = self.inner.borrow_mut();
        let mut session = state.session.take().ok_or(PosError::Api {
            status: 409,
            detail: "No open cash session".to_string(),
        })?;
        session.closed_at = Some(Utc::now());
        session.closed_by = req.closed_by.clone();
        session.closing_amount = Some(req.closing_amount);
        Ok(session)
    }

    async fn list_products(&self) -> Result<Vec<Product>, PosError> {
        self.guard("list_products")?;
        Ok(self.inner.borrow().products.clone())
    }

    async fn create_product(&self, req: &NewProduct) -> Result<Product, PosError> {
        self.guard("create_product")?;
        let mut state = self.inner.borrow_mut();
        state.next_entity_id += 1;
        let product = Product {
            id: 1000 + state.next_entity_id,
            name: req.name.clone(),
            category: req.category.clone(),
            active: req.active,
            variants: vec![],
        };
        state.products.push(product.clone());
        Ok(product)
    }

    async fn create_variant(
        &self,
        product_id: i64,
        req: &NewVariant,
    ) -> Result<Variant, PosError> {
        self.guard("create_variant")?;
        let mut state = self.inner.borrow_mut();
        state.next_entity_id += 1;
        let variant = Variant {
            id: 2000 + state.next_entity_id,
            product_id,
            variant_name: req.variant_name.clone(),
            sku: req.sku.clone(),
            price: req.price,
            stock: req.stock,
            stock_min: req.stock_min,
        };
        let product = state
            .products
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or(PosError::Api {
                status: 404,
                detail: format!("Product {product_id} not found"),
            })?;
        product.variants.push(variant.clone());
        Ok(variant)
    }

    async fn update_variant(
        &self,
        variant_id: i64,
        req: &VariantPatch,
    ) -> Result<Variant, PosError> {
        self.guard("update_variant")?;
        let mut state = self.inner.borrow_mut();
        let patch = serde_json::to_value(req).unwrap_or(Value::Null);
        state.patches.push((variant_id, patch));

        for product in &mut state.products {
            if let Some(v) = product.variants.iter_mut().find(|v| v.id == variant_id) {
                if let Some(name) = &req.variant_name {
                    v.variant_name = name.clone();
                }
                if let Some(sku) = &req.sku {
                    v.sku = Some(sku.clone());
                }
                if let Some(price) = req.price {
                    v.price = price;
                }
                if let Some(stock) = req.stock {
                    v.stock = stock;
                }
                if let Some(stock_min) = req.stock_min {
                    v.stock_min = Some(stock_min);
                }
                return Ok(v.clone());
            }
        }
        Err(PosError::Api {
            status: 404,
            detail: format!("Variant {variant_id} not found"),
        })
    }

    async fn dashboard_today(&self) -> Result<DashboardToday, PosError> {
        self.guard("dashboard_today")?;
        let state = self.inner.borrow();
        Ok(DashboardToday {
            day: Utc::now().date_naive().to_string(),
            total_sales: state.sales.len() as i64,
            gross_total: state.sales.iter().map(|s| s.total).sum(),
            breakdown: vec![],
            top_items: vec![],
        })
    }

    async fn low_stock(&self) -> Result<Vec<LowStockItem>, PosError> {
        self.guard("low_stock")?;
        Ok(self.inner.borrow().low_stock.clone())
    }

    async fn sales_for_day(
        &self,
        _day: &str,
        payment_method: Option<PaymentMethod>,
    ) -> Result<Vec<Sale>, PosError> {
        self.guard("sales_for_day")?;
        let state = self.inner.borrow();
        Ok(state
            .sales
            .iter()
            .filter(|s| {
                payment_method
                    .map(|pm| s.payment_method == pm.as_str())
                    .unwrap_or(true)
            })
            .cloned()
            .collect())
    }

    async fn get_sale(&self, sale_id: i64) -> Result<Sale, PosError> {
        self.guard("get_sale")?;
        self.inner
            .borrow()
            .sales
            .iter()
            .find(|s| s.id == sale_id)
            .cloned()
            .ok_or(PosError::Api {
                status: 404,
                detail: format!("Sale {sale_id} not found"),
            })
    }

    async fn create_sale(&self, draft: &SaleDraft) -> Result<Sale, PosError> {
        self.guard("create_sale")?;
        let mut state = self.inner.borrow_mut();
        state
            .sale_drafts
            .push(serde_json::to_value(draft).unwrap_or(Value::Null));

        let mut items = Vec::new();
        let mut subtotal = 0.0;
        for (idx, item) in draft.items.iter().enumerate() {
            let price = state
                .products
                .iter()
                .flat_map(|p| p.variants.iter())
                .find(|v| v.id == item.variant_id)
                .map(|v| v.price)
                .ok_or(PosError::Api {
                    status: 404,
                    detail: format!("Variant {} not found", item.variant_id),
                })?;
            let line_total = price * f64::from(item.quantity);
            subtotal += line_total;
            items.push(SaleItem {
                id: idx as i64 + 1,
                variant_id: item.variant_id,
                quantity: i64::from(item.quantity),
                unit_price_at_sale: price,
                line_total,
            });
        }

        // Mirror the backend: decrement stock so a follow-up catalog refresh
        // observes the sale.
        for item in &draft.items {
            for product in &mut state.products {
                if let Some(v) = product.variants.iter_mut().find(|v| v.id == item.variant_id) {
                    v.stock -= i64::from(item.quantity);
                }
            }
        }

        let discount_percent = (draft.payment_method == PaymentMethod::Cash
            && state.settings.cash_discount_enabled
            && state.settings.cash_discount_percent > 0.0)
            .then_some(state.settings.cash_discount_percent);
        let total = match discount_percent {
            Some(p) => subtotal * (1.0 - p / 100.0),
            None => subtotal,
        };

        state.next_sale_id += 1;
        let sale = Sale {
            id: state.next_sale_id,
            created_at: Utc::now(),
            payment_method: draft.payment_method.as_str().to_string(),
            discount_percent,
            subtotal,
            total,
            items,
        };
        state.sales.push(sale.clone());
        Ok(sale)
    }
}

// ---------------------------------------------------------------------------
// Recording presenter
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct PresenterLog {
    pub renders: Vec<(View, Value)>,
    pub notices: Vec<(Notice, String)>,
}

#[derive(Clone, Default)]
pub struct RecordingPresenter {
    log: Rc<RefCell<PresenterLog>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render_count(&self, view: View) -> usize {
        self.log
            .borrow()
            .renders
            .iter()
            .filter(|(v, _)| *v == view)
            .count()
    }

    pub fn last_render(&self, view: View) -> Option<Value> {
        self.log
            .borrow()
            .renders
            .iter()
            .rev()
            .find(|(v, _)| *v == view)
            .map(|(_, data)| data.clone())
    }

    pub fn error_notices(&self) -> Vec<String> {
        self.log
            .borrow()
            .notices
            .iter()
            .filter(|(kind, _)| *kind == Notice::Err)
            .map(|(_, msg)| msg.clone())
            .collect()
    }

    pub fn ok_notices(&self) -> Vec<String> {
        self.log
            .borrow()
            .notices
            .iter()
            .filter(|(kind, _)| *kind == Notice::Ok)
            .map(|(_, msg)| msg.clone())
            .collect()
    }
}

impl Presenter for RecordingPresenter {
    fn render(&self, view: View, data: &Value) {
        self.log.borrow_mut().renders.push((view, data.clone()));
    }

    fn notify(&self, kind: Notice, message: &str) {
        self.log
            .borrow_mut()
            .notices
            .push((kind, message.to_string()));
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn variant(id: i64, product_id: i64, name: &str, price: f64, stock: i64) -> Variant {
    Variant {
        id,
        product_id,
        variant_name: name.to_string(),
        sku: None,
        price,
        stock,
        stock_min: Some(1),
    }
}

/// Catalog with "Coffee" (variant 10 "250g", 5.00, stock 3) and "Tea"
/// (variant 20 "Box 25", 3.50, stock 10).
pub fn coffee_and_tea() -> Vec<Product> {
    vec![
        Product {
            id: 1,
            name: "Coffee".to_string(),
            category: Some("Beverages".to_string()),
            active: true,
            variants: vec![variant(10, 1, "250g", 5.0, 3)],
        },
        Product {
            id: 2,
            name: "Tea".to_string(),
            category: Some("Beverages".to_string()),
            active: true,
            variants: vec![variant(20, 2, "Box 25", 3.5, 10)],
        },
    ]
}
