use std::sync::Arc;

use thiserror::Error;

use crate::api::StorefrontApi;
use crate::dto::products::ProductForm;
use crate::error::ApiError;
use crate::models::{OrderStatus, OrderSummary, Product};

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Invalid stock value")]
    InvalidStock,

    #[error("Stock cannot be negative")]
    NegativeStock,

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardMetrics {
    pub products: usize,
    pub orders: usize,
    pub pending: usize,
    pub delivered: usize,
    pub revenue: f64,
}

/// Product and order management, independent of the customer-facing
/// stores. Mutations reload the affected list so the console always shows
/// backend truth.
pub struct AdminConsole {
    api: Arc<dyn StorefrontApi>,
    products: Vec<Product>,
    orders: Vec<OrderSummary>,
}

impl AdminConsole {
    pub fn new(api: Arc<dyn StorefrontApi>) -> Self {
        Self {
            api,
            products: Vec::new(),
            orders: Vec::new(),
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn orders(&self) -> &[OrderSummary] {
        &self.orders
    }

    pub async fn load_products(&mut self) -> Result<(), AdminError> {
        self.products = self.api.fetch_products().await?;
        Ok(())
    }

    pub async fn load_orders(&mut self) -> Result<(), AdminError> {
        self.orders = self.api.fetch_all_orders().await?;
        Ok(())
    }

    pub async fn create_product(&mut self, form: ProductForm) -> Result<(), AdminError> {
        self.api.create_product(form).await?;
        self.load_products().await
    }

    pub async fn update_product(&mut self, id: i64, form: ProductForm) -> Result<(), AdminError> {
        self.api.update_product(id, form).await?;
        self.load_products().await
    }

    pub async fn delete_product(&mut self, id: i64) -> Result<(), AdminError> {
        self.api.delete_product(id).await?;
        self.load_products().await
    }

    /// Inline stock edit, saved on blur: the raw field value must parse as
    /// a non-negative integer before anything is sent.
    pub async fn set_stock(&mut self, id: i64, raw_stock: &str) -> Result<(), AdminError> {
        let stock = parse_stock(raw_stock)?;
        self.api.update_stock(id, stock).await?;
        self.load_products().await
    }

    /// Any status can be set from any status; the fixed set is the only
    /// constraint the console enforces.
    pub async fn set_status(&mut self, id: i64, status: OrderStatus) -> Result<(), AdminError> {
        self.api.update_order_status(id, status).await?;
        self.load_orders().await
    }

    pub fn filter_products(&self, query: &str) -> Vec<&Product> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.products.iter().collect();
        }
        self.products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&query))
            .collect()
    }

    pub fn filter_orders(&self, status: Option<OrderStatus>) -> Vec<&OrderSummary> {
        match status {
            None => self.orders.iter().collect(),
            Some(status) => self.orders.iter().filter(|o| o.status == status).collect(),
        }
    }

    /// Recomputed from the loaded lists on every call.
    pub fn metrics(&self) -> DashboardMetrics {
        DashboardMetrics {
            products: self.products.len(),
            orders: self.orders.len(),
            pending: self
                .orders
                .iter()
                .filter(|o| o.status == OrderStatus::Pending)
                .count(),
            delivered: self
                .orders
                .iter()
                .filter(|o| o.status == OrderStatus::Delivered)
                .count(),
            revenue: self.orders.iter().map(|o| o.total).sum(),
        }
    }
}

fn parse_stock(raw: &str) -> Result<i64, AdminError> {
    let value: i64 = raw.trim().parse().map_err(|_| AdminError::InvalidStock)?;
    if value < 0 {
        return Err(AdminError::NegativeStock);
    }
    Ok(value)
}
