use std::sync::Arc;

use thiserror::Error;

use crate::api::StorefrontApi;
use crate::error::ApiError;
use crate::models::{OrderDetail, OrderStatus, OrderSummary};

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("unknown order {0}")]
    UnknownOrder(i64),

    #[error("Only Pending orders can be cancelled")]
    NotCancellable(OrderStatus),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The customer's order history: a read projection plus the one
/// client-initiated transition, cancelling a pending order.
pub struct OrdersView {
    api: Arc<dyn StorefrontApi>,
    orders: Vec<OrderSummary>,
}

impl OrdersView {
    pub fn new(api: Arc<dyn StorefrontApi>) -> Self {
        Self {
            api,
            orders: Vec::new(),
        }
    }

    pub fn orders(&self) -> &[OrderSummary] {
        &self.orders
    }

    pub async fn load(&mut self) -> Result<(), ApiError> {
        self.orders = self.api.fetch_orders().await?;
        Ok(())
    }

    pub fn can_cancel(order: &OrderSummary) -> bool {
        order.status == OrderStatus::Pending
    }

    /// Cancel a pending order. Success updates that order in place instead
    /// of refetching the whole list; failure surfaces the message and falls
    /// back to a reload.
    pub async fn cancel(&mut self, order_id: i64) -> Result<(), OrderError> {
        let order = self
            .orders
            .iter()
            .find(|o| o.id == order_id)
            .ok_or(OrderError::UnknownOrder(order_id))?;
        if !Self::can_cancel(order) {
            return Err(OrderError::NotCancellable(order.status));
        }

        match self.api.cancel_order(order_id).await {
            Ok(_) => {
                if let Some(order) = self.orders.iter_mut().find(|o| o.id == order_id) {
                    order.status = OrderStatus::Cancelled;
                }
                Ok(())
            }
            Err(err) => {
                if self.load().await.is_err() {
                    tracing::warn!("order reload after failed cancel also failed");
                }
                Err(err.into())
            }
        }
    }

    pub async fn detail(&self, order_id: i64) -> Result<OrderDetail, ApiError> {
        self.api.order_detail(order_id).await
    }

    /// The order's invoice as PDF bytes.
    pub async fn invoice(&self, order_id: i64) -> Result<Vec<u8>, ApiError> {
        self.api.download_invoice(order_id).await
    }
}
