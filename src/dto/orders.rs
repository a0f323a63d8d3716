use serde::{Deserialize, Serialize};

use crate::checkout::PaymentMethod;
use crate::models::OrderStatus;

/// Billing details plus the totals the user saw at submission time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceOrderRequest {
    pub billing_name: String,
    pub billing_phone: String,
    pub billing_address: String,
    pub billing_city: String,
    pub billing_pincode: String,
    pub payment_method: PaymentMethod,
    pub total_amount: f64,
    pub discount_applied: f64,
    pub coupon_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrderResponse {
    #[serde(default)]
    pub message: String,
    pub order_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}
