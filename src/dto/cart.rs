use serde::{Deserialize, Serialize};

use crate::models::CartLine;

/// Authoritative cart state as returned by `GET /cart`.
#[derive(Debug, Clone, Deserialize)]
pub struct CartSnapshot {
    pub items: Vec<CartLine>,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddToCartRequest {
    pub product_id: i64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateQuantityRequest {
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplyOfferRequest {
    pub code: String,
    pub cart_total: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OfferResponse {
    pub discount: f64,
    pub final_amount: f64,
}
