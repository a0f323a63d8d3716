use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use crate::api::StorefrontApi;
use crate::checkout::{BillingErrors, BillingProfile};
use crate::dto::cart::{AddToCartRequest, ApplyOfferRequest};
use crate::dto::orders::PlaceOrderRequest;
use crate::error::ApiError;
use crate::events::{AppEvent, CartChange, EventBus};
use crate::models::CartLine;

#[derive(Debug, Error)]
pub enum CartError {
    #[error("unknown cart line {0}")]
    UnknownLine(i64),

    #[error("cart line {0} has an update in flight")]
    LineBusy(i64),

    #[error("Only {available} items available in stock")]
    InsufficientStock { available: i64 },

    #[error("Your cart is empty")]
    EmptyCart,

    #[error("billing details are invalid")]
    InvalidBilling(BillingErrors),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Coupon result attached on top of the cart. Derived and disposable: any
/// line change throws it away, it is never recomputed locally.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponOverlay {
    pub code: String,
    pub discount: f64,
    pub final_total: f64,
}

/// An optimistic local edit awaiting backend confirmation. Confirmed
/// patches are dropped; rejected patches are rolled back individually.
#[derive(Debug, Clone)]
struct PendingPatch {
    request_id: u64,
    line_id: i64,
    prev_quantity: u32,
    prev_subtotal: f64,
}

/// Client-side cart: reconciles optimistic edits with backend-confirmed
/// state and maintains the discount overlay.
pub struct CartState {
    api: Arc<dyn StorefrontApi>,
    bus: EventBus,
    lines: Vec<CartLine>,
    subtotal: f64,
    coupon: Option<CouponOverlay>,
    busy: HashSet<i64>,
    pending: Vec<PendingPatch>,
    next_request_id: u64,
}

impl CartState {
    pub fn new(api: Arc<dyn StorefrontApi>, bus: EventBus) -> Self {
        Self {
            api,
            bus,
            lines: Vec::new(),
            subtotal: 0.0,
            coupon: None,
            busy: HashSet::new(),
            pending: Vec::new(),
            next_request_id: 0,
        }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn subtotal(&self) -> f64 {
        self.subtotal
    }

    pub fn coupon(&self) -> Option<&CouponOverlay> {
        self.coupon.as_ref()
    }

    pub fn discount(&self) -> f64 {
        self.coupon.as_ref().map_or(0.0, |c| c.discount)
    }

    /// What the user owes right now: the coupon's final total while a
    /// discount is active, the plain subtotal otherwise. Never negative.
    pub fn payable_total(&self) -> f64 {
        match &self.coupon {
            Some(overlay) if overlay.discount > 0.0 => overlay.final_total.max(0.0),
            _ => self.subtotal,
        }
    }

    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn is_line_busy(&self, line_id: i64) -> bool {
        self.busy.contains(&line_id)
    }

    /// Replace local state with the backend's. Any staged optimism is moot
    /// once authoritative state arrives.
    pub async fn load(&mut self) -> Result<(), CartError> {
        let snapshot = self.api.fetch_cart().await?;
        self.lines = snapshot.items;
        self.subtotal = snapshot.total;
        self.busy.clear();
        self.pending.clear();
        Ok(())
    }

    /// Optimistically set a line's quantity, then confirm with the backend.
    /// Quantities below 1 are never sent; a rejection rolls back only this
    /// edit and surfaces the backend's message.
    pub async fn set_quantity(&mut self, line_id: i64, quantity: u32) -> Result<(), CartError> {
        let Some(request_id) = self.stage_quantity(line_id, quantity)? else {
            return Ok(());
        };
        match self.api.update_cart_item(line_id, quantity).await {
            Ok(_) => {
                self.confirm(request_id);
                self.bus
                    .publish(AppEvent::CartChanged(CartChange::QuantityUpdated));
                Ok(())
            }
            Err(err) => {
                self.roll_back(request_id);
                Err(err.into())
            }
        }
    }

    pub async fn remove_line(&mut self, line_id: i64) -> Result<(), CartError> {
        if !self.lines.iter().any(|l| l.id == line_id) {
            return Err(CartError::UnknownLine(line_id));
        }
        if self.is_line_busy(line_id) {
            return Err(CartError::LineBusy(line_id));
        }
        self.api.remove_cart_item(line_id).await?;
        self.coupon = None;
        self.load().await?;
        self.bus
            .publish(AppEvent::CartChanged(CartChange::LineRemoved));
        Ok(())
    }

    pub async fn add_product(&mut self, product_id: i64, quantity: u32) -> Result<(), CartError> {
        self.api
            .add_to_cart(AddToCartRequest {
                product_id,
                quantity,
            })
            .await?;
        self.coupon = None;
        self.load().await?;
        self.bus.publish(AppEvent::CartChanged(CartChange::ItemAdded));
        Ok(())
    }

    pub async fn clear(&mut self) -> Result<(), CartError> {
        self.api.clear_cart().await?;
        self.coupon = None;
        self.load().await?;
        self.bus.publish(AppEvent::CartChanged(CartChange::Cleared));
        Ok(())
    }

    /// Validate a code against the current subtotal. Success installs the
    /// overlay; failure clears any overlay and leaves the cart untouched.
    pub async fn apply_coupon(&mut self, code: &str) -> Result<&CouponOverlay, CartError> {
        let code = code.trim().to_string();
        match self
            .api
            .apply_offer(ApplyOfferRequest {
                code: code.clone(),
                cart_total: self.subtotal,
            })
            .await
        {
            Ok(offer) => Ok(&*self.coupon.insert(CouponOverlay {
                code,
                discount: offer.discount,
                final_total: offer.final_amount,
            })),
            Err(err) => {
                self.coupon = None;
                Err(err.into())
            }
        }
    }

    /// Submit the order. Preconditions: valid billing, non-empty cart. On
    /// success the coupon resets and the cart is reloaded (normally empty);
    /// on failure nothing changes locally.
    pub async fn place_order(&mut self, billing: &BillingProfile) -> Result<i64, CartError> {
        if let Err(errors) = billing.validate() {
            return Err(CartError::InvalidBilling(errors));
        }
        if self.lines.is_empty() {
            return Err(CartError::EmptyCart);
        }

        let coupon_code = self
            .coupon
            .as_ref()
            .filter(|c| c.discount > 0.0)
            .map(|c| c.code.clone());
        let payload = PlaceOrderRequest {
            billing_name: billing.name.trim().to_string(),
            billing_phone: billing.phone.trim().to_string(),
            billing_address: billing.address.trim().to_string(),
            billing_city: billing.city.trim().to_string(),
            billing_pincode: billing.pincode.trim().to_string(),
            payment_method: billing.payment_method,
            total_amount: self.payable_total(),
            discount_applied: self.discount(),
            coupon_code,
        };

        let placed = self.api.place_order(payload).await?;
        self.coupon = None;
        if let Err(err) = self.load().await {
            tracing::warn!(error = %err, "cart reload after order failed");
        }
        self.bus
            .publish(AppEvent::CartChanged(CartChange::OrderPlaced));
        self.bus.publish(AppEvent::OrderPlaced {
            order_id: placed.order_id,
        });
        Ok(placed.order_id)
    }

    /// Stage an optimistic quantity edit. Returns `None` for the sub-1
    /// no-op case. Clears the coupon overlay the moment the line changes.
    fn stage_quantity(&mut self, line_id: i64, quantity: u32) -> Result<Option<u64>, CartError> {
        if quantity < 1 {
            return Ok(None);
        }
        if self.is_line_busy(line_id) {
            return Err(CartError::LineBusy(line_id));
        }
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.id == line_id)
            .ok_or(CartError::UnknownLine(line_id))?;
        if let Some(stock) = line.stock {
            if i64::from(quantity) > stock {
                return Err(CartError::InsufficientStock { available: stock });
            }
        }

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.pending.push(PendingPatch {
            request_id,
            line_id,
            prev_quantity: line.quantity,
            prev_subtotal: line.subtotal,
        });

        line.quantity = quantity;
        line.subtotal = line.price * f64::from(quantity);
        self.subtotal = self.lines.iter().map(|l| l.subtotal).sum();
        self.coupon = None;
        self.busy.insert(line_id);
        Ok(Some(request_id))
    }

    fn confirm(&mut self, request_id: u64) {
        if let Some(pos) = self.pending.iter().position(|p| p.request_id == request_id) {
            let patch = self.pending.remove(pos);
            self.busy.remove(&patch.line_id);
        }
    }

    /// Undo exactly one staged edit; other lines' state is untouched. The
    /// discarded coupon stays discarded: the user re-applies it.
    fn roll_back(&mut self, request_id: u64) {
        let Some(pos) = self.pending.iter().position(|p| p.request_id == request_id) else {
            return;
        };
        let patch = self.pending.remove(pos);
        self.busy.remove(&patch.line_id);
        if let Some(line) = self.lines.iter_mut().find(|l| l.id == patch.line_id) {
            line.quantity = patch.prev_quantity;
            line.subtotal = patch.prev_subtotal;
        }
        self.subtotal = self.lines.iter().map(|l| l.subtotal).sum();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockStorefrontApi;
    use crate::models::CartLine;

    fn line(id: i64, price: f64, quantity: u32) -> CartLine {
        CartLine {
            id,
            product_id: id * 10,
            name: format!("product-{id}"),
            price,
            quantity,
            subtotal: price * f64::from(quantity),
            stock: Some(50),
            image: None,
        }
    }

    fn cart_with_lines(lines: Vec<CartLine>) -> CartState {
        let mut cart = CartState::new(Arc::new(MockStorefrontApi::new()), EventBus::new());
        cart.subtotal = lines.iter().map(|l| l.subtotal).sum();
        cart.lines = lines;
        cart
    }

    #[test]
    fn quantity_below_one_stages_nothing() {
        let mut cart = cart_with_lines(vec![line(1, 60.0, 2)]);
        let staged = cart.stage_quantity(1, 0).unwrap();
        assert!(staged.is_none());
        assert_eq!(cart.lines[0].quantity, 2);
        assert_eq!(cart.subtotal(), 120.0);
        assert!(cart.pending.is_empty());
    }

    #[test]
    fn staging_clears_the_coupon_and_marks_the_line_busy() {
        let mut cart = cart_with_lines(vec![line(1, 100.0, 5)]);
        cart.coupon = Some(CouponOverlay {
            code: "SAVE10".into(),
            discount: 50.0,
            final_total: 450.0,
        });

        let staged = cart.stage_quantity(1, 6).unwrap();
        assert!(staged.is_some());
        assert!(cart.coupon().is_none());
        assert!(cart.is_line_busy(1));
        assert_eq!(cart.subtotal(), 600.0);
        assert_eq!(cart.payable_total(), 600.0);
    }

    #[test]
    fn a_busy_line_rejects_further_edits() {
        let mut cart = cart_with_lines(vec![line(1, 60.0, 2)]);
        cart.stage_quantity(1, 3).unwrap();
        assert!(matches!(
            cart.stage_quantity(1, 4),
            Err(CartError::LineBusy(1))
        ));
    }

    #[test]
    fn staging_respects_known_stock() {
        let mut cart = cart_with_lines(vec![line(1, 60.0, 2)]);
        assert!(matches!(
            cart.stage_quantity(1, 51),
            Err(CartError::InsufficientStock { available: 50 })
        ));
        assert_eq!(cart.lines[0].quantity, 2, "state must be untouched");
    }

    #[test]
    fn rollback_restores_only_the_rejected_patch() {
        let mut cart = cart_with_lines(vec![line(1, 60.0, 2), line(2, 80.0, 1)]);
        let first = cart.stage_quantity(1, 4).unwrap().unwrap();
        let second = cart.stage_quantity(2, 3).unwrap().unwrap();
        assert_eq!(cart.subtotal(), 60.0 * 4.0 + 80.0 * 3.0);

        cart.confirm(second);
        cart.roll_back(first);

        assert_eq!(cart.lines[0].quantity, 2);
        assert_eq!(cart.lines[1].quantity, 3);
        assert_eq!(cart.subtotal(), 60.0 * 2.0 + 80.0 * 3.0);
        assert!(!cart.is_line_busy(1));
        assert!(!cart.is_line_busy(2));
    }

    #[test]
    fn payable_total_is_never_negative() {
        let mut cart = cart_with_lines(vec![line(1, 10.0, 1)]);
        cart.coupon = Some(CouponOverlay {
            code: "GLITCH".into(),
            discount: 100.0,
            final_total: -90.0,
        });
        assert_eq!(cart.payable_total(), 0.0);
    }
}
