use std::sync::Arc;

use crate::api::StorefrontApi;
use crate::cart::{CartError, CartState};
use crate::error::ApiError;
use crate::events::{AppEvent, EventBus, WishlistChange};
use crate::models::WishlistEntry;

/// Saved-products set. Independent of the cart: moving an entry to the cart
/// leaves it on the wishlist until removed explicitly.
pub struct WishlistStore {
    api: Arc<dyn StorefrontApi>,
    bus: EventBus,
    entries: Vec<WishlistEntry>,
}

impl WishlistStore {
    pub fn new(api: Arc<dyn StorefrontApi>, bus: EventBus) -> Self {
        Self {
            api,
            bus,
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[WishlistEntry] {
        &self.entries
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub async fn load(&mut self) -> Result<(), ApiError> {
        self.entries = self.api.fetch_wishlist().await?;
        Ok(())
    }

    pub async fn add(&mut self, product_id: i64) -> Result<(), ApiError> {
        self.api.add_to_wishlist(product_id).await?;
        self.load().await?;
        self.bus
            .publish(AppEvent::WishlistChanged(WishlistChange::ItemAdded));
        Ok(())
    }

    /// Optimistic removal: the entry disappears locally first and stays
    /// gone even if the backend rejects; the error is only surfaced.
    pub async fn remove(&mut self, wishlist_id: i64) -> Result<(), ApiError> {
        self.entries.retain(|e| e.wishlist_id != wishlist_id);
        self.api.remove_from_wishlist(wishlist_id).await?;
        self.bus
            .publish(AppEvent::WishlistChanged(WishlistChange::ItemRemoved));
        Ok(())
    }

    /// Adds one unit of the product to the cart. Does not remove the
    /// wishlist entry; that is a separate, explicit action.
    pub async fn move_to_cart(
        &self,
        product_id: i64,
        cart: &mut CartState,
    ) -> Result<(), CartError> {
        cart.add_product(product_id, 1).await
    }
}

/// Wishlist responses come in several shapes: a bare list, or a list
/// wrapped under one of a few field names. Normalize to a flat list and
/// skip entries that do not parse.
pub fn normalize_wishlist_payload(payload: serde_json::Value) -> Vec<WishlistEntry> {
    let items = match payload {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => ["items", "wishlist", "wishlist_items", "data"]
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(serde_json::Value::Array(items)) => Some(items),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    };
    items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}
