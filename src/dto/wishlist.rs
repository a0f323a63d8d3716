use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct WishlistAddResponse {
    #[serde(default)]
    pub message: String,
    pub wishlist_id: i64,
    pub product_id: i64,
}
