pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;
pub mod wishlist;

use serde::Deserialize;

/// Generic acknowledgement body; extra fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}
