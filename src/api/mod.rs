pub mod rest;

use async_trait::async_trait;
use mockall::automock;

use crate::dto::auth::{LoginRequest, LoginResponse, RegisterRequest};
use crate::dto::cart::{AddToCartRequest, ApplyOfferRequest, CartSnapshot, OfferResponse};
use crate::dto::orders::{PlaceOrderRequest, PlaceOrderResponse};
use crate::dto::products::ProductForm;
use crate::dto::wishlist::WishlistAddResponse;
use crate::dto::MessageResponse;
use crate::error::ApiResult;
use crate::models::{OrderDetail, OrderStatus, OrderSummary, Product, WishlistEntry};

pub use rest::RestClient;

/// Gateway to the storefront backend. Stores depend on this trait rather
/// than on a concrete HTTP client so they can be driven by a mock in tests.
#[automock]
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    // auth
    async fn login(&self, payload: LoginRequest) -> ApiResult<LoginResponse>;
    async fn register(&self, payload: RegisterRequest) -> ApiResult<MessageResponse>;

    // catalog / products
    async fn fetch_products(&self) -> ApiResult<Vec<Product>>;
    async fn create_product(&self, form: ProductForm) -> ApiResult<MessageResponse>;
    async fn update_product(&self, id: i64, form: ProductForm) -> ApiResult<MessageResponse>;
    async fn update_stock(&self, id: i64, stock: i64) -> ApiResult<MessageResponse>;
    async fn delete_product(&self, id: i64) -> ApiResult<MessageResponse>;

    // cart
    async fn fetch_cart(&self) -> ApiResult<CartSnapshot>;
    async fn add_to_cart(&self, payload: AddToCartRequest) -> ApiResult<MessageResponse>;
    async fn update_cart_item(&self, line_id: i64, quantity: u32) -> ApiResult<MessageResponse>;
    async fn remove_cart_item(&self, line_id: i64) -> ApiResult<MessageResponse>;
    async fn clear_cart(&self) -> ApiResult<MessageResponse>;
    async fn apply_offer(&self, payload: ApplyOfferRequest) -> ApiResult<OfferResponse>;

    // orders
    async fn place_order(&self, payload: PlaceOrderRequest) -> ApiResult<PlaceOrderResponse>;
    async fn fetch_orders(&self) -> ApiResult<Vec<OrderSummary>>;
    async fn fetch_all_orders(&self) -> ApiResult<Vec<OrderSummary>>;
    async fn update_order_status(&self, id: i64, status: OrderStatus)
        -> ApiResult<MessageResponse>;
    async fn cancel_order(&self, id: i64) -> ApiResult<MessageResponse>;
    async fn order_detail(&self, id: i64) -> ApiResult<OrderDetail>;
    async fn download_invoice(&self, id: i64) -> ApiResult<Vec<u8>>;

    // wishlist
    async fn fetch_wishlist(&self) -> ApiResult<Vec<WishlistEntry>>;
    async fn add_to_wishlist(&self, product_id: i64) -> ApiResult<WishlistAddResponse>;
    async fn remove_from_wishlist(&self, wishlist_id: i64) -> ApiResult<MessageResponse>;
}
