use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::api::StorefrontApi;
use crate::config::ClientConfig;
use crate::dto::auth::{LoginRequest, LoginResponse, RegisterRequest};
use crate::dto::cart::{
    AddToCartRequest, ApplyOfferRequest, CartSnapshot, OfferResponse, UpdateQuantityRequest,
};
use crate::dto::orders::{PlaceOrderRequest, PlaceOrderResponse, UpdateOrderStatusRequest};
use crate::dto::products::{ProductForm, UpdateStockRequest};
use crate::dto::wishlist::WishlistAddResponse;
use crate::dto::MessageResponse;
use crate::error::{ApiError, ApiResult};
use crate::models::{OrderDetail, OrderStatus, OrderSummary, Product, WishlistEntry};
use crate::session::SessionStore;
use crate::wishlist::normalize_wishlist_payload;

/// `reqwest`-backed [`StorefrontApi`]. Attaches the bearer token from the
/// session store to every request and invalidates the session on any 401.
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl RestClient {
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let request = match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.session.invalidate();
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message: rejection_message(response).await,
            });
        }
        Ok(response)
    }

    async fn json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }
}

/// Prefer the backend's own `error`/`message` field, verbatim.
async fn rejection_message(response: Response) -> String {
    let status = response.status();
    let fallback = format!("request failed with status {status}");
    match response.json::<serde_json::Value>().await {
        Ok(body) => body
            .get("error")
            .or_else(|| body.get("message"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned)
            .unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn product_form_parts(form: ProductForm) -> multipart::Form {
    let mut parts = multipart::Form::new()
        .text("name", form.name)
        .text("price", form.price.to_string())
        .text("unit", form.unit)
        .text("stock", form.stock.to_string());
    if let Some(original_price) = form.original_price {
        parts = parts.text("original_price", original_price.to_string());
    }
    if let Some(category) = form.category {
        parts = parts.text("category", category);
    }
    if let Some(image) = form.image {
        parts = parts.part(
            "image",
            multipart::Part::bytes(image.bytes).file_name(image.file_name),
        );
    }
    parts
}

#[async_trait]
impl StorefrontApi for RestClient {
    async fn login(&self, payload: LoginRequest) -> ApiResult<LoginResponse> {
        self.json(self.http.post(self.url("/login")).json(&payload))
            .await
    }

    async fn register(&self, payload: RegisterRequest) -> ApiResult<MessageResponse> {
        self.json(self.http.post(self.url("/register")).json(&payload))
            .await
    }

    async fn fetch_products(&self) -> ApiResult<Vec<Product>> {
        self.json(self.http.get(self.url("/products"))).await
    }

    async fn create_product(&self, form: ProductForm) -> ApiResult<MessageResponse> {
        let request = self
            .http
            .post(self.url("/products"))
            .multipart(product_form_parts(form));
        self.json(request).await
    }

    async fn update_product(&self, id: i64, form: ProductForm) -> ApiResult<MessageResponse> {
        let request = self
            .http
            .put(self.url(&format!("/products/{id}")))
            .multipart(product_form_parts(form));
        self.json(request).await
    }

    async fn update_stock(&self, id: i64, stock: i64) -> ApiResult<MessageResponse> {
        let request = self
            .http
            .put(self.url(&format!("/products/{id}/stock")))
            .json(&UpdateStockRequest { stock });
        self.json(request).await
    }

    async fn delete_product(&self, id: i64) -> ApiResult<MessageResponse> {
        self.json(self.http.delete(self.url(&format!("/products/{id}"))))
            .await
    }

    async fn fetch_cart(&self) -> ApiResult<CartSnapshot> {
        self.json(self.http.get(self.url("/cart"))).await
    }

    async fn add_to_cart(&self, payload: AddToCartRequest) -> ApiResult<MessageResponse> {
        self.json(self.http.post(self.url("/cart/add")).json(&payload))
            .await
    }

    async fn update_cart_item(&self, line_id: i64, quantity: u32) -> ApiResult<MessageResponse> {
        let request = self
            .http
            .put(self.url(&format!("/cart/item/{line_id}")))
            .json(&UpdateQuantityRequest { quantity });
        self.json(request).await
    }

    async fn remove_cart_item(&self, line_id: i64) -> ApiResult<MessageResponse> {
        self.json(self.http.delete(self.url(&format!("/cart/remove/{line_id}"))))
            .await
    }

    async fn clear_cart(&self) -> ApiResult<MessageResponse> {
        self.json(self.http.delete(self.url("/cart/clear"))).await
    }

    async fn apply_offer(&self, payload: ApplyOfferRequest) -> ApiResult<OfferResponse> {
        self.json(self.http.post(self.url("/apply-offer")).json(&payload))
            .await
    }

    async fn place_order(&self, payload: PlaceOrderRequest) -> ApiResult<PlaceOrderResponse> {
        self.json(self.http.post(self.url("/orders/place")).json(&payload))
            .await
    }

    async fn fetch_orders(&self) -> ApiResult<Vec<OrderSummary>> {
        self.json(self.http.get(self.url("/orders"))).await
    }

    async fn fetch_all_orders(&self) -> ApiResult<Vec<OrderSummary>> {
        self.json(self.http.get(self.url("/orders/all"))).await
    }

    async fn update_order_status(
        &self,
        id: i64,
        status: OrderStatus,
    ) -> ApiResult<MessageResponse> {
        let request = self
            .http
            .put(self.url(&format!("/orders/{id}/status")))
            .json(&UpdateOrderStatusRequest { status });
        self.json(request).await
    }

    async fn cancel_order(&self, id: i64) -> ApiResult<MessageResponse> {
        self.json(self.http.delete(self.url(&format!("/orders/{id}/cancel"))))
            .await
    }

    async fn order_detail(&self, id: i64) -> ApiResult<OrderDetail> {
        self.json(self.http.get(self.url(&format!("/orders/{id}"))))
            .await
    }

    async fn download_invoice(&self, id: i64) -> ApiResult<Vec<u8>> {
        let response = self
            .send(self.http.get(self.url(&format!("/orders/{id}/invoice"))))
            .await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn fetch_wishlist(&self) -> ApiResult<Vec<WishlistEntry>> {
        let payload: serde_json::Value = self.json(self.http.get(self.url("/wishlist/"))).await?;
        Ok(normalize_wishlist_payload(payload))
    }

    async fn add_to_wishlist(&self, product_id: i64) -> ApiResult<WishlistAddResponse> {
        self.json(self.http.post(self.url(&format!("/wishlist/{product_id}"))))
            .await
    }

    async fn remove_from_wishlist(&self, wishlist_id: i64) -> ApiResult<MessageResponse> {
        self.json(self.http.delete(self.url(&format!("/wishlist/{wishlist_id}"))))
            .await
    }
}
