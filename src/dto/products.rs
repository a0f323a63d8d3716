use serde::Serialize;

/// Product create/update payload, sent as a multipart form because of the
/// optional image.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductForm {
    pub name: String,
    pub price: f64,
    pub original_price: Option<f64>,
    pub unit: String,
    pub stock: i64,
    pub category: Option<String>,
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateStockRequest {
    pub stock: i64,
}
