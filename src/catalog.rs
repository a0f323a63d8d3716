use std::sync::Arc;

use crate::api::StorefrontApi;
use crate::error::ApiError;
use crate::models::Product;

const DEFAULT_CATEGORY: &str = "Dairy";

/// Product list with client-side search and category filtering.
pub struct Catalog {
    api: Arc<dyn StorefrontApi>,
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(api: Arc<dyn StorefrontApi>) -> Self {
        Self {
            api,
            products: Vec::new(),
        }
    }

    pub async fn load(&mut self) -> Result<(), ApiError> {
        self.products = self.api.fetch_products().await?;
        Ok(())
    }

    pub fn all(&self) -> &[Product] {
        &self.products
    }

    /// Case-insensitive substring match on the name plus an exact category
    /// match; products without a category count as the default one. Empty
    /// filters match everything.
    pub fn filter(&self, search: &str, category: &str) -> Vec<&Product> {
        let search = search.trim().to_lowercase();
        let category = category.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| {
                let name_matches = search.is_empty() || p.name.to_lowercase().contains(&search);
                let product_category = p
                    .category
                    .as_deref()
                    .unwrap_or(DEFAULT_CATEGORY)
                    .to_lowercase();
                let category_matches = category.is_empty() || product_category == category;
                name_matches && category_matches
            })
            .collect()
    }
}
