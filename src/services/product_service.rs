use std::sync::Arc;

use tracing::info;

use super::ServiceError;
use crate::database::models::{NewProduct, Product, ProductChanges};
use crate::database::{DatabaseError, ProductRepository};
use crate::filter::{Page, ProductQuery};

pub struct ProductService {
    products: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    pub async fn list(&self, query: &ProductQuery) -> Result<Page<Product>, ServiceError> {
        let (items, total) = self.products.list(query).await?;
        Ok(Page::new(items, total, query.pagination))
    }

    pub async fn get(&self, id: i64) -> Result<Product, ServiceError> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Product {} not found", id)).into())
    }

    pub async fn create(&self, product: NewProduct) -> Result<Product, ServiceError> {
        let product = self.products.create(product).await?;
        info!("Created product {}", product.id);
        Ok(product)
    }

    pub async fn update(&self, id: i64, changes: ProductChanges) -> Result<Product, ServiceError> {
        Ok(self.products.update(id, changes).await?)
    }

    pub async fn delete(&self, id: i64) -> Result<Product, ServiceError> {
        let product = self.products.delete(id).await?;
        info!("Deleted product {}", product.id);
        Ok(product)
    }
}
