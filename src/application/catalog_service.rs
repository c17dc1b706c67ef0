use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::ids::ObjectId;
use crate::domain::ports::CatalogStore;
use crate::domain::product::{NewProduct, Product};

pub struct CatalogService {
    catalog: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }

    pub fn list(&self) -> Result<Vec<Product>, DomainError> {
        self.catalog.list()
    }

    pub fn get(&self, id: &str) -> Result<Product, DomainError> {
        let id = ObjectId::parse_for("Product", id)?;
        self.catalog
            .find_by_id(&id)?
            .ok_or(DomainError::ProductNotFound)
    }

    /// Names are unique; the pre-check gives a clean error in the common case
    /// and the store's unique constraint covers the race.
    pub fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        if self.catalog.find_by_name(&product.name)?.is_some() {
            return Err(DomainError::DuplicateProductName(product.name));
        }

        let created = self.catalog.create(product)?;
        log::info!("created product {} ({})", created.id, created.name);
        Ok(created)
    }
}
