use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ids::ObjectId;
use crate::domain::ports::CatalogStore;
use crate::domain::product::{NewProduct, Product};
use crate::schema::products;

use super::is_unique_violation;
use super::models::{NewProductRow, ProductRow};

pub struct DieselCatalogStore {
    pool: DbPool,
}

impl DieselCatalogStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CatalogStore for DieselCatalogStore {
    fn find_by_id(&self, id: &ObjectId) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        products::table
            .filter(products::id.eq(id.as_str()))
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(Product::try_from)
            .transpose()
    }

    fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Product>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get()?;

        let keys: Vec<&str> = ids.iter().map(ObjectId::as_str).collect();
        products::table
            .filter(products::id.eq_any(keys))
            .select(ProductRow::as_select())
            .load(&mut conn)?
            .into_iter()
            .map(Product::try_from)
            .collect()
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        products::table
            .filter(products::name.eq(name))
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(Product::try_from)
            .transpose()
    }

    fn list(&self) -> Result<Vec<Product>, DomainError> {
        let mut conn = self.pool.get()?;

        products::table
            .select(ProductRow::as_select())
            .order((products::created_at.asc(), products::id.asc()))
            .load(&mut conn)?
            .into_iter()
            .map(Product::try_from)
            .collect()
    }

    fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let mut conn = self.pool.get()?;
        let name = product.name.clone();

        let row = diesel::insert_into(products::table)
            .values(&NewProductRow {
                id: ObjectId::generate().into(),
                name: product.name,
                price: product.price,
                description: product.description,
                stock_quantity: product.stock_quantity,
                image_url: product.image_url,
            })
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::DuplicateProductName(name)
                } else {
                    e.into()
                }
            })?;

        Product::try_from(row)
    }
}
