use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::cart::CartItem;
use crate::domain::errors::DomainError;
use crate::domain::ids::ObjectId;
use crate::domain::product::Product;
use crate::domain::user::User;
use crate::schema::{cart_items, carts, products, users};

/// Rows hold ids as plain strings; anything that fails to parse back into an
/// [`ObjectId`] means the table was written outside this service.
fn stored_id(raw: String) -> Result<ObjectId, DomainError> {
    ObjectId::try_from(raw).map_err(|e| DomainError::Internal(format!("corrupt stored id: {e}")))
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub price: BigDecimal,
    pub description: String,
    pub stock_quantity: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = DomainError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        Ok(Product {
            id: stored_id(row.id)?,
            name: row.name,
            price: row.price,
            description: row.description,
            stock_quantity: row.stock_quantity,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub id: String,
    pub name: String,
    pub price: BigDecimal,
    pub description: String,
    pub stock_quantity: i32,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: stored_id(row.id)?,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = carts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartRow {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = carts)]
pub struct NewCartRow {
    pub id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Associations)]
#[diesel(table_name = cart_items)]
#[diesel(belongs_to(CartRow, foreign_key = cart_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CartItemRow {
    pub cart_id: String,
    pub product_id: String,
    pub position: i32,
    pub quantity: i32,
    pub price_at_addition: BigDecimal,
}

impl TryFrom<CartItemRow> for CartItem {
    type Error = DomainError;

    fn try_from(row: CartItemRow) -> Result<Self, Self::Error> {
        Ok(CartItem {
            product_id: stored_id(row.product_id)?,
            quantity: row.quantity,
            price_at_addition: row.price_at_addition,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = cart_items)]
pub struct NewCartItemRow {
    pub cart_id: String,
    pub product_id: String,
    pub position: i32,
    pub quantity: i32,
    pub price_at_addition: BigDecimal,
}
