use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use super::ids::ObjectId;

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ObjectId,
    pub name: String,
    pub price: BigDecimal,
    pub description: String,
    pub stock_quantity: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated catalog entry that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: BigDecimal,
    pub description: String,
    pub stock_quantity: i32,
    pub image_url: Option<String>,
}
