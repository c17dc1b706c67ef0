use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};

use super::ids::ObjectId;

#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub product_id: ObjectId,
    pub quantity: i32,
    /// Product price as of the most recent add/update of this item.
    pub price_at_addition: BigDecimal,
}

impl CartItem {
    pub fn line_total(&self) -> BigDecimal {
        self.price_at_addition.clone() * BigDecimal::from(self.quantity)
    }
}

/// A user's cart. `id` and the timestamps are `None` until the cart has been
/// saved by a repository.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub items: Vec<CartItem>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Cart {
    pub fn empty(user_id: ObjectId) -> Self {
        Self {
            id: None,
            user_id,
            items: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn item(&self, product_id: &ObjectId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.product_id == product_id)
    }

    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i64::from(i.quantity)).sum()
    }

    pub fn subtotal(&self) -> BigDecimal {
        self.items
            .iter()
            .fold(BigDecimal::from(0), |acc, item| acc + item.line_total())
    }
}

/// How `add` validates the requested quantity against product stock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StockCheck {
    /// Only the quantity in the current request is compared with stock; a
    /// series of adds may accumulate past the available stock.
    #[default]
    PerRequest,
    /// The prospective cart quantity (existing + requested) is compared with
    /// stock.
    Cumulative,
}

impl std::str::FromStr for StockCheck {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "per-request" | "per_request" => Ok(Self::PerRequest),
            "cumulative" => Ok(Self::Cumulative),
            other => Err(format!(
                "unknown stock check '{other}', expected 'per-request' or 'cumulative'"
            )),
        }
    }
}
