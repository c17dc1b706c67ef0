use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::cart::{Cart, CartItem};
use crate::domain::errors::DomainError;
use crate::domain::ids::ObjectId;
use crate::domain::ports::CartRepository;
use crate::schema::{cart_items, carts};

use super::models::{CartItemRow, CartRow, NewCartItemRow, NewCartRow};

pub struct DieselCartRepository {
    pool: DbPool,
}

impl DieselCartRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn load_items(conn: &mut PgConnection, cart_id: &str) -> Result<Vec<CartItem>, DomainError> {
    cart_items::table
        .filter(cart_items::cart_id.eq(cart_id))
        .select(CartItemRow::as_select())
        .order(cart_items::position.asc())
        .load(conn)?
        .into_iter()
        .map(CartItem::try_from)
        .collect()
}

fn into_cart(row: CartRow, items: Vec<CartItem>) -> Result<Cart, DomainError> {
    let id = ObjectId::try_from(row.id).map_err(|e| DomainError::Internal(e.to_string()))?;
    let user_id =
        ObjectId::try_from(row.user_id).map_err(|e| DomainError::Internal(e.to_string()))?;

    Ok(Cart {
        id: Some(id),
        user_id,
        items,
        created_at: Some(row.created_at),
        updated_at: Some(row.updated_at),
    })
}

impl CartRepository for DieselCartRepository {
    fn find_by_user(&self, user_id: &ObjectId) -> Result<Option<Cart>, DomainError> {
        let mut conn = self.pool.get()?;

        let cart = carts::table
            .filter(carts::user_id.eq(user_id.as_str()))
            .select(CartRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(cart) = cart else {
            return Ok(None);
        };

        let items = load_items(&mut conn, &cart.id)?;
        into_cart(cart, items).map(Some)
    }

    fn save(&self, cart: Cart) -> Result<Cart, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let now = Utc::now();

            // 1. Upsert the cart row. The unique constraint on `user_id` keeps
            //    a user at one cart even when two first-adds race.
            let row = match &cart.id {
                Some(id) => diesel::update(carts::table.filter(carts::id.eq(id.as_str())))
                    .set(carts::updated_at.eq(now))
                    .returning(CartRow::as_returning())
                    .get_result(conn)
                    .optional()?
                    .ok_or(DomainError::CartNotFound)?,
                None => diesel::insert_into(carts::table)
                    .values(&NewCartRow {
                        id: ObjectId::generate().into(),
                        user_id: cart.user_id.to_string(),
                    })
                    .on_conflict(carts::user_id)
                    .do_update()
                    .set(carts::updated_at.eq(now))
                    .returning(CartRow::as_returning())
                    .get_result(conn)?,
            };

            // 2. Rewrite the item list as a whole.
            diesel::delete(cart_items::table.filter(cart_items::cart_id.eq(row.id.as_str())))
                .execute(conn)?;

            let new_items: Vec<NewCartItemRow> = cart
                .items
                .iter()
                .zip(0..)
                .map(|(item, position)| NewCartItemRow {
                    cart_id: row.id.clone(),
                    product_id: item.product_id.to_string(),
                    position,
                    quantity: item.quantity,
                    price_at_addition: item.price_at_addition.clone(),
                })
                .collect();
            if !new_items.is_empty() {
                diesel::insert_into(cart_items::table)
                    .values(&new_items)
                    .execute(conn)?;
            }

            // 3. Read back what was stored.
            let items = load_items(conn, &row.id)?;
            into_cart(row, items)
        })
    }
}
