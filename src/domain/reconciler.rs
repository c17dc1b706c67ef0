//! Cart state transitions.
//!
//! Every function here is pure: it takes the current cart (if any) and the
//! product snapshot fetched by the caller, and returns the next cart or the
//! reason the operation is rejected. Persistence is the caller's job.

use super::cart::{Cart, CartItem, StockCheck};
use super::errors::DomainError;
use super::ids::ObjectId;
use super::product::Product;

fn insufficient_stock(product: &Product) -> DomainError {
    DomainError::InsufficientStock {
        name: product.name.clone(),
        available: product.stock_quantity,
    }
}

/// Add `quantity` of `product` to the user's cart, creating the cart if the
/// user has none. Re-adding a product accumulates its quantity and refreshes
/// the price snapshot.
pub fn add(
    cart: Option<Cart>,
    user_id: &ObjectId,
    product: &Product,
    quantity: i32,
    stock_check: StockCheck,
) -> Result<Cart, DomainError> {
    let mut cart = cart.unwrap_or_else(|| Cart::empty(user_id.clone()));
    let existing = cart
        .items
        .iter()
        .position(|i| i.product_id == product.id);

    // A cumulative sum that overflows is necessarily above any stock level.
    let checked = match (stock_check, existing) {
        (StockCheck::Cumulative, Some(idx)) => cart.items[idx].quantity.checked_add(quantity),
        _ => Some(quantity),
    };
    if checked.map_or(true, |q| product.stock_quantity < q) {
        return Err(insufficient_stock(product));
    }

    match existing {
        Some(idx) => {
            let item = &mut cart.items[idx];
            item.quantity = item.quantity.checked_add(quantity).ok_or_else(|| {
                DomainError::QuantityLimitExceeded {
                    name: product.name.clone(),
                    max: i32::MAX,
                }
            })?;
            item.price_at_addition = product.price.clone();
        }
        None => cart.items.push(CartItem {
            product_id: product.id.clone(),
            quantity,
            price_at_addition: product.price.clone(),
        }),
    }

    Ok(cart)
}

/// Set the quantity of `product` in the cart to exactly `quantity`.
pub fn update(cart: Option<Cart>, product: &Product, quantity: i32) -> Result<Cart, DomainError> {
    if product.stock_quantity < quantity {
        return Err(insufficient_stock(product));
    }

    let mut cart = cart.ok_or(DomainError::CartNotFound)?;
    let item = cart
        .items
        .iter_mut()
        .find(|i| i.product_id == product.id)
        .ok_or(DomainError::ItemNotInCart)?;

    item.quantity = quantity;
    item.price_at_addition = product.price.clone();

    Ok(cart)
}

/// Drop `product_id` from the cart, keeping the remaining items in order.
pub fn remove(cart: Option<Cart>, product_id: &ObjectId) -> Result<Cart, DomainError> {
    let mut cart = cart.ok_or(DomainError::CartNotFound)?;

    let before = cart.items.len();
    cart.items.retain(|i| &i.product_id != product_id);
    if cart.items.len() == before {
        return Err(DomainError::ItemNotInCart);
    }

    Ok(cart)
}

/// The user's cart, or an unsaved empty one.
pub fn view(cart: Option<Cart>, user_id: &ObjectId) -> Cart {
    cart.unwrap_or_else(|| Cart::empty(user_id.clone()))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use chrono::Utc;

    use super::*;

    fn product(id: &str, price: &str, stock: i32) -> Product {
        Product {
            id: id.parse().expect("valid id"),
            name: format!("product-{id}"),
            price: BigDecimal::from_str(price).expect("valid decimal"),
            description: "test product".to_string(),
            stock_quantity: stock,
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn user() -> ObjectId {
        "0123456789abcdef01234567".parse().expect("valid id")
    }

    const A: &str = "aaaaaaaaaaaaaaaaaaaaaaaa";
    const B: &str = "bbbbbbbbbbbbbbbbbbbbbbbb";
    const C: &str = "cccccccccccccccccccccccc";

    // ── add ───────────────────────────────────────────────────────────────────

    #[test]
    fn add_to_absent_cart_creates_single_item_cart() {
        let p = product(A, "9.99", 10);

        let cart = add(None, &user(), &p, 3, StockCheck::PerRequest).expect("add succeeds");

        assert_eq!(cart.user_id, user());
        assert!(!cart.is_persisted());
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].product_id, p.id);
        assert_eq!(cart.items[0].quantity, 3);
        assert_eq!(cart.items[0].price_at_addition, p.price);
    }

    #[test]
    fn add_same_product_accumulates_and_refreshes_price() {
        let first = product(A, "9.99", 10);
        let cart = add(None, &user(), &first, 2, StockCheck::PerRequest).unwrap();

        let repriced = product(A, "12.50", 10);
        let cart = add(Some(cart), &user(), &repriced, 4, StockCheck::PerRequest).unwrap();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 6);
        assert_eq!(
            cart.items[0].price_at_addition,
            BigDecimal::from_str("12.50").unwrap()
        );
    }

    #[test]
    fn add_new_product_appends_after_existing_items() {
        let cart = add(None, &user(), &product(A, "1", 5), 1, StockCheck::PerRequest).unwrap();
        let cart = add(Some(cart), &user(), &product(B, "2", 5), 1, StockCheck::PerRequest).unwrap();

        let ids: Vec<_> = cart.items.iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, vec![A, B]);
    }

    #[test]
    fn add_rejects_quantity_above_stock_and_leaves_cart_unchanged() {
        let cart = add(None, &user(), &product(A, "1", 5), 2, StockCheck::PerRequest).unwrap();
        let before = cart.clone();

        let err = add(
            Some(cart.clone()),
            &user(),
            &product(B, "1", 1),
            2,
            StockCheck::PerRequest,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            DomainError::InsufficientStock { available: 1, .. }
        ));
        assert_eq!(cart, before);
    }

    #[test]
    fn add_at_exact_stock_succeeds() {
        let cart = add(None, &user(), &product(A, "1", 4), 4, StockCheck::PerRequest);
        assert!(cart.is_ok());
    }

    #[test]
    fn per_request_check_allows_accumulating_past_stock() {
        let p = product(A, "1", 5);
        let cart = add(None, &user(), &p, 3, StockCheck::PerRequest).unwrap();

        let cart = add(Some(cart), &user(), &p, 3, StockCheck::PerRequest)
            .expect("each request is within stock");

        assert_eq!(cart.items[0].quantity, 6);
    }

    #[test]
    fn cumulative_check_rejects_accumulating_past_stock() {
        let p = product(A, "1", 5);
        let cart = add(None, &user(), &p, 3, StockCheck::Cumulative).unwrap();

        let err = add(Some(cart), &user(), &p, 3, StockCheck::Cumulative).unwrap_err();

        assert!(matches!(err, DomainError::InsufficientStock { .. }));
    }

    #[test]
    fn per_request_accumulation_past_i32_max_is_rejected() {
        let p = product(A, "1", 2_000_000_000);
        let cart = add(None, &user(), &p, 2_000_000_000, StockCheck::PerRequest).unwrap();
        let before = cart.clone();

        let err = add(Some(cart.clone()), &user(), &p, 2_000_000_000, StockCheck::PerRequest)
            .unwrap_err();

        assert!(matches!(
            err,
            DomainError::QuantityLimitExceeded { max: i32::MAX, .. }
        ));
        assert_eq!(cart, before);
    }

    #[test]
    fn cumulative_overflow_is_insufficient_stock() {
        let p = product(A, "1", i32::MAX);
        let cart = add(None, &user(), &p, i32::MAX, StockCheck::Cumulative).unwrap();

        let err = add(Some(cart), &user(), &p, 1, StockCheck::Cumulative).unwrap_err();

        assert!(matches!(err, DomainError::InsufficientStock { .. }));
    }

    #[test]
    fn cumulative_check_allows_filling_to_stock() {
        let p = product(A, "1", 5);
        let cart = add(None, &user(), &p, 3, StockCheck::Cumulative).unwrap();
        let cart = add(Some(cart), &user(), &p, 2, StockCheck::Cumulative).unwrap();
        assert_eq!(cart.items[0].quantity, 5);
    }

    // ── update ────────────────────────────────────────────────────────────────

    #[test]
    fn update_sets_absolute_quantity() {
        let p = product(A, "3.00", 10);
        let cart = add(None, &user(), &p, 5, StockCheck::PerRequest).unwrap();

        let cart = update(Some(cart), &p, 2).unwrap();

        assert_eq!(cart.items[0].quantity, 2);
    }

    #[test]
    fn update_refreshes_price_snapshot() {
        let cart = add(None, &user(), &product(A, "3.00", 10), 1, StockCheck::PerRequest).unwrap();

        let cart = update(Some(cart), &product(A, "4.25", 10), 1).unwrap();

        assert_eq!(
            cart.items[0].price_at_addition,
            BigDecimal::from_str("4.25").unwrap()
        );
    }

    #[test]
    fn update_without_cart_fails() {
        let err = update(None, &product(A, "1", 10), 1).unwrap_err();
        assert!(matches!(err, DomainError::CartNotFound));
    }

    #[test]
    fn update_missing_item_fails_and_leaves_cart_unchanged() {
        let cart = add(None, &user(), &product(A, "1", 10), 1, StockCheck::PerRequest).unwrap();
        let before = cart.clone();

        let err = update(Some(cart.clone()), &product(B, "1", 10), 1).unwrap_err();

        assert!(matches!(err, DomainError::ItemNotInCart));
        assert_eq!(cart, before);
    }

    #[test]
    fn update_checks_stock_before_cart_presence() {
        let err = update(None, &product(A, "1", 1), 2).unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { .. }));
    }

    // ── remove ────────────────────────────────────────────────────────────────

    #[test]
    fn remove_preserves_order_of_remaining_items() {
        let mut cart = None;
        for id in [A, B, C] {
            cart = Some(add(cart, &user(), &product(id, "1", 5), 1, StockCheck::PerRequest).unwrap());
        }

        let cart = remove(cart, &B.parse().unwrap()).unwrap();

        let ids: Vec<_> = cart.items.iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, vec![A, C]);
    }

    #[test]
    fn remove_twice_fails_with_item_not_in_cart() {
        let cart = add(None, &user(), &product(A, "1", 5), 1, StockCheck::PerRequest).unwrap();
        let id: ObjectId = A.parse().unwrap();

        let cart = remove(Some(cart), &id).unwrap();
        assert!(cart.items.is_empty());

        let err = remove(Some(cart), &id).unwrap_err();
        assert!(matches!(err, DomainError::ItemNotInCart));
    }

    #[test]
    fn remove_without_cart_fails() {
        let err = remove(None, &A.parse().unwrap()).unwrap_err();
        assert!(matches!(err, DomainError::CartNotFound));
    }

    // ── view ──────────────────────────────────────────────────────────────────

    #[test]
    fn view_of_absent_cart_is_empty_and_unsaved() {
        let cart = view(None, &user());
        assert!(cart.items.is_empty());
        assert!(!cart.is_persisted());
        assert_eq!(cart.user_id, user());
    }

    #[test]
    fn view_returns_existing_cart() {
        let cart = add(None, &user(), &product(A, "1", 5), 2, StockCheck::PerRequest).unwrap();
        assert_eq!(view(Some(cart.clone()), &user()), cart);
    }
}
