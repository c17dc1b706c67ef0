use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::cart::{Cart, StockCheck};
use crate::domain::errors::DomainError;
use crate::domain::ids::ObjectId;
use crate::domain::ports::{CartRepository, CatalogStore};
use crate::domain::product::Product;
use crate::domain::reconciler;
use crate::validation::CartItemInput;

/// A cart joined with the current catalog entries of its products.
#[derive(Debug, Clone)]
pub struct CartView {
    pub cart: Cart,
    pub products: HashMap<ObjectId, Product>,
}

/// Fetch, reconcile, save. Each call is independent; two concurrent calls for
/// the same user race and the later save wins.
pub struct CartService {
    carts: Arc<dyn CartRepository>,
    catalog: Arc<dyn CatalogStore>,
    stock_check: StockCheck,
}

impl CartService {
    pub fn new(
        carts: Arc<dyn CartRepository>,
        catalog: Arc<dyn CatalogStore>,
        stock_check: StockCheck,
    ) -> Self {
        Self {
            carts,
            catalog,
            stock_check,
        }
    }

    fn product(&self, id: &ObjectId) -> Result<Product, DomainError> {
        self.catalog
            .find_by_id(id)?
            .ok_or(DomainError::ProductNotFound)
    }

    pub fn view(&self, user_id: &ObjectId) -> Result<CartView, DomainError> {
        let cart = reconciler::view(self.carts.find_by_user(user_id)?, user_id);

        let ids: Vec<ObjectId> = cart.items.iter().map(|i| i.product_id.clone()).collect();
        let products = self
            .catalog
            .find_by_ids(&ids)?
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        Ok(CartView { cart, products })
    }

    pub fn add_item(&self, user_id: &ObjectId, input: CartItemInput) -> Result<Cart, DomainError> {
        let product = self.product(&input.product_id)?;
        let current = self.carts.find_by_user(user_id)?;

        let next = reconciler::add(current, user_id, &product, input.quantity, self.stock_check)?;
        let saved = self.carts.save(next)?;

        log::info!(
            "user {} added {} x {} to cart",
            user_id,
            input.quantity,
            product.id
        );
        Ok(saved)
    }

    /// `product_id` is the raw path segment; it is format-checked before any
    /// store is touched.
    pub fn update_item(
        &self,
        user_id: &ObjectId,
        product_id: &str,
        quantity: i32,
    ) -> Result<Cart, DomainError> {
        let product_id = ObjectId::parse_for("Product", product_id)?;
        let product = self.product(&product_id)?;
        let current = self.carts.find_by_user(user_id)?;

        let next = reconciler::update(current, &product, quantity)?;
        let saved = self.carts.save(next)?;

        log::info!("user {} set {} to quantity {}", user_id, product_id, quantity);
        Ok(saved)
    }

    pub fn remove_item(&self, user_id: &ObjectId, product_id: &str) -> Result<(), DomainError> {
        let product_id = ObjectId::parse_for("Product", product_id)?;
        let current = self.carts.find_by_user(user_id)?;

        let next = reconciler::remove(current, &product_id)?;
        self.carts.save(next)?;

        log::info!("user {} removed {} from cart", user_id, product_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::domain::product::NewProduct;
    use crate::infrastructure::memory::{InMemoryCartRepository, InMemoryCatalogStore};

    struct Fixture {
        carts: Arc<InMemoryCartRepository>,
        catalog: Arc<InMemoryCatalogStore>,
        user: ObjectId,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                carts: Arc::new(InMemoryCartRepository::new()),
                catalog: Arc::new(InMemoryCatalogStore::new()),
                user: ObjectId::generate(),
            }
        }

        fn service(&self, stock_check: StockCheck) -> CartService {
            CartService::new(self.carts.clone(), self.catalog.clone(), stock_check)
        }

        fn product(&self, name: &str, price: &str, stock: i32) -> Product {
            self.catalog
                .create(NewProduct {
                    name: name.to_string(),
                    price: BigDecimal::from_str(price).expect("valid decimal"),
                    description: "fixture".to_string(),
                    stock_quantity: stock,
                    image_url: None,
                })
                .expect("create product")
        }

        fn stored(&self) -> Option<Cart> {
            self.carts.find_by_user(&self.user).expect("find cart")
        }
    }

    fn input(product: &Product, quantity: i32) -> CartItemInput {
        CartItemInput {
            product_id: product.id.clone(),
            quantity,
        }
    }

    #[test]
    fn first_add_creates_and_persists_cart() {
        let fx = Fixture::new();
        let mug = fx.product("Mug", "7.50", 10);

        let saved = fx
            .service(StockCheck::PerRequest)
            .add_item(&fx.user, input(&mug, 2))
            .expect("add");

        assert!(saved.is_persisted());
        assert_eq!(fx.stored(), Some(saved.clone()));
        assert_eq!(saved.items.len(), 1);
        assert_eq!(saved.items[0].quantity, 2);
    }

    #[test]
    fn add_of_unknown_product_fails_without_creating_cart() {
        let fx = Fixture::new();
        let err = fx
            .service(StockCheck::PerRequest)
            .add_item(
                &fx.user,
                CartItemInput {
                    product_id: ObjectId::generate(),
                    quantity: 1,
                },
            )
            .unwrap_err();

        assert!(matches!(err, DomainError::ProductNotFound));
        assert!(fx.stored().is_none());
    }

    #[test]
    fn second_add_uses_latest_price() {
        let fx = Fixture::new();
        let svc = fx.service(StockCheck::PerRequest);
        let mug = fx.product("Mug", "7.50", 10);

        svc.add_item(&fx.user, input(&mug, 1)).expect("first add");
        fx.catalog
            .restock(&mug.id, BigDecimal::from_str("8.00").unwrap(), 10)
            .expect("restock");
        let saved = svc.add_item(&fx.user, input(&mug, 2)).expect("second add");

        assert_eq!(saved.items[0].quantity, 3);
        assert_eq!(
            saved.items[0].price_at_addition,
            BigDecimal::from_str("8.00").unwrap()
        );
    }

    #[test]
    fn insufficient_stock_leaves_stored_cart_untouched() {
        let fx = Fixture::new();
        let svc = fx.service(StockCheck::PerRequest);
        let mug = fx.product("Mug", "7.50", 2);

        let before = svc.add_item(&fx.user, input(&mug, 1)).expect("add");
        let err = svc.add_item(&fx.user, input(&mug, 3)).unwrap_err();

        assert!(matches!(err, DomainError::InsufficientStock { available: 2, .. }));
        assert_eq!(fx.stored(), Some(before));
    }

    #[test]
    fn repeated_adds_within_stock_each_pass_per_request() {
        let fx = Fixture::new();
        let svc = fx.service(StockCheck::PerRequest);
        let mug = fx.product("Mug", "1.00", 5);

        svc.add_item(&fx.user, input(&mug, 3)).expect("first add");
        let saved = svc.add_item(&fx.user, input(&mug, 3)).expect("second add");

        assert_eq!(saved.items[0].quantity, 6);
    }

    #[test]
    fn repeated_adds_past_stock_fail_cumulatively() {
        let fx = Fixture::new();
        let svc = fx.service(StockCheck::Cumulative);
        let mug = fx.product("Mug", "1.00", 5);

        svc.add_item(&fx.user, input(&mug, 3)).expect("first add");
        let err = svc.add_item(&fx.user, input(&mug, 3)).unwrap_err();

        assert!(matches!(err, DomainError::InsufficientStock { .. }));
        assert_eq!(fx.stored().expect("cart").items[0].quantity, 3);
    }

    #[test]
    fn update_replaces_quantity() {
        let fx = Fixture::new();
        let svc = fx.service(StockCheck::PerRequest);
        let mug = fx.product("Mug", "1.00", 10);
        svc.add_item(&fx.user, input(&mug, 5)).expect("add");

        let saved = svc
            .update_item(&fx.user, mug.id.as_str(), 2)
            .expect("update");

        assert_eq!(saved.items[0].quantity, 2);
        assert_eq!(fx.stored().expect("cart").items[0].quantity, 2);
    }

    #[test]
    fn update_rejects_malformed_id_before_lookup() {
        let fx = Fixture::new();
        let err = fx
            .service(StockCheck::PerRequest)
            .update_item(&fx.user, "not-an-id", 1)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidIdentifierFormat("Product")));
    }

    #[test]
    fn update_failures_follow_check_order() {
        let fx = Fixture::new();
        let svc = fx.service(StockCheck::PerRequest);
        let mug = fx.product("Mug", "1.00", 3);
        let lamp = fx.product("Lamp", "1.00", 3);

        let missing = ObjectId::generate();
        assert!(matches!(
            svc.update_item(&fx.user, missing.as_str(), 1),
            Err(DomainError::ProductNotFound)
        ));
        assert!(matches!(
            svc.update_item(&fx.user, mug.id.as_str(), 4),
            Err(DomainError::InsufficientStock { .. })
        ));
        assert!(matches!(
            svc.update_item(&fx.user, mug.id.as_str(), 1),
            Err(DomainError::CartNotFound)
        ));

        svc.add_item(&fx.user, input(&mug, 1)).expect("add");
        assert!(matches!(
            svc.update_item(&fx.user, lamp.id.as_str(), 1),
            Err(DomainError::ItemNotInCart)
        ));
    }

    #[test]
    fn remove_twice_fails_second_time() {
        let fx = Fixture::new();
        let svc = fx.service(StockCheck::PerRequest);
        let mug = fx.product("Mug", "1.00", 3);
        svc.add_item(&fx.user, input(&mug, 1)).expect("add");

        svc.remove_item(&fx.user, mug.id.as_str()).expect("remove");
        let err = svc.remove_item(&fx.user, mug.id.as_str()).unwrap_err();

        assert!(matches!(err, DomainError::ItemNotInCart));
        assert!(fx.stored().expect("cart is kept").items.is_empty());
    }

    #[test]
    fn remove_rejects_malformed_id_before_lookup() {
        let fx = Fixture::new();
        let svc = fx.service(StockCheck::PerRequest);
        let mug = fx.product("Mug", "1.00", 3);
        svc.add_item(&fx.user, input(&mug, 1)).expect("add");

        let err = svc.remove_item(&fx.user, "not-an-id").unwrap_err();

        assert!(matches!(err, DomainError::InvalidIdentifierFormat("Product")));
        assert_eq!(fx.stored().expect("cart").items.len(), 1);
    }

    #[test]
    fn remove_without_cart_fails() {
        let fx = Fixture::new();
        let err = fx
            .service(StockCheck::PerRequest)
            .remove_item(&fx.user, ObjectId::generate().as_str())
            .unwrap_err();
        assert!(matches!(err, DomainError::CartNotFound));
    }

    #[test]
    fn view_without_cart_is_empty_and_not_persisted() {
        let fx = Fixture::new();
        let view = fx.service(StockCheck::PerRequest).view(&fx.user).expect("view");

        assert!(view.cart.items.is_empty());
        assert!(!view.cart.is_persisted());
        assert!(fx.stored().is_none());
    }

    #[test]
    fn view_joins_current_product_details() {
        let fx = Fixture::new();
        let svc = fx.service(StockCheck::PerRequest);
        let mug = fx.product("Mug", "7.50", 10);
        svc.add_item(&fx.user, input(&mug, 2)).expect("add");
        fx.catalog
            .restock(&mug.id, BigDecimal::from_str("9.00").unwrap(), 10)
            .expect("restock");

        let view = svc.view(&fx.user).expect("view");

        let current = view.products.get(&mug.id).expect("product joined");
        assert_eq!(current.price, BigDecimal::from_str("9.00").unwrap());
        assert_eq!(
            view.cart.items[0].price_at_addition,
            BigDecimal::from_str("7.50").unwrap()
        );
        assert_eq!(view.cart.subtotal(), BigDecimal::from_str("15.00").unwrap());
    }
}
