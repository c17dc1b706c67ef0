//! In-memory adapters for every port, used by the test suites and for running
//! the HTTP layer without a database.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::domain::cart::Cart;
use crate::domain::errors::DomainError;
use crate::domain::ids::ObjectId;
use crate::domain::ports::{CartRepository, CatalogStore, IdentityStore};
use crate::domain::product::{NewProduct, Product};
use crate::domain::user::{NewUser, User};

fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>, DomainError> {
    m.lock()
        .map_err(|_| DomainError::Internal("in-memory store lock poisoned".to_string()))
}

#[derive(Debug, Default)]
pub struct InMemoryCartRepository {
    carts: Mutex<HashMap<ObjectId, Cart>>,
}

impl InMemoryCartRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartRepository for InMemoryCartRepository {
    fn find_by_user(&self, user_id: &ObjectId) -> Result<Option<Cart>, DomainError> {
        Ok(lock(&self.carts)?.get(user_id).cloned())
    }

    fn save(&self, mut cart: Cart) -> Result<Cart, DomainError> {
        let mut carts = lock(&self.carts)?;
        let now = Utc::now();

        let stored = carts.get(&cart.user_id);
        cart.id = stored
            .and_then(|c| c.id.clone())
            .or(cart.id)
            .or_else(|| Some(ObjectId::generate()));
        cart.created_at = stored
            .and_then(|c| c.created_at)
            .or(cart.created_at)
            .or(Some(now));
        cart.updated_at = Some(now);

        carts.insert(cart.user_id.clone(), cart.clone());
        Ok(cart)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    products: Mutex<Vec<Product>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the stored price and stock of `id`, standing in for catalog
    /// changes made outside the cart flow.
    #[cfg(any(test, feature = "test-support"))]
    pub fn restock(
        &self,
        id: &ObjectId,
        price: bigdecimal::BigDecimal,
        stock_quantity: i32,
    ) -> Result<(), DomainError> {
        let mut products = lock(&self.products)?;
        let product = products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or(DomainError::ProductNotFound)?;
        product.price = price;
        product.stock_quantity = stock_quantity;
        product.updated_at = Utc::now();
        Ok(())
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn find_by_id(&self, id: &ObjectId) -> Result<Option<Product>, DomainError> {
        Ok(lock(&self.products)?.iter().find(|p| &p.id == id).cloned())
    }

    fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Product>, DomainError> {
        Ok(lock(&self.products)?
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Product>, DomainError> {
        Ok(lock(&self.products)?
            .iter()
            .find(|p| p.name == name)
            .cloned())
    }

    fn list(&self) -> Result<Vec<Product>, DomainError> {
        Ok(lock(&self.products)?.clone())
    }

    fn create(&self, product: NewProduct) -> Result<Product, DomainError> {
        let mut products = lock(&self.products)?;
        if products.iter().any(|p| p.name == product.name) {
            return Err(DomainError::DuplicateProductName(product.name));
        }

        let now = Utc::now();
        let created = Product {
            id: ObjectId::generate(),
            name: product.name,
            price: product.price,
            description: product.description,
            stock_quantity: product.stock_quantity,
            image_url: product.image_url,
            created_at: now,
            updated_at: now,
        };
        products.push(created.clone());
        Ok(created)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    users: Mutex<Vec<User>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityStore for InMemoryIdentityStore {
    fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(lock(&self.users)?.iter().find(|u| u.email == email).cloned())
    }

    fn exists_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<bool, DomainError> {
        Ok(lock(&self.users)?
            .iter()
            .any(|u| u.email == email || u.username == username))
    }

    fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut users = lock(&self.users)?;
        if users
            .iter()
            .any(|u| u.email == user.email || u.username == user.username)
        {
            return Err(DomainError::DuplicateUser);
        }

        let created = User {
            id: ObjectId::generate(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(created)
    }
}

/// Reversible "hash" for tests where Argon2's cost would dominate run time.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default)]
pub struct PlaintextPasswordHasher;

#[cfg(any(test, feature = "test-support"))]
impl crate::domain::ports::PasswordHasher for PlaintextPasswordHasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        Ok(format!("plain${password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        Ok(hash.strip_prefix("plain$") == Some(password))
    }
}
