use super::cart::Cart;
use super::errors::DomainError;
use super::ids::ObjectId;
use super::product::{NewProduct, Product};
use super::user::{NewUser, User};

/// Persistence for the one cart each user may own.
pub trait CartRepository: Send + Sync + 'static {
    fn find_by_user(&self, user_id: &ObjectId) -> Result<Option<Cart>, DomainError>;
    /// Store the full cart state, replacing any previously stored item list,
    /// and return it with id and timestamps populated.
    fn save(&self, cart: Cart) -> Result<Cart, DomainError>;
}

pub trait CatalogStore: Send + Sync + 'static {
    fn find_by_id(&self, id: &ObjectId) -> Result<Option<Product>, DomainError>;
    /// Products for the given ids; unknown ids are skipped.
    fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Product>, DomainError>;
    fn find_by_name(&self, name: &str) -> Result<Option<Product>, DomainError>;
    fn list(&self) -> Result<Vec<Product>, DomainError>;
    fn create(&self, product: NewProduct) -> Result<Product, DomainError>;
}

pub trait IdentityStore: Send + Sync + 'static {
    fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    fn exists_by_email_or_username(&self, email: &str, username: &str)
        -> Result<bool, DomainError>;
    fn create(&self, user: NewUser) -> Result<User, DomainError>;
}

pub trait TokenService: Send + Sync + 'static {
    fn issue(&self, user_id: &ObjectId) -> Result<String, DomainError>;
    fn verify(&self, token: &str) -> Result<ObjectId, DomainError>;
}

pub trait PasswordHasher: Send + Sync + 'static {
    fn hash(&self, password: &str) -> Result<String, DomainError>;
    fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError>;
}
