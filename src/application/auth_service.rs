use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::ids::ObjectId;
use crate::domain::ports::{IdentityStore, PasswordHasher, TokenService};
use crate::domain::user::{AuthSession, NewUser};
use crate::validation::{LoginInput, RegisterInput};

pub struct AuthService {
    users: Arc<dyn IdentityStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn IdentityStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    pub fn register(&self, input: RegisterInput) -> Result<AuthSession, DomainError> {
        if self
            .users
            .exists_by_email_or_username(&input.email, &input.username)?
        {
            return Err(DomainError::DuplicateUser);
        }

        let user = self.users.create(NewUser {
            username: input.username,
            email: input.email,
            password_hash: self.hasher.hash(&input.password)?,
        })?;
        let token = self.tokens.issue(&user.id)?;

        log::info!("registered user {} ({})", user.id, user.username);
        Ok(AuthSession { user, token })
    }

    /// Unknown emails and wrong passwords fail identically.
    pub fn login(&self, input: LoginInput) -> Result<AuthSession, DomainError> {
        let Some(user) = self.users.find_by_email(&input.email)? else {
            return Err(DomainError::InvalidCredentials);
        };
        if !self.hasher.verify(&input.password, &user.password_hash)? {
            log::warn!("failed login for user {}", user.id);
            return Err(DomainError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user.id)?;
        Ok(AuthSession { user, token })
    }

    pub fn authenticate(&self, token: &str) -> Result<ObjectId, DomainError> {
        self.tokens.verify(token)
    }
}
