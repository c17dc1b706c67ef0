use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ids::ObjectId;
use crate::domain::ports::IdentityStore;
use crate::domain::user::{NewUser, User};
use crate::schema::users;

use super::is_unique_violation;
use super::models::{NewUserRow, UserRow};

pub struct DieselIdentityStore {
    pool: DbPool,
}

impl DieselIdentityStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl IdentityStore for DieselIdentityStore {
    fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let mut conn = self.pool.get()?;

        users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?
            .map(User::try_from)
            .transpose()
    }

    fn exists_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;

        let count: i64 = users::table
            .filter(users::email.eq(email).or(users::username.eq(username)))
            .count()
            .get_result(&mut conn)?;

        Ok(count > 0)
    }

    fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let mut conn = self.pool.get()?;

        let row = diesel::insert_into(users::table)
            .values(&NewUserRow {
                id: ObjectId::generate().into(),
                username: user.username,
                email: user.email,
                password_hash: user.password_hash,
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::DuplicateUser
                } else {
                    e.into()
                }
            })?;

        User::try_from(row)
    }
}
