use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::errors::{AuthError, DomainError};
use crate::domain::ports::CredentialVerifier;
use crate::schema::users;

use super::models::UserRow;

/// Credential check against the `users` table. Passwords are stored as
/// bcrypt hashes; a user that does not exist and a wrong password are
/// indistinguishable to the caller.
#[derive(Clone)]
pub struct DieselCredentialVerifier {
    pool: DbPool,
}

impl DieselCredentialVerifier {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CredentialVerifier for DieselCredentialVerifier {
    fn verify(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let mut conn = self.pool.get().map_err(DomainError::from)?;

        let user = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(DomainError::from)?;

        let Some(user) = user else {
            return Err(AuthError::InvalidCredentials);
        };

        match bcrypt::verify(password, &user.password) {
            Ok(true) => Ok(()),
            Ok(false) => Err(AuthError::InvalidCredentials),
            Err(e) => Err(AuthError::Provider(e.to_string())),
        }
    }
}
