use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invoice not found")]
    NotFound,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure classes of the credential check. `InvalidCredentials` and
/// `Provider` are reported inline by the login flow; `Store` propagates to
/// the surrounding framework untouched.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Auth provider error: {0}")]
    Provider(String),
    #[error(transparent)]
    Store(#[from] DomainError),
}
