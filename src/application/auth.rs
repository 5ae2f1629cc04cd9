use crate::domain::errors::{AuthError, DomainError};
use crate::domain::ports::CredentialVerifier;

pub const DASHBOARD_PATH: &str = "/dashboard";

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials.";
pub const LOGIN_FAILED_MESSAGE: &str = "Something went wrong.";

/// Outcome of a login attempt that the credential check classified. Store
/// failures are not represented here; they propagate as errors.
#[derive(Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    Redirect(String),
    Rejected(&'static str),
}

/// Check a credential pair against the verifier and classify the result.
///
/// Bad credentials and provider-side failures become inline messages for the
/// login form; anything unclassified is returned as an error so the caller's
/// framework handles it instead of it being swallowed here.
pub fn authenticate<V: CredentialVerifier + ?Sized>(
    verifier: &V,
    email: &str,
    password: &str,
) -> Result<LoginOutcome, DomainError> {
    match verifier.verify(email, password) {
        Ok(()) => Ok(LoginOutcome::Redirect(DASHBOARD_PATH.to_string())),
        Err(AuthError::InvalidCredentials) => {
            Ok(LoginOutcome::Rejected(INVALID_CREDENTIALS_MESSAGE))
        }
        Err(AuthError::Provider(reason)) => {
            log::warn!("credential check failed: {}", reason);
            Ok(LoginOutcome::Rejected(LOGIN_FAILED_MESSAGE))
        }
        Err(AuthError::Store(e)) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubVerifier(Result<(), fn() -> AuthError>);

    impl CredentialVerifier for StubVerifier {
        fn verify(&self, _email: &str, _password: &str) -> Result<(), AuthError> {
            match &self.0 {
                Ok(()) => Ok(()),
                Err(make) => Err(make()),
            }
        }
    }

    #[test]
    fn verified_credentials_redirect_to_the_dashboard() {
        let outcome = authenticate(&StubVerifier(Ok(())), "user@example.com", "pw").unwrap();
        assert_eq!(outcome, LoginOutcome::Redirect(DASHBOARD_PATH.to_string()));
    }

    #[test]
    fn bad_credentials_get_the_specific_message() {
        let verifier = StubVerifier(Err(|| AuthError::InvalidCredentials));
        let outcome = authenticate(&verifier, "user@example.com", "nope").unwrap();
        assert_eq!(outcome, LoginOutcome::Rejected(INVALID_CREDENTIALS_MESSAGE));
    }

    #[test]
    fn provider_failures_get_the_generic_message() {
        let verifier = StubVerifier(Err(|| AuthError::Provider("corrupt hash".to_string())));
        let outcome = authenticate(&verifier, "user@example.com", "pw").unwrap();
        assert_eq!(outcome, LoginOutcome::Rejected(LOGIN_FAILED_MESSAGE));
    }

    #[test]
    fn store_failures_propagate_instead_of_being_swallowed() {
        let verifier = StubVerifier(Err(|| {
            AuthError::Store(DomainError::Internal("pool exhausted".to_string()))
        }));
        let result = authenticate(&verifier, "user@example.com", "pw");
        assert!(matches!(result, Err(DomainError::Internal(_))));
    }
}
