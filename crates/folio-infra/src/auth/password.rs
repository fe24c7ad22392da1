//! Argon2 password hashing implementation.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use folio_core::ports::{AuthError, PasswordService};

/// Argon2-based password service.
///
/// The admin password is never compared as plain text: it is hashed once at
/// startup (or supplied pre-hashed) and login attempts go through
/// [`PasswordVerifier`].
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Check that `hash` is a well-formed PHC string before it is relied on.
    pub fn is_valid_hash(hash: &str) -> bool {
        PasswordHash::new(hash).is_ok()
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| AuthError::HashingError(e.to_string()))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_admin_password() {
        let service = Argon2PasswordService::new();

        let hash = service.hash("portfolio-admin").unwrap();

        assert!(Argon2PasswordService::is_valid_hash(&hash));
        assert!(service.verify("portfolio-admin", &hash).unwrap());
        assert!(!service.verify("Portfolio-admin", &hash).unwrap());
        assert!(!service.verify("", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        let service = Argon2PasswordService::new();

        assert!(!Argon2PasswordService::is_valid_hash("plain-text-secret"));
        assert!(matches!(
            service.verify("anything", "plain-text-secret"),
            Err(AuthError::HashingError(_))
        ));
    }
}
