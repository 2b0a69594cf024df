//! Argon2 password hashing.
//!
//! Stored passwords are PHC strings (`$argon2id$v=19$...`) carrying their own
//! salt and cost parameters, so hashes written under older parameters keep
//! verifying after the defaults change.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use juicebox_core::ports::{AuthError, PasswordService};

/// Well-formed hash that matches no password, verified in place of a missing
/// account's hash so unknown usernames cost the same as wrong passwords.
/// Its parameters are the `Argon2::default()` ones.
const UNKNOWN_USER_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8";

pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    fn matches(&self, password: &str, stored: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(stored).map_err(|e| AuthError::HashingError(e.to_string()))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
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
        self.matches(password, hash)
    }

    fn verify_login(&self, password: &str, stored: Option<&str>) -> Result<bool, AuthError> {
        match stored {
            Some(hash) => self.matches(password, hash),
            None => {
                self.matches(password, UNKNOWN_USER_HASH)?;
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let service = Argon2PasswordService::new();

        let hash = service.hash("bertie99").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(service.verify("bertie99", &hash).unwrap());
        assert!(!service.verify("2sandy4me", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let service = Argon2PasswordService::new();

        let first = service.hash("bertie99").unwrap();
        let second = service.hash("bertie99").unwrap();

        assert_ne!(first, second);
        assert!(!first.contains("bertie99"));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        let service = Argon2PasswordService::new();

        let result = service.verify("bertie99", "not-a-phc-string");

        assert!(matches!(result, Err(AuthError::HashingError(_))));
    }

    #[test]
    fn test_verify_login_for_known_user() {
        let service = Argon2PasswordService::new();
        let hash = service.hash("bertie99").unwrap();

        assert!(service.verify_login("bertie99", Some(&hash)).unwrap());
        assert!(!service.verify_login("wrong", Some(&hash)).unwrap());
    }

    #[test]
    fn test_verify_login_for_unknown_user_never_matches() {
        let service = Argon2PasswordService::new();

        assert!(PasswordHash::new(UNKNOWN_USER_HASH).is_ok());
        assert!(!service.verify_login("bertie99", None).unwrap());
        assert!(!service.verify_login("", None).unwrap());
    }
}
