use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use core_lib::{CoreError, PasswordEncoder};

/// Argon2id password encoder with library defaults.
#[derive(Debug, Default, Clone)]
pub struct Argon2PasswordEncoder {
    argon2: Argon2<'static>,
}

impl PasswordEncoder for Argon2PasswordEncoder {
    fn encode(&self, raw_password: &str) -> Result<String, CoreError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(raw_password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CoreError::Internal(format!("Password hashing failed: {e}")))
    }

    fn matches(&self, raw_password: &str, encoded: &str) -> bool {
        match PasswordHash::new(encoded) {
            Ok(parsed) => self
                .argon2
                .verify_password(raw_password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}
