use anyhow::{Result, anyhow};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::RngCore;

const SALT_LENGTH: usize = 16;

#[derive(Clone, Default)]
pub struct PasswordService;

impl PasswordService {
    pub fn new() -> Self {
        Self
    }

    /// Returns an argon2id PHC string.
    pub fn hash(&self, password: &str) -> Result<String> {
        let mut salt_bytes = [0u8; SALT_LENGTH];
        rand::thread_rng().fill_bytes(&mut salt_bytes);
        let salt =
            SaltString::encode_b64(&salt_bytes).map_err(|e| anyhow!("invalid salt: {}", e))?;

        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow!("password hashing failed: {}", e))?;
        Ok(hash.to_string())
    }

    pub fn verify(&self, password: &str, stored_hash: &str) -> Result<bool> {
        let parsed =
            PasswordHash::new(stored_hash).map_err(|e| anyhow!("invalid password hash: {}", e))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
