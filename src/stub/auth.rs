//! Credential primitives for the stub backend: Argon2 password hashes and
//! opaque bearer tokens stored only as SHA-256 digests.

use argon2::password_hash::{SaltString, rand_core::OsRng as SaltRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

/// Check `password` against a stored Argon2 PHC string. A malformed hash
/// never verifies.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Argon2id with a random salt, as a PHC string (trainer config, client accounts).
pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut SaltRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|e| format!("argon2 hash error: {e}"))
}

/// Opaque bearer token handed to the caller. Only its hash is kept.
pub fn generate_access_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// SHA-256 hex of a bearer token; the session table key.
pub fn hash_access_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
