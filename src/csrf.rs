//! Cross-site request forgery tokens.
//!
//! Each browser holds a random secret in an HttpOnly cookie. Forms embed a
//! token derived from that secret with a fresh salt:
//!
//! ```text
//! token = salt "-" base64url(sha256(salt "-" secret))
//! ```
//!
//! A POST is accepted only when its token re-derives from the cookie secret.
//! Tokens are stateless: nothing is stored server-side.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{distributions::Alphanumeric, Rng, RngCore};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Hidden form field carrying the token
pub const TOKEN_FIELD: &str = "_csrf";

const SECRET_BYTES: usize = 18;
const SALT_LEN: usize = 8;

/// CSRF validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CsrfError {
    #[error("token missing from form")]
    Missing,
    #[error("secret cookie missing or malformed")]
    MissingSecret,
    #[error("token does not match secret")]
    Invalid,
}

/// Per-browser secret stored in the CSRF cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfSecret(String);

impl CsrfSecret {
    /// Create a fresh random secret
    pub fn generate() -> Self {
        let mut bytes = [0u8; SECRET_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Accept a cookie value only if it has the shape of a generated secret
    pub fn from_cookie_value(value: &str) -> Option<Self> {
        match URL_SAFE_NO_PAD.decode(value) {
            Ok(bytes) if bytes.len() == SECRET_BYTES => Some(Self(value.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Mint a new token for embedding in a form
    pub fn mint_token(&self) -> String {
        let salt: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SALT_LEN)
            .map(char::from)
            .collect();
        format!("{}-{}", salt, self.digest(&salt))
    }

    /// Check a submitted token against this secret
    pub fn verify(&self, token: Option<&str>) -> Result<(), CsrfError> {
        let token = token.filter(|t| !t.is_empty()).ok_or(CsrfError::Missing)?;
        let (salt, hash) = token.split_once('-').ok_or(CsrfError::Invalid)?;
        if salt.is_empty() {
            return Err(CsrfError::Invalid);
        }

        let expected = self.digest(salt);
        if !constant_time_eq(hash.as_bytes(), expected.as_bytes()) {
            return Err(CsrfError::Invalid);
        }
        Ok(())
    }

    fn digest(&self, salt: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(b"-");
        hasher.update(self.0.as_bytes());
        URL_SAFE_NO_PAD.encode(hasher.finalize())
    }
}

/// Constant-time comparison to prevent timing attacks
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
