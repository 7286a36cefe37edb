//! Credentials and sessions
//!
//! Passwords are stored as argon2id PHC strings. Bearer tokens are opaque
//! random strings; only their SHA-256 digest is stored.

pub mod password;
pub mod session;

pub use password::{hash_password, verify_password};
pub use session::{hash_token, Session, SESSION_TTL_DAYS};

/// Error while hashing or checking credentials
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("failed to hash password: {0}")]
    Hash(String),

    #[error("invalid password hash: {0}")]
    MalformedHash(String),
}
