//! # Authentication Library
//!
//! Password hashing, JWT bearer tokens and password-reset tokens.

pub mod pwd;
pub mod reset;
pub mod token;

// Re-export commonly used types
pub use pwd::{hash_password, verify_password};
pub use reset::{generate_reset_token, verify_reset_token, ResetToken};
pub use token::{Claims, IssuedToken, encode_jwt, decode_jwt};
