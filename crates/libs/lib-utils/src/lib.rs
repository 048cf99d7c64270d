//! # Utilities Library
//!
//! Small helpers shared by the other crates: base64url for reset tokens,
//! environment variable parsing, time and field validation.

pub mod b64;
pub mod envs;
pub mod time;
pub mod validation;

// Re-export commonly used functions
pub use b64::{b64u_encode, b64u_decode};
pub use envs::{get_env, get_env_or, get_env_parse_or};
pub use time::{now_utc, is_expired};
pub use validation::{validate_not_empty, validate_min_length, validate_range};
