//! # Validation Utilities
//!
//! Plain checks used for configuration values. Request bodies go through
//! `validator` derive structs instead.

/// Validate that a string is not empty.
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Validate minimum length.
pub fn validate_min_length(value: &str, min: usize, field_name: &str) -> Result<(), String> {
    if value.len() < min {
        Err(format!("{} must be at least {} characters long", field_name, min))
    } else {
        Ok(())
    }
}

/// Validate that a number lies in `min..=max`.
pub fn validate_range(value: i64, min: i64, max: i64, field_name: &str) -> Result<(), String> {
    if value < min || value > max {
        Err(format!("{} must be between {} and {}", field_name, min, max))
    } else {
        Ok(())
    }
}
