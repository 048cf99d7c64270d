//! # Application Configuration
//!
//! This module manages application configuration loaded from environment variables.
//! All configuration is validated on startup to fail fast if misconfigured.
//!
//! | Variable | Default |
//! |---|---|
//! | `DATABASE_URL` | `sqlite:data/wallets.db` |
//! | `JWT_SECRET` | required, at least 32 characters |
//! | `JWT_EXPIRATION_HOURS` | `24` (1..=720) |
//! | `RESET_TOKEN_EXPIRATION_MINUTES` | `60` |
//! | `RESET_THROTTLE_SECONDS` | `60` |
//! | `APP_URL` | `http://localhost:3001` |

use lib_utils::{get_env, get_env_or, get_env_parse_or, validate_min_length, validate_not_empty, validate_range};

/// Application configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// SQLite database connection URL
    pub database_url: String,

    /// Secret key for JWT token signing and verification
    ///
    /// **Must be at least 32 characters long** for security.
    pub jwt_secret: String,

    /// JWT token validity period in hours
    ///
    /// Valid range: 1-720 hours (1 hour to 30 days)
    pub jwt_expiration_hours: i64,

    /// How long a password reset token stays usable.
    pub reset_token_expiration_minutes: i64,

    /// Minimum gap between two reset requests for the same email.
    pub reset_throttle_seconds: i64,

    /// Public base URL, used to build password reset links.
    pub app_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = get_env_or("DATABASE_URL", "sqlite:data/wallets.db");

        let jwt_secret = get_env("JWT_SECRET").map_err(|e| e.to_string())?;

        let jwt_expiration_hours =
            get_env_parse_or("JWT_EXPIRATION_HOURS", 24).map_err(|e| e.to_string())?;

        let reset_token_expiration_minutes =
            get_env_parse_or("RESET_TOKEN_EXPIRATION_MINUTES", 60).map_err(|e| e.to_string())?;

        let reset_throttle_seconds =
            get_env_parse_or("RESET_THROTTLE_SECONDS", 60).map_err(|e| e.to_string())?;

        let app_url = get_env_or("APP_URL", "http://localhost:3001");

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_expiration_hours,
            reset_token_expiration_minutes,
            reset_throttle_seconds,
            app_url,
        })
    }

    /// Validate configuration values against security and business rules.
    pub fn validate(&self) -> Result<(), String> {
        validate_not_empty(&self.database_url, "DATABASE_URL")?;
        validate_min_length(&self.jwt_secret, 32, "JWT_SECRET")?;
        validate_range(self.jwt_expiration_hours, 1, 720, "JWT_EXPIRATION_HOURS")?;
        validate_range(self.reset_token_expiration_minutes, 1, 24 * 60, "RESET_TOKEN_EXPIRATION_MINUTES")?;
        validate_range(self.reset_throttle_seconds, 0, 3600, "RESET_THROTTLE_SECONDS")?;
        validate_not_empty(&self.app_url, "APP_URL")?;
        Ok(())
    }

    /// Link mailed to users who asked for a password reset.
    ///
    /// Query values are percent-encoded so addresses like `a+b@example.com`
    /// survive the round trip.
    pub fn reset_link(&self, token: &str, email: &str) -> String {
        format!(
            "{}/reset-password?token={}&email={}",
            self.app_url.trim_end_matches('/'),
            urlencoding::encode(token),
            urlencoding::encode(email)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "test-secret-key-must-be-at-least-32-characters-long!".to_string(),
            jwt_expiration_hours: 24,
            reset_token_expiration_minutes: 60,
            reset_throttle_seconds: 60,
            app_url: "http://localhost:3001/".to_string(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_short_secret_rejected() {
        let config = Config {
            jwt_secret: "too-short".to_string(),
            ..config()
        };
        assert_eq!(
            config.validate(),
            Err("JWT_SECRET must be at least 32 characters long".to_string())
        );
    }

    #[test]
    fn test_expiration_out_of_range() {
        let config = Config {
            jwt_expiration_hours: 721,
            ..config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reset_link() {
        assert_eq!(
            config().reset_link("abc", "a@example.com"),
            "http://localhost:3001/reset-password?token=abc&email=a%40example.com"
        );
    }

    #[test]
    fn test_reset_link_encodes_plus_addressed_email() {
        let link = config().reset_link("tok-_1", "a+b&c@example.com");

        assert_eq!(
            link,
            "http://localhost:3001/reset-password?token=tok-_1&email=a%2Bb%26c%40example.com"
        );
        let email = link.rsplit("email=").next().unwrap();
        assert_eq!(urlencoding::decode(email).unwrap(), "a+b&c@example.com");
    }
}
