//! Application configuration loaded from environment variables.
//!
//! Secrets are read once at startup. In production the hosting platform
//! injects them as environment variables via secret bindings.

use std::env;

/// Default base URL for the hosted text-generation API.
pub const DEFAULT_GENERATION_API_URL: &str = "https://api.lunary-generation.dev/v1";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Environment Variables (non-sensitive) ---
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// Base URL for the hosted text-generation API
    pub generation_api_url: String,
    /// Comma-separated emails with admin access (analytics, social tools)
    pub admin_emails: Vec<String>,
    /// Server port
    pub port: u16,

    // --- Secrets ---
    /// Postgres connection string
    pub database_url: String,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Bearer secret the cron scheduler sends to /api/cron/* routes
    pub cron_secret: String,
    /// API key for the hosted text-generation API
    pub generation_api_key: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            generation_api_url: env::var("GENERATION_API_URL")
                .unwrap_or_else(|_| DEFAULT_GENERATION_API_URL.to_string()),
            admin_emails: env::var("ADMIN_EMAILS")
                .map(|raw| {
                    raw.split(',')
                        .map(|e| e.trim().to_lowercase())
                        .filter(|e| !e.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),

            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            cron_secret: env::var("CRON_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("CRON_SECRET"))?,
            generation_api_key: env::var("GENERATION_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("GENERATION_API_KEY"))?,
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:3000".to_string(),
            generation_api_url: "http://localhost:9/unroutable".to_string(),
            admin_emails: vec!["admin@lunary.app".to_string()],
            port: 8080,
            database_url: "postgres://localhost:1/lunary_test_offline".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            cron_secret: "test_cron_secret".to_string(),
            generation_api_key: "test_generation_key".to_string(),
        }
    }

    /// Whether an email has admin access.
    pub fn is_admin(&self, email: Option<&str>) -> bool {
        match email {
            Some(e) => self.admin_emails.iter().any(|a| a == &e.to_lowercase()),
            None => false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_check_is_case_insensitive() {
        let mut config = Config::test_default();
        config.admin_emails = vec!["ops@lunary.app".to_string()];

        assert!(config.is_admin(Some("Ops@Lunary.app")));
        assert!(!config.is_admin(Some("someone@else.dev")));
        assert!(!config.is_admin(None));
    }

    #[test]
    fn test_config_from_env() {
        env::set_var("DATABASE_URL", "postgres://localhost/lunary");
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("CRON_SECRET", "cron_secret_value");
        env::set_var("GENERATION_API_KEY", "generation_key_value");
        env::set_var("ADMIN_EMAILS", "a@lunary.app, B@lunary.app");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.database_url, "postgres://localhost/lunary");
        assert_eq!(config.cron_secret, "cron_secret_value");
        assert_eq!(config.port, 8080);
        assert_eq!(config.admin_emails, vec!["a@lunary.app", "b@lunary.app"]);
    }
}
