//! Portal configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! development defaults. Workflow toggles are converted into the
//! explicit `SalesSettings` struct that gets threaded into the services.

use serde::{Deserialize, Serialize};
use std::env;

use canvass_core::SalesSettings;

/// Portal configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// SQLite database file path
    pub database_path: String,

    /// JWT secret shared with the identity provider
    pub jwt_secret: String,

    /// JWT access token lifetime in seconds (for dev token minting)
    pub jwt_access_lifetime_secs: i64,

    /// When set, submitted sales skip the pending state
    pub auto_approve_sales: bool,
}

impl PortalConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = PortalConfig {
            http_port: env::var("PORTAL_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORTAL_PORT".to_string()))?,

            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "./canvass-portal.db".to_string()),

            jwt_secret: env::var("JWT_SECRET")
                // Development fallback; production MUST set this to the
                // identity provider's shared secret.
                .unwrap_or_else(|_| "canvass-dev-secret-change-in-production".to_string()),

            jwt_access_lifetime_secs: env::var("JWT_ACCESS_LIFETIME_SECS")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JWT_ACCESS_LIFETIME_SECS".to_string()))?,

            auto_approve_sales: env::var("AUTO_APPROVE_SALES")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        };

        Ok(config)
    }

    /// Workflow settings derived from this configuration.
    pub fn sales_settings(&self) -> SalesSettings {
        SalesSettings {
            auto_approve: self.auto_approve_sales,
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
