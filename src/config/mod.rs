use crate::core::{AppError, Currency, Result};
use serde::Deserialize;
use std::env;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    /// Currency used for plan prices and installment amounts
    pub currency: Currency,
    /// Allowed origin for the back-office frontend (CORS)
    pub frontend_origin: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                currency: env::var("APP_CURRENCY")
                    .unwrap_or_else(|_| "USD".to_string())
                    .parse()
                    .map_err(AppError::Configuration)?,
                frontend_origin: env::var("FRONTEND_ORIGIN")
                    .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Configuration(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.app.frontend_origin.is_empty() {
            return Err(AppError::Configuration(
                "Frontend origin must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
