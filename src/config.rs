use std::env;

use thiserror::Error;

use crate::domain::cart::StockCheck;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Runtime settings, read from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub token_secret: String,
    pub token_ttl_secs: i64,
    pub stock_check: StockCheck,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing(name));

        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            None => 5000,
        };

        let token_ttl_secs = match lookup("TOKEN_TTL_SECS") {
            Some(raw) => match raw.parse::<i64>() {
                Ok(secs) if secs > 0 => secs,
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        name: "TOKEN_TTL_SECS",
                        reason: "must be positive".to_string(),
                    })
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        name: "TOKEN_TTL_SECS",
                        reason: e.to_string(),
                    })
                }
            },
            None => 3600,
        };

        let stock_check = match lookup("CART_STOCK_CHECK") {
            Some(raw) => raw.parse::<StockCheck>().map_err(|reason| ConfigError::Invalid {
                name: "CART_STOCK_CHECK",
                reason,
            })?,
            None => StockCheck::default(),
        };

        let token_secret = required("TOKEN_SECRET")?;
        if token_secret.is_empty() {
            return Err(ConfigError::Invalid {
                name: "TOKEN_SECRET",
                reason: "must not be empty".to_string(),
            });
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            token_secret,
            token_ttl_secs,
            stock_check,
        })
    }
}
