// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honoured for local development.

use std::env;

const DEFAULT_AIRTABLE_API_URL: &str = "https://api.airtable.com/v0";
const DEFAULT_USERS_TABLE: &str = "neighbors";
const DEFAULT_HACKATIME_API_URL: &str = "https://hackatime.hackclub.com/api/v1";
const DEFAULT_HACKATIME_START_DATE: &str = "2025-04-30";
const DEFAULT_LOOPS_API_URL: &str = "https://app.loops.so/api/v1";
const DEFAULT_OTP_TRANSACTIONAL_ID: &str = "cma76zj24015peh6e3ipy52yq";

/// Which record store implementation to build at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Airtable,
    /// In-process store; data is lost on restart.
    Memory,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Record store ---
    pub store_backend: StoreBackend,
    /// Airtable REST base URL
    pub airtable_api_url: String,
    pub airtable_api_key: String,
    pub airtable_base_id: String,
    /// Table holding neighbor (user) records
    pub users_table: String,

    // --- Third-party services ---
    pub hackatime_api_url: String,
    /// First day counted in Hackatime stats (YYYY-MM-DD)
    pub hackatime_start_date: String,
    pub loops_api_url: String,
    pub loops_auth_token: String,
    pub loops_otp_transactional_id: String,

    // --- Server ---
    /// Frontend origin allowed by CORS
    pub frontend_url: String,
    pub port: u16,
}

impl Config {
    /// Config for tests: in-memory store, local service URLs.
    pub fn test_default() -> Self {
        Self {
            store_backend: StoreBackend::Memory,
            airtable_api_url: "http://127.0.0.1:1/v0".to_string(),
            airtable_api_key: "test_key".to_string(),
            airtable_base_id: "appTest".to_string(),
            users_table: DEFAULT_USERS_TABLE.to_string(),
            hackatime_api_url: "http://127.0.0.1:1/api/v1".to_string(),
            hackatime_start_date: DEFAULT_HACKATIME_START_DATE.to_string(),
            loops_api_url: "http://127.0.0.1:1/api/v1".to_string(),
            loops_auth_token: "test_loops_token".to_string(),
            loops_otp_transactional_id: DEFAULT_OTP_TRANSACTIONAL_ID.to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            port: 8080,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let store_backend = match env::var("STORE_BACKEND").as_deref() {
            Ok("memory") => StoreBackend::Memory,
            Ok("airtable") | Err(_) => StoreBackend::Airtable,
            Ok(other) => return Err(ConfigError::Invalid("STORE_BACKEND", other.to_string())),
        };

        // Credentials are only mandatory when talking to Airtable
        let required = |name: &'static str| -> Result<String, ConfigError> {
            match (env::var(name), store_backend) {
                (Ok(v), _) => Ok(v.trim().to_string()),
                (Err(_), StoreBackend::Memory) => Ok(String::new()),
                (Err(_), StoreBackend::Airtable) => Err(ConfigError::Missing(name)),
            }
        };

        Ok(Self {
            store_backend,
            airtable_api_url: env_or("AIRTABLE_API_URL", DEFAULT_AIRTABLE_API_URL),
            airtable_api_key: required("AIRTABLE_API_KEY")?,
            airtable_base_id: required("AIRTABLE_BASE_ID")?,
            users_table: env_or("AIRTABLE_TABLE_ID", DEFAULT_USERS_TABLE),
            hackatime_api_url: env_or("HACKATIME_API_URL", DEFAULT_HACKATIME_API_URL),
            hackatime_start_date: env_or("HACKATIME_START_DATE", DEFAULT_HACKATIME_START_DATE),
            loops_api_url: env_or("LOOPS_API_URL", DEFAULT_LOOPS_API_URL),
            loops_auth_token: env::var("LOOPS_AUTH_TOKEN")
                .map(|v| v.trim().to_string())
                .unwrap_or_default(),
            loops_otp_transactional_id: env_or(
                "LOOPS_OTP_TRANSACTIONAL_ID",
                DEFAULT_OTP_TRANSACTIONAL_ID,
            ),
            frontend_url: env_or("FRONTEND_URL", "http://localhost:3000"),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
