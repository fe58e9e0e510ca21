//! Runtime configuration
//!
//! All credentials are read once at startup and passed into the
//! components that need them. Nothing reads process environment state
//! after this point. Missing credentials are not validated here; each
//! provider call fails with a configuration error when the credential
//! it needs is absent.

/// Configuration for the advisory (text generation) provider
#[derive(Debug, Clone, Default)]
pub struct AdvisoryConfig {
    pub api_key: Option<String>,
    /// Chat-completions endpoint override
    pub base_url: Option<String>,
    /// Model identifier sent with each request
    pub model: Option<String>,
}

/// Configuration for the flight-data provider
#[derive(Debug, Clone, Default)]
pub struct FlightConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Provider API root override
    pub base_url: Option<String>,
}

/// Top-level application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub db_path: String,
    pub advisory: AdvisoryConfig,
    pub flights: FlightConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let db_path = std::env::var("WAYFARER_DB_PATH").unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            format!("{home}/.wayfarer/wayfarer.db")
        });

        let port = std::env::var("WAYFARER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);

        Self {
            port,
            db_path,
            advisory: AdvisoryConfig {
                api_key: std::env::var("ADVISORY_API_KEY").ok(),
                base_url: std::env::var("ADVISORY_BASE_URL").ok(),
                model: std::env::var("ADVISORY_MODEL").ok(),
            },
            flights: FlightConfig {
                client_id: std::env::var("AMADEUS_API_KEY").ok(),
                client_secret: std::env::var("AMADEUS_API_SECRET").ok(),
                base_url: std::env::var("AMADEUS_BASE_URL").ok(),
            },
        }
    }
}
