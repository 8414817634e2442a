//! Configuration management for the tools server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (optionally via a `.env` file) or
//! defaults.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Default PokeAPI base URL.
pub const DEFAULT_POKEAPI_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Default BigQuery REST API base URL.
pub const DEFAULT_BIGQUERY_API_URL: &str = "https://bigquery.googleapis.com/bigquery/v2";

/// On-demand BigQuery price, USD per TiB scanned.
pub const DEFAULT_USD_PER_TIB: f64 = 6.0;

/// Main configuration structure for the tools server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// PokeAPI upstream configuration.
    pub pokemon: PokemonConfig,

    /// BigQuery upstream configuration.
    pub bigquery: BigQueryConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,

    /// Instructions advertised to MCP clients on initialize.
    pub instructions: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// PokeAPI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonConfig {
    /// Base URL, without trailing slash.
    pub base_url: String,
}

/// BigQuery configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct BigQueryConfig {
    /// REST API base URL.
    pub api_url: String,

    /// Project that runs (and is billed for) query jobs.
    /// When unset, the project of the resolved credentials is used.
    pub project_id: Option<String>,

    /// Job location (e.g. "US", "EU"), if the datasets require one.
    pub location: Option<String>,

    /// Static OAuth access token. When unset, Application Default
    /// Credentials are used. Never serialized.
    #[serde(skip_serializing, default)]
    pub access_token: Option<String>,

    /// Price used for dry-run cost estimates.
    pub usd_per_tib: f64,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for BigQueryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BigQueryConfig")
            .field("api_url", &self.api_url)
            .field("project_id", &self.project_id)
            .field("location", &self.location)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("usd_per_tib", &self.usd_per_tib)
            .finish()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_timestamps: true,
        }
    }
}

impl LoggingConfig {
    /// Read only the logging variables. Used to install the subscriber
    /// before the rest of the configuration is loaded, so its warnings are
    /// not lost.
    pub fn from_env() -> Self {
        let mut logging = Self::default();

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            logging.level = level;
        }

        if let Ok(timestamps) = std::env::var("MCP_LOG_TIMESTAMPS") {
            logging.with_timestamps = timestamps.to_lowercase() != "false" && timestamps != "0";
        }

        logging
    }
}

impl Default for PokemonConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_POKEAPI_BASE_URL.to_string(),
        }
    }
}

impl Default for BigQueryConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BIGQUERY_API_URL.to_string(),
            project_id: None,
            location: None,
            access_token: None,
            usd_per_tib: DEFAULT_USD_PER_TIB,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "tools-gateway".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                instructions: "Herramientas de cálculo, Pokémon y Google BigQuery. \
                               Usa estimate_bigquery_cost antes de execute_bigquery_query: \
                               ejecutar una query puede generar costos."
                    .to_string(),
            },
            logging: LoggingConfig::default(),
            transport: TransportConfig::default(),
            pokemon: PokemonConfig::default(),
            bigquery: BigQueryConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        config.logging = LoggingConfig::from_env();

        config.transport = TransportConfig::from_env();

        if let Ok(base_url) = std::env::var("MCP_POKEAPI_BASE_URL") {
            config.pokemon.base_url = base_url.trim_end_matches('/').to_string();
        }

        if let Ok(api_url) = std::env::var("MCP_BIGQUERY_API_URL") {
            config.bigquery.api_url = api_url.trim_end_matches('/').to_string();
        }

        config.bigquery.project_id = std::env::var("MCP_BIGQUERY_PROJECT_ID")
            .or_else(|_| std::env::var("GOOGLE_CLOUD_PROJECT"))
            .ok()
            .filter(|p| !p.trim().is_empty());

        config.bigquery.location = std::env::var("MCP_BIGQUERY_LOCATION")
            .ok()
            .filter(|l| !l.trim().is_empty());

        if let Ok(token) = std::env::var("MCP_BIGQUERY_ACCESS_TOKEN") {
            config.bigquery.access_token = Some(token);
            info!("BigQuery access token loaded from environment");
        }

        if let Ok(price) = std::env::var("MCP_BIGQUERY_USD_PER_TIB") {
            match price.parse::<f64>() {
                Ok(p) if p.is_finite() && p >= 0.0 => config.bigquery.usd_per_tib = p,
                _ => warn!(
                    "Ignoring invalid MCP_BIGQUERY_USD_PER_TIB={:?}, using {}",
                    price, DEFAULT_USD_PER_TIB
                ),
            }
        }

        config
    }
}
