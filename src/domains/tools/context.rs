//! Shared dependencies handed to every tool call.

use std::sync::Arc;

use crate::core::{Config, Error, Result};
use crate::domains::upstream::{BigQueryClient, PokeApiClient, PokemonApi, WarehouseApi};

/// Constructed once at startup and shared by all requests.
#[derive(Clone)]
pub struct ToolContext {
    config: Arc<Config>,
    pokemon: Arc<dyn PokemonApi>,
    warehouse: Arc<dyn WarehouseApi>,
}

impl ToolContext {
    /// Assemble a context from explicit adapters.
    pub fn new(
        config: Arc<Config>,
        pokemon: Arc<dyn PokemonApi>,
        warehouse: Arc<dyn WarehouseApi>,
    ) -> Self {
        Self {
            config,
            pokemon,
            warehouse,
        }
    }

    /// Build the real HTTP adapters from configuration. Both share one
    /// connection-pooled `reqwest::Client`.
    pub fn from_config(config: Arc<Config>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        let pokemon = PokeApiClient::new(http.clone(), &config.pokemon.base_url)?;
        let warehouse = BigQueryClient::new(http, &config.bigquery)?;

        Ok(Self::new(config, Arc::new(pokemon), Arc::new(warehouse)))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pokemon(&self) -> &dyn PokemonApi {
        self.pokemon.as_ref()
    }

    pub fn warehouse(&self) -> &dyn WarehouseApi {
        self.warehouse.as_ref()
    }
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext")
            .field("server", &self.config.server.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_default_config() {
        let context = ToolContext::from_config(Arc::new(Config::default()));
        assert!(context.is_ok());
    }

    #[test]
    fn test_invalid_pokeapi_url_is_config_error() {
        let mut config = Config::default();
        config.pokemon.base_url = "::not a url::".to_string();
        let result = ToolContext::from_config(Arc::new(config));
        assert!(matches!(result, Err(Error::Upstream(_))));
    }
}
