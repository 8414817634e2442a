//! PokeAPI adapter.
//!
//! One GET per lookup against `{base}/pokemon/{name}`. No retries, no caching,
//! client default timeouts.

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{PokemonApi, UpstreamError};

/// A Pokémon as returned by PokeAPI, reduced to the fields we use.
#[derive(Debug, Clone, Deserialize)]
pub struct PokemonRecord {
    pub id: i64,
    pub name: String,
    pub weight: i64,
    #[serde(default)]
    pub types: Vec<PokemonTypeSlot>,
}

/// One entry of the `types` array.
#[derive(Debug, Clone, Deserialize)]
pub struct PokemonTypeSlot {
    #[serde(default)]
    pub slot: u32,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

/// PokeAPI `NamedAPIResource`.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl PokemonRecord {
    /// Type names in upstream order.
    pub fn type_names(&self) -> Vec<String> {
        self.types.iter().map(|t| t.kind.name.clone()).collect()
    }
}

/// HTTP client for PokeAPI.
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl PokeApiClient {
    /// Create a client for the given base URL (e.g. `https://pokeapi.co/api/v2`).
    pub fn new(http: reqwest::Client, base_url: &str) -> Result<Self, UpstreamError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| UpstreamError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { http, base_url })
    }

    /// Build `{base}/pokemon/{name}` with the name percent-encoded as one segment.
    fn pokemon_url(&self, name: &str) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("pokemon")
            .push(name);
        Ok(url)
    }
}

#[async_trait]
impl PokemonApi for PokeApiClient {
    #[instrument(skip(self))]
    async fn fetch_pokemon(&self, name: &str) -> Result<PokemonRecord, UpstreamError> {
        let url = self.pokemon_url(name)?;
        debug!("GET {}", url);

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(UpstreamError::NotFound);
        }
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<PokemonRecord>()
            .await
            .map_err(|e| UpstreamError::invalid_response(e.to_string()))
    }
}
