//! Upstream adapters.
//!
//! Thin callers of the external services behind the tools. Handlers only see
//! the [`PokemonApi`] and [`WarehouseApi`] traits, so the concrete HTTP
//! clients can be swapped for in-process fakes.

pub mod bigquery;
mod error;
pub mod pokeapi;

use async_trait::async_trait;
use serde_json::{Map, Value};

pub use bigquery::{BigQueryClient, TableMetadata, TableRef};
pub use error::UpstreamError;
pub use pokeapi::{PokeApiClient, PokemonRecord};

/// Read access to Pokémon data.
#[async_trait]
pub trait PokemonApi: Send + Sync {
    /// Fetch one Pokémon by its (already normalized) name.
    async fn fetch_pokemon(&self, name: &str) -> Result<PokemonRecord, UpstreamError>;
}

/// The data-warehouse operations the BigQuery tools need.
#[async_trait]
pub trait WarehouseApi: Send + Sync {
    /// Plan `sql` without running it; returns the bytes it would scan.
    async fn dry_run(&self, sql: &str) -> Result<u64, UpstreamError>;

    /// Run `sql` to completion and return every row, in order.
    async fn run_query(&self, sql: &str) -> Result<Vec<Map<String, Value>>, UpstreamError>;

    /// Read the metadata (schema, size, timestamps) of one table.
    async fn table_metadata(&self, table: &TableRef) -> Result<TableMetadata, UpstreamError>;
}
