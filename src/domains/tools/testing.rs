//! In-process fakes for tool tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::ToolContext;
use crate::core::Config;
use crate::domains::upstream::bigquery::TableFieldSchema;
use crate::domains::upstream::pokeapi::{NamedResource, PokemonTypeSlot};
use crate::domains::upstream::{
    PokemonApi, PokemonRecord, TableMetadata, TableRef, UpstreamError, WarehouseApi,
};

/// Knows pikachu and charizard; `missingno` simulates an upstream outage.
/// Records every name it is asked for.
#[derive(Default)]
pub struct FakePokemon {
    requested: Mutex<Vec<String>>,
}

impl FakePokemon {
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PokemonApi for FakePokemon {
    async fn fetch_pokemon(&self, name: &str) -> Result<PokemonRecord, UpstreamError> {
        self.requested.lock().unwrap().push(name.to_string());
        let (id, weight, types): (i64, i64, &[&str]) = match name {
            "pikachu" => (25, 60, &["electric"]),
            "charizard" => (6, 905, &["fire", "flying"]),
            "missingno" => return Err(UpstreamError::Status { status: 503 }),
            _ => return Err(UpstreamError::NotFound),
        };
        Ok(PokemonRecord {
            id,
            name: name.to_string(),
            weight,
            types: types
                .iter()
                .enumerate()
                .map(|(i, t)| PokemonTypeSlot {
                    slot: i as u32 + 1,
                    kind: NamedResource {
                        name: t.to_string(),
                        url: None,
                    },
                })
                .collect(),
        })
    }
}

/// Canned warehouse. SQL containing `broken` is rejected by the "API";
/// SQL containing `offline` fails as a transport problem.
pub struct FakeWarehouse {
    pub bytes: u64,
    pub rows: Vec<Map<String, Value>>,
    pub table: TableMetadata,
}

impl Default for FakeWarehouse {
    fn default() -> Self {
        Self {
            bytes: 1_099_511_627_776,
            rows: Vec::new(),
            table: TableMetadata::default(),
        }
    }
}

fn fail_for(sql: &str) -> Option<UpstreamError> {
    if sql.contains("broken") {
        Some(UpstreamError::Api {
            status: 400,
            message: "Syntax error: Unexpected identifier \"broken\" at [1:1]".to_string(),
        })
    } else if sql.contains("offline") {
        Some(UpstreamError::invalid_response("connection reset by peer"))
    } else {
        None
    }
}

#[async_trait]
impl WarehouseApi for FakeWarehouse {
    async fn dry_run(&self, sql: &str) -> Result<u64, UpstreamError> {
        match fail_for(sql) {
            Some(err) => Err(err),
            None => Ok(self.bytes),
        }
    }

    async fn run_query(&self, sql: &str) -> Result<Vec<Map<String, Value>>, UpstreamError> {
        match fail_for(sql) {
            Some(err) => Err(err),
            None => Ok(self.rows.clone()),
        }
    }

    async fn table_metadata(&self, table: &TableRef) -> Result<TableMetadata, UpstreamError> {
        if table.table_id == "missing" {
            return Err(UpstreamError::Api {
                status: 404,
                message: format!("Not found: Table {}:{}.{}", table.project_id, table.dataset_id, table.table_id),
            });
        }
        Ok(self.table.clone())
    }
}

pub fn field(name: &str, field_type: &str, mode: Option<&str>, description: Option<&str>) -> TableFieldSchema {
    TableFieldSchema {
        name: name.to_string(),
        field_type: field_type.to_string(),
        mode: mode.map(str::to_string),
        description: description.map(str::to_string),
        fields: Vec::new(),
    }
}

pub fn context_with(warehouse: FakeWarehouse) -> ToolContext {
    ToolContext::new(
        Arc::new(Config::default()),
        Arc::new(FakePokemon::default()),
        Arc::new(warehouse),
    )
}

pub fn context_with_pokemon(pokemon: Arc<FakePokemon>) -> ToolContext {
    ToolContext::new(
        Arc::new(Config::default()),
        pokemon,
        Arc::new(FakeWarehouse::default()),
    )
}

pub fn test_context() -> ToolContext {
    context_with(FakeWarehouse::default())
}
