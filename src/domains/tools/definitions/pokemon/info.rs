//! Pokémon lookup tool definition.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    handler::server::tool::schema_for_type,
    model::{JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::domains::tools::definitions::common::{parse_arguments, require_text, to_call_result};
use crate::domains::tools::{ToolContext, ToolError, ToolFuture};
use crate::domains::upstream::{PokemonRecord, UpstreamError};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the Pokémon lookup tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PokemonParams {
    /// Pokémon name, case-insensitive.
    #[schemars(description = "Pokémon name (case-insensitive), e.g. 'pikachu'")]
    pub name: String,
}

impl PokemonParams {
    pub fn validate(&self) -> Result<(), ToolError> {
        require_text("name", &self.name)
    }

    /// Name as PokeAPI indexes it. Surrounding whitespace is kept, so a
    /// padded name does not match.
    pub fn normalized_name(&self) -> String {
        self.name.to_lowercase()
    }
}

// ============================================================================
// Structured Output
// ============================================================================

/// Summary of one Pokémon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonInfo {
    pub id: i64,
    pub name: String,
    /// Weight in hectograms, as reported by PokeAPI.
    pub weight: i64,
    /// Type names in slot order.
    pub types: Vec<String>,
}

impl From<PokemonRecord> for PokemonInfo {
    fn from(record: PokemonRecord) -> Self {
        let types = record.type_names();
        Self {
            id: record.id,
            name: record.name,
            weight: record.weight,
            types,
        }
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Pokémon lookup tool - proxies PokeAPI.
pub struct PokemonInfoTool;

impl PokemonInfoTool {
    pub const NAME: &'static str = "get_pokemon_info";

    pub const DESCRIPTION: &'static str =
        "Obtiene información básica de un Pokémon (id, nombre, peso y tipos) desde la PokeAPI.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(name = %params.name))]
    pub async fn execute(params: &PokemonParams, context: &ToolContext) -> Result<PokemonInfo, ToolError> {
        params.validate()?;

        let normalized = params.normalized_name();
        info!("Looking up Pokémon '{}'", normalized);

        match context.pokemon().fetch_pokemon(&normalized).await {
            Ok(record) => Ok(record.into()),
            Err(UpstreamError::NotFound) => Err(ToolError::not_found(format!(
                "Pokémon '{}' no encontrado.",
                params.name
            ))),
            Err(UpstreamError::Status { status }) => {
                warn!("PokeAPI answered HTTP {} for '{}'", status, normalized);
                Err(ToolError::Upstream {
                    status,
                    message: format!("La PokeAPI respondió con el estado HTTP {status}."),
                })
            }
            Err(e) => Err(ToolError::unexpected(format!("Un error inesperado ocurrió: {e}"))),
        }
    }

    pub fn call(arguments: JsonObject, context: Arc<ToolContext>) -> ToolFuture {
        async move {
            let params: PokemonParams = parse_arguments(arguments)?;
            to_call_result(Self::execute(&params, &context).await)
        }
        .boxed()
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: Arc::new(schema_for_type::<PokemonParams>()),
            annotations: None,
            output_schema: Some(Arc::new(schema_for_type::<PokemonInfo>())),
            icons: None,
            meta: None,
            title: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::testing::{FakePokemon, context_with_pokemon, test_context};

    fn params(name: &str) -> PokemonParams {
        PokemonParams { name: name.to_string() }
    }

    #[tokio::test]
    async fn test_lookup_pikachu() {
        let context = test_context();
        let info = PokemonInfoTool::execute(&params("pikachu"), &context).await.unwrap();
        assert_eq!(
            info,
            PokemonInfo {
                id: 25,
                name: "pikachu".to_string(),
                weight: 60,
                types: vec!["electric".to_string()],
            }
        );
    }

    #[tokio::test]
    async fn test_lookup_is_case_insensitive() {
        let context = test_context();
        let upper = PokemonInfoTool::execute(&params("PIKACHU"), &context).await.unwrap();
        let mixed = PokemonInfoTool::execute(&params("Pikachu"), &context).await.unwrap();
        assert_eq!(upper, mixed);
        assert_eq!(upper.name, "pikachu");
    }

    #[tokio::test]
    async fn test_any_casing_requests_the_same_resource() {
        let pokemon = Arc::new(FakePokemon::default());
        let context = context_with_pokemon(pokemon.clone());

        for name in ["PIKACHU", "pikachu", "PiKaChU"] {
            PokemonInfoTool::execute(&params(name), &context).await.unwrap();
        }
        assert_eq!(pokemon.requested(), ["pikachu", "pikachu", "pikachu"]);
    }

    #[tokio::test]
    async fn test_padded_name_is_not_trimmed() {
        let pokemon = Arc::new(FakePokemon::default());
        let context = context_with_pokemon(pokemon.clone());

        let err = PokemonInfoTool::execute(&params(" pikachu"), &context)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "Pokémon ' pikachu' no encontrado.");
        assert_eq!(pokemon.requested(), [" pikachu"]);
    }

    #[tokio::test]
    async fn test_types_keep_upstream_order() {
        let context = test_context();
        let info = PokemonInfoTool::execute(&params("charizard"), &context).await.unwrap();
        assert_eq!(info.types, vec!["fire", "flying"]);
    }

    #[tokio::test]
    async fn test_unknown_pokemon_echoes_requested_name() {
        let context = test_context();
        let err = PokemonInfoTool::execute(&params("NotAPokemon123"), &context)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "Pokémon 'NotAPokemon123' no encontrado.");
    }

    #[tokio::test]
    async fn test_upstream_outage_is_bad_gateway() {
        let context = test_context();
        let err = PokemonInfoTool::execute(&params("missingno"), &context)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Upstream { status: 503, .. }));
        assert_eq!(err.status_code(), 502);
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let context = test_context();
        let err = PokemonInfoTool::execute(&params("  "), &context).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn test_call_reports_not_found_as_error_result() {
        let mut args = JsonObject::new();
        args.insert("name".into(), serde_json::json!("bulbasaurio"));
        let result = PokemonInfoTool::call(args, Arc::new(test_context())).await.unwrap();
        assert_eq!(result.is_error, Some(true));
    }
}
