//! REST routes, one per tool.
//!
//! Handlers call the same `execute()` functions as the MCP surface and map
//! `ToolError` to HTTP statuses through [`ApiError`].

mod error;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRequest, FromRequestParts, State},
    routing::{get, post},
};
pub use error::ApiError;

use crate::domains::tools::ToolContext;
use crate::domains::tools::definitions::{
    BigQueryRequest, DryRunResult, EstimateCostTool, ExecuteQueryTool, MultiplyParams,
    MultiplyResult, MultiplyTool, PokemonInfo, PokemonInfoTool, PokemonParams, QueryResult,
    TableSchemaRequest, TableSchemaResult, TableSchemaTool,
};

/// REST routes exposed next to the MCP endpoint.
pub const ROUTES: &[(&str, &str)] = &[
    ("GET", "/calculator/multiply"),
    ("GET", "/pokemon/{name}"),
    ("POST", "/bigquery/estimate-cost"),
    ("POST", "/bigquery/execute-query"),
    ("POST", "/bigquery/get-table-schema"),
];

/// JSON body extractor whose rejections become 422 `ApiError`s.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ValidJson<T>(pub T);

/// Query string extractor whose rejections become 422 `ApiError`s.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ValidQuery<T>(pub T);

/// Path parameter extractor whose rejections become 422 `ApiError`s.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ValidPath<T>(pub T);

type Ctx = State<Arc<ToolContext>>;

/// Build the REST router over the shared tool context.
pub fn router(context: Arc<ToolContext>) -> Router {
    Router::new()
        .route("/calculator/multiply", get(multiply))
        .route("/pokemon/{name}", get(pokemon_info))
        .route("/bigquery/estimate-cost", post(estimate_cost))
        .route("/bigquery/execute-query", post(execute_query))
        .route("/bigquery/get-table-schema", post(table_schema))
        .with_state(context)
}

async fn multiply(ValidQuery(params): ValidQuery<MultiplyParams>) -> Result<Json<MultiplyResult>, ApiError> {
    Ok(Json(MultiplyTool::execute(&params)?))
}

async fn pokemon_info(
    State(context): Ctx,
    ValidPath(name): ValidPath<String>,
) -> Result<Json<PokemonInfo>, ApiError> {
    let params = PokemonParams { name };
    Ok(Json(PokemonInfoTool::execute(&params, &context).await?))
}

async fn estimate_cost(
    State(context): Ctx,
    ValidJson(request): ValidJson<BigQueryRequest>,
) -> Result<Json<DryRunResult>, ApiError> {
    Ok(Json(EstimateCostTool::execute(&request, &context).await?))
}

async fn execute_query(
    State(context): Ctx,
    ValidJson(request): ValidJson<BigQueryRequest>,
) -> Result<Json<QueryResult>, ApiError> {
    Ok(Json(ExecuteQueryTool::execute(&request, &context).await?))
}

async fn table_schema(
    State(context): Ctx,
    ValidJson(request): ValidJson<TableSchemaRequest>,
) -> Result<Json<TableSchemaResult>, ApiError> {
    Ok(Json(TableSchemaTool::execute(&request, &context).await?))
}
