//! HTTP transport implementation.
//!
//! One HTTP server carries both surfaces:
//! - the REST routes of every tool (see `rest`)
//! - MCP as JSON-RPC over POST requests on the configured path
//!
//! This allows standard HTTP clients (curl, browsers, etc.) and MCP clients
//! to share the same listener.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rmcp::ErrorData as McpError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, info, instrument, warn};

use super::{TransportError, TransportResult, config::HttpConfig, rest};
use crate::core::McpServer;

/// MCP protocol revision answered on `initialize`.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

type RequestId = Option<serde_json::Value>;

/// Incoming JSON-RPC 2.0 message. Notifications carry no `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: RequestId,
    pub method: String,
    #[serde(default)]
    pub params: Option<serde_json::Value>,
}

impl JsonRpcRequest {
    fn is_notification(&self) -> bool {
        self.id.is_none() && self.method.starts_with("notifications/")
    }

    fn param_str(&self, key: &str) -> Option<&str> {
        self.params.as_ref()?.get(key)?.as_str()
    }
}

/// Outgoing JSON-RPC 2.0 reply: exactly one of `result` / `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: RequestId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcError {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn invalid_request() -> Self {
        Self::new(-32600, "Invalid Request")
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(-32601, format!("Method not found: {method}"))
    }

    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::new(-32602, msg)
    }
}

impl From<McpError> for JsonRpcError {
    fn from(err: McpError) -> Self {
        Self {
            code: err.code.0,
            message: err.message.into_owned(),
            data: err.data,
        }
    }
}

impl JsonRpcResponse {
    pub fn success(id: RequestId, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: RequestId, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The server instance.
    server: McpServer,
    /// Path of the JSON-RPC endpoint, reported by `/`.
    rpc_path: String,
    /// Session state for maintaining conversation context.
    session: Arc<RwLock<Option<SessionState>>>,
}

/// Session state for a client.
#[derive(Debug, Clone)]
struct SessionState {
    initialized: bool,
    client_name: Option<String>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Build the complete application router.
    pub fn router(&self, server: McpServer) -> Router {
        let tools = rest::router(server.registry().context());

        let state = AppState {
            server,
            rpc_path: self.config.rpc_path.clone(),
            session: Arc::new(RwLock::new(None)),
        };

        let mut app = Router::new()
            .route(&self.config.rpc_path, post(handle_rpc))
            .route("/health", get(health_check))
            .route("/", get(root_handler))
            .with_state(state)
            .merge(tools);

        // Add CORS if enabled
        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app = app.layer(cors);
        }

        app.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
    }

    /// Run the HTTP transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let app = self.router(server);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!("Ready - listening on {} (CORS {})", addr, cors_status);
        info!("  → MCP:    POST {}", self.config.rpc_path);
        for (method, path) in rest::ROUTES {
            info!("  → REST:   {} {}", method, path);
        }
        info!("  → Health: GET /health");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Root handler - provides API info.
async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    let routes: Vec<String> = rest::ROUTES
        .iter()
        .map(|(method, path)| format!("{method} {path}"))
        .collect();

    Json(serde_json::json!({
        "name": state.server.name(),
        "version": state.server.version(),
        "transport": "HTTP",
        "endpoints": {
            "mcp": state.rpc_path,
            "health": "/health",
            "rest": routes
        },
        "tools": state.server.registry().tool_names(),
        "protocol": "JSON-RPC 2.0"
    }))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Handle JSON-RPC requests. Notifications are acknowledged with 202 and
/// no body.
#[instrument(skip_all, fields(method))]
async fn handle_rpc(State(state): State<AppState>, Json(request): Json<JsonRpcRequest>) -> Response {
    tracing::Span::current().record("method", &request.method);
    debug!("Received JSON-RPC request: {}", request.method);

    if request.is_notification() {
        handle_notification(&state, &request).await;
        return StatusCode::ACCEPTED.into_response();
    }

    Json(process_request(&state, request).await).into_response()
}

/// Process a JSON-RPC request and return the response.
async fn process_request(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    if request.jsonrpc != "2.0" {
        return JsonRpcResponse::failure(request.id, JsonRpcError::invalid_request());
    }

    let outcome = match request.method.as_str() {
        "initialize" => Ok(handle_initialize(state, &request).await),
        "ping" => Ok(serde_json::json!({})),
        "tools/list" => Ok(serde_json::json!({ "tools": state.server.list_tools() })),
        "tools/call" => handle_tools_call(state, &request).await,
        method if method.starts_with("notifications/") => {
            // Sent with an id: answer anyway so the client is not left waiting.
            handle_notification(state, &request).await;
            Ok(serde_json::Value::Null)
        }
        method => {
            warn!("Unknown method: {}", method);
            Err(JsonRpcError::method_not_found(method))
        }
    };

    match outcome {
        Ok(result) => JsonRpcResponse::success(request.id, result),
        Err(error) => JsonRpcResponse::failure(request.id, error),
    }
}

/// Handle initialize request.
async fn handle_initialize(state: &AppState, request: &JsonRpcRequest) -> serde_json::Value {
    let client_name = request
        .params
        .as_ref()
        .and_then(|p| p.pointer("/clientInfo/name"))
        .and_then(|v| v.as_str())
        .map(str::to_string);
    info!(
        "Initializing session for {}",
        client_name.as_deref().unwrap_or("unknown client")
    );

    let mut session = state.session.write().await;
    if session.as_ref().is_some_and(|s| s.initialized) {
        info!("Replacing an initialized session");
    }
    *session = Some(SessionState {
        initialized: false,
        client_name,
    });

    serde_json::json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": {}
        },
        "serverInfo": {
            "name": state.server.name(),
            "version": state.server.version()
        },
        "instructions": state.server.instructions()
    })
}

/// Handle tools/call request. Tool faults come back as a successful reply
/// whose result has `isError: true`.
async fn handle_tools_call(
    state: &AppState,
    request: &JsonRpcRequest,
) -> Result<serde_json::Value, JsonRpcError> {
    let name = request
        .param_str("name")
        .ok_or_else(|| JsonRpcError::invalid_params("Missing tool name"))?;
    info!("Calling tool: {}", name);

    let arguments = request
        .params
        .as_ref()
        .and_then(|p| p.get("arguments"))
        .cloned()
        .unwrap_or(serde_json::Value::Null);

    state
        .server
        .call_tool(name, arguments)
        .await
        .map_err(JsonRpcError::from)
}

/// Handle notifications (no response needed).
async fn handle_notification(state: &AppState, request: &JsonRpcRequest) {
    match request.method.as_str() {
        "notifications/initialized" => {
            let mut session = state.session.write().await;
            if let Some(ref mut s) = *session {
                s.initialized = true;
                info!(
                    "Client {} initialized",
                    s.client_name.as_deref().unwrap_or("unknown")
                );
            }
        }
        _ => {
            info!("Received notification: {}", request.method);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::testing::test_context;
    use axum::body::Body;
    use axum::http::{Request, header};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn state() -> AppState {
        AppState {
            server: McpServer::new(test_context()),
            rpc_path: "/mcp".to_string(),
            session: Arc::new(RwLock::new(None)),
        }
    }

    fn rpc(method: &str, params: Option<Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params,
        }
    }

    #[tokio::test]
    async fn test_initialize_advertises_tools_only() {
        let state = state();
        let response = process_request(&state, rpc("initialize", Some(json!({
            "clientInfo": {"name": "inspector", "version": "1.0"}
        }))))
        .await;
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert!(result["capabilities"].get("tools").is_some());
        assert!(result["capabilities"].get("resources").is_none());

        process_request(&state, rpc("notifications/initialized", None)).await;
        let session = state.session.read().await;
        assert!(session.as_ref().is_some_and(|s| s.initialized));
    }

    #[tokio::test]
    async fn test_tools_list() {
        let response = process_request(&state(), rpc("tools/list", None)).await;
        let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), 5);
        assert!(tools.iter().any(|t| t["name"] == "get_pokemon_info"));
    }

    #[tokio::test]
    async fn test_tools_call_success() {
        let params = json!({"name": "multiply_numbers", "arguments": {"a": 6, "b": 7}});
        let response = process_request(&state(), rpc("tools/call", Some(params))).await;
        let result = response.result.unwrap();
        assert_eq!(result["structuredContent"]["result"], 42.0);
        assert_eq!(result["isError"], false);
    }

    #[tokio::test]
    async fn test_tools_call_invalid_arguments() {
        let params = json!({"name": "multiply_numbers", "arguments": {"a": "six"}});
        let response = process_request(&state(), rpc("tools/call", Some(params))).await;
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_tools_call_fault_is_error_result() {
        let params = json!({"name": "estimate_bigquery_cost", "arguments": {"query": "SELECT broken"}});
        let response = process_request(&state(), rpc("tools/call", Some(params))).await;
        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
    }

    #[tokio::test]
    async fn test_ping_and_unknown_method() {
        let response = process_request(&state(), rpc("ping", None)).await;
        assert!(response.error.is_none());

        let response = process_request(&state(), rpc("resources/list", None)).await;
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn test_wrong_jsonrpc_version() {
        let mut request = rpc("ping", None);
        request.jsonrpc = "1.0".to_string();
        let response = process_request(&state(), request).await;
        assert_eq!(response.error.unwrap().code, -32600);
    }

    #[tokio::test]
    async fn test_router_serves_rest_and_mcp() {
        let transport = HttpTransport::new(HttpConfig::default());
        let app = transport.router(McpServer::new(test_context()));

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/pokemon/pikachu").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json!({"jsonrpc": "2.0", "id": 7, "method": "tools/list"});
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/mcp")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let reply: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(reply["id"], 7);

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let info: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(info["endpoints"]["mcp"], "/mcp");
        assert_eq!(info["tools"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_notification_without_id_is_accepted() {
        let transport = HttpTransport::new(HttpConfig::default());
        let app = transport.router(McpServer::new(test_context()));

        let body = json!({"jsonrpc": "2.0", "method": "notifications/initialized"});
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/mcp")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.is_empty());
    }
}
