//! Helpers shared by the tool definitions: argument parsing, result
//! conversion for MCP, and small validation/numeric utilities.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content, JsonObject},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::domains::tools::ToolError;

/// Deserialize MCP call arguments into a params struct.
pub fn parse_arguments<P: DeserializeOwned>(arguments: JsonObject) -> Result<P, McpError> {
    serde_json::from_value(serde_json::Value::Object(arguments))
        .map_err(|e| McpError::invalid_params(e.to_string(), None))
}

/// Convert a tool outcome into an MCP call result.
///
/// Success carries the output both as structured content and as JSON text.
/// Invalid arguments become a protocol error; every other failure is an
/// error result the model can read.
pub fn to_call_result<T: Serialize>(outcome: Result<T, ToolError>) -> Result<CallToolResult, McpError> {
    match outcome {
        Ok(output) => {
            let structured = serde_json::to_value(&output)
                .map_err(|e| McpError::internal_error(e.to_string(), None))?;
            let text = serde_json::to_string_pretty(&structured)
                .map_err(|e| McpError::internal_error(e.to_string(), None))?;
            Ok(CallToolResult {
                content: vec![Content::text(text)],
                structured_content: Some(structured),
                is_error: Some(false),
                meta: None,
            })
        }
        Err(ToolError::InvalidArguments(msg)) => Err(McpError::invalid_params(msg, None)),
        Err(e) => {
            warn!("Tool call failed: {}", e);
            Ok(CallToolResult::error(vec![Content::text(e.to_string())]))
        }
    }
}

/// Reject empty or whitespace-only text arguments.
pub fn require_text(field: &str, value: &str) -> Result<(), ToolError> {
    if value.trim().is_empty() {
        return Err(ToolError::invalid_arguments(format!(
            "'{field}' must not be empty"
        )));
    }
    Ok(())
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Shortest round-trip rendering. Integral values keep a `.0` (`3.0`,
/// `12.0`); very large or small magnitudes use a signed, two-digit minimum
/// exponent (`1e+16`, `1e-05`).
pub fn format_number(value: f64) -> String {
    let text = format!("{value:?}");
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => text,
    }
}
