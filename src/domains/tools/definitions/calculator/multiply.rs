//! Multiply tool definition.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    handler::server::tool::schema_for_type,
    model::{JsonObject, Tool},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::domains::tools::definitions::common::{format_number, parse_arguments, to_call_result};
use crate::domains::tools::{ToolContext, ToolError, ToolFuture};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the multiply tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MultiplyParams {
    /// First factor.
    #[schemars(description = "First factor (any real number)")]
    pub a: f64,

    /// Second factor.
    #[schemars(description = "Second factor (any real number)")]
    pub b: f64,
}

impl MultiplyParams {
    /// Both factors must be finite.
    pub fn validate(&self) -> Result<(), ToolError> {
        for (name, value) in [("a", self.a), ("b", self.b)] {
            if !value.is_finite() {
                return Err(ToolError::invalid_arguments(format!(
                    "'{name}' must be a finite number"
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Structured Output
// ============================================================================

/// Product of the two factors plus a sentence restating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MultiplyResult {
    pub result: f64,
    pub description: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Multiply tool - multiplies two numbers.
pub struct MultiplyTool;

impl MultiplyTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "multiply_numbers";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Multiplica dos números y devuelve el resultado.";

    /// Execute the tool logic.
    #[instrument(skip_all, fields(a = params.a, b = params.b))]
    pub fn execute(params: &MultiplyParams) -> Result<MultiplyResult, ToolError> {
        params.validate()?;

        let product = params.a * params.b;
        if !product.is_finite() {
            return Err(ToolError::unexpected(format!(
                "El producto de {} y {} no es un número finito.",
                format_number(params.a),
                format_number(params.b)
            )));
        }
        info!("Multiply tool called: {} * {} = {}", params.a, params.b, product);

        Ok(MultiplyResult {
            result: product,
            description: format!(
                "El producto de {} y {} es {}.",
                format_number(params.a),
                format_number(params.b),
                format_number(product)
            ),
        })
    }

    /// MCP handler registered in the tool registry.
    pub fn call(arguments: JsonObject, _context: Arc<ToolContext>) -> ToolFuture {
        async move {
            let params: MultiplyParams = parse_arguments(arguments)?;
            to_call_result(Self::execute(&params))
        }
        .boxed()
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: Arc::new(schema_for_type::<MultiplyParams>()),
            annotations: None,
            output_schema: Some(Arc::new(schema_for_type::<MultiplyResult>())),
            icons: None,
            meta: None,
            title: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn multiply(a: f64, b: f64) -> MultiplyResult {
        MultiplyTool::execute(&MultiplyParams { a, b }).unwrap()
    }

    #[test]
    fn test_multiply_integers() {
        let result = multiply(3.0, 4.0);
        assert_eq!(result.result, 12.0);
        assert_eq!(result.description, "El producto de 3.0 y 4.0 es 12.0.");
    }

    #[test]
    fn test_multiply_negative_and_fractional() {
        let result = multiply(-2.5, 0.4);
        assert_eq!(result.result, -2.5 * 0.4);
        assert!(result.description.contains("-2.5"));
        assert!(result.description.contains("0.4"));
        assert!(result.description.contains(&format_number(-2.5 * 0.4)));
    }

    #[test]
    fn test_multiply_matches_float_product() {
        for (a, b) in [(0.1, 0.2), (1e10, 3.3), (-7.0, -6.0), (0.0, 123.456)] {
            let result = multiply(a, b);
            assert_eq!(result.result, a * b);
            assert!(result.description.contains(&format_number(a)));
            assert!(result.description.contains(&format_number(b)));
        }
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let result = MultiplyTool::execute(&MultiplyParams { a: f64::NAN, b: 1.0 });
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));

        let result = MultiplyTool::execute(&MultiplyParams { a: 1.0, b: f64::INFINITY });
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[test]
    fn test_overflowing_product_is_unexpected() {
        let result = MultiplyTool::execute(&MultiplyParams { a: 1e308, b: 10.0 });
        match result {
            Err(err @ ToolError::Unexpected(_)) => {
                assert_eq!(err.status_code(), 500);
                assert_eq!(err.to_string(), "El producto de 1e+308 y 10.0 no es un número finito.");
            }
            other => panic!("Expected unexpected error, got {:?}", other),
        }
    }

    #[test]
    fn test_exponent_form_in_description() {
        let result = multiply(1e16, 1.0);
        assert_eq!(result.description, "El producto de 1e+16 y 1.0 es 1e+16.");
    }

    #[test]
    fn test_to_tool_has_both_schemas() {
        let tool = MultiplyTool::to_tool();
        assert_eq!(tool.name, "multiply_numbers");
        assert!(tool.input_schema.contains_key("properties"));
        assert!(tool.output_schema.is_some());
    }

    #[tokio::test]
    async fn test_call_via_mcp_arguments() {
        let mut args = JsonObject::new();
        args.insert("a".into(), serde_json::json!(3));
        args.insert("b".into(), serde_json::json!(4));

        let context = Arc::new(crate::domains::tools::testing::test_context());
        let result = MultiplyTool::call(args, context).await.unwrap();
        assert_eq!(result.is_error, Some(false));
        assert_eq!(
            result.structured_content.unwrap()["result"],
            serde_json::json!(12.0)
        );
    }
}
