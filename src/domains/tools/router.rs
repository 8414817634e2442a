//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! Each registry entry becomes a dynamic route, so the STDIO transport and
//! the HTTP transport dispatch to the same handlers.

use rmcp::handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter};

use super::registry::ToolRegistry;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(registry: &ToolRegistry) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    registry
        .entries()
        .fold(ToolRouter::new(), |router, entry| {
            let handler = entry.handler;
            let context = registry.context();
            router.with_route(ToolRoute::new_dyn(
                entry.tool.clone(),
                move |ctx: ToolCallContext<'_, S>| {
                    let args = ctx.arguments.clone().unwrap_or_default();
                    handler(args, context.clone())
                },
            ))
        })
}
