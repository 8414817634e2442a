//! Domains module containing business logic organized by bounded contexts.
//!
//! - `tools`: what clients call (definitions, registry, router)
//! - `upstream`: adapters for the external services the tools depend on

pub mod tools;
pub mod upstream;
