//! Calculator tools.

pub mod multiply;

pub use multiply::{MultiplyParams, MultiplyResult, MultiplyTool};
