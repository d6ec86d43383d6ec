pub mod types;
pub mod validate;
pub mod resolver;

#[cfg(test)]
pub mod tests;

pub use types::*;
pub use validate::{validate_args, ArgIssue};
pub use resolver::{DisplayResolver, ToolCallResolver};
