pub mod validate_tests;
pub mod resolver_tests;

// Test utilities
use crate::tools::types::ToolCall;
use serde_json::Value;

/// Test helper to build a tool call with a fixed id
pub fn call(tool_name: &str, args: Value) -> ToolCall {
    ToolCall::new("call-test", tool_name, args)
}
