use crate::tools::validate::validate_args;
use crate::tools::types::{ToolCall, ToolName};
use async_trait::async_trait;
use tracing::{debug, warn};

pub const WEATHER_SHOWN: &str = "Weather information was shown to the user.";
pub const HACKMD_SHOWN: &str = "HackMD content was shown to the user.";

/// Acknowledges tool calls so the backend can continue a multi-step exchange.
///
/// Called exactly once per tool call. `None` means no acknowledgment is
/// needed for that call.
#[async_trait]
pub trait ToolCallResolver: Send + Sync {
    async fn resolve(&self, call: &ToolCall) -> Option<String>;
}

/// Resolver for the display-only tools: the card is the side effect, the
/// resolution just tells the backend it happened.
pub struct DisplayResolver;

impl DisplayResolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DisplayResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolCallResolver for DisplayResolver {
    async fn resolve(&self, call: &ToolCall) -> Option<String> {
        for issue in validate_args(&call.tool_name, &call.args) {
            warn!("Tool {} ({}) has malformed args: {}", call.tool_name, call.tool_call_id, issue);
        }

        match &call.tool_name {
            ToolName::ShowWeatherInformation => Some(WEATHER_SHOWN.to_string()),
            ToolName::ShowHackmdContent => Some(HACKMD_SHOWN.to_string()),
            ToolName::Other(name) => {
                debug!("No resolution for unknown tool {}", name);
                None
            }
        }
    }
}
