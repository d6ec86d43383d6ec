//! Effects produced by session transitions

use crate::events::ExchangeId;
use crate::tools::ToolCall;
use crate::transport::ExchangeRequest;

/// Work the session asks the outside world to do after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Open a streaming exchange with the backend
    StartExchange(ExchangeRequest),

    /// Run the tool call resolver for a newly streamed invocation
    ResolveToolCall { exchange: ExchangeId, call: ToolCall },

    /// The message list changed
    ScrollToLatest,

    /// The session is ready for the next user turn
    FocusInput,
}
