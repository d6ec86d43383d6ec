pub mod config;
pub mod coordinator;
pub mod effect;
pub mod events;
pub mod runtime;
pub mod session;
pub mod tools;
pub mod transport;

// Re-export main types for convenience
pub use config::{ChatConfig, ConfigError};
pub use coordinator::UiCoordinator;
pub use effect::Effect;
pub use events::{AppEvent, EventBus, EventSender, ExchangeId, FinishReason, Fragment};
pub use runtime::Runtime;
pub use session::{ActionRejected, ChatMessage, InvocationState, MessageRole, Session, Status, ToolInvocation};
pub use tools::{DisplayResolver, ToolCall, ToolCallResolver, ToolName, ToolPayload};
pub use transport::{Transport, TransportError, TransportFactory, TransportInfo};
