use crate::tools::ToolCall;
use crate::transport::TransportError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;

/// Identifies one backend round-trip. Fragments tagged with an id that is
/// no longer current belong to an orphaned exchange and are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExchangeId(pub u64);

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Why a single streamed step ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinishReason {
    /// The assistant is done with the turn
    Stop,
    /// The assistant called tools and expects their results before continuing
    ToolCalls,
    /// Output was cut short (length limit, content filter, ...)
    Other,
}

/// Incremental piece of one streamed step
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    TextDelta(String),
    ToolCall(ToolCall),
    /// A result the backend already computed for a tool call
    ToolResult { tool_call_id: String, result: String },
    StepFinish { reason: FinishReason },
}

/// Events that flow through the application
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A fragment streamed by the transport for the given exchange
    Fragment { exchange: ExchangeId, fragment: Fragment },

    /// The resolver finished with a tool call
    ToolResolved {
        exchange: ExchangeId,
        tool_call_id: String,
        result: Option<String>,
    },

    /// The transport gave up on the exchange
    TransportFailed { exchange: ExchangeId, error: TransportError },
}

/// Event bus for communication between components
#[derive(Debug)]
pub struct EventBus {
    sender: mpsc::UnboundedSender<AppEvent>,
    receiver: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    /// Get a sender handle for the event bus
    pub fn sender(&self) -> EventSender {
        EventSender {
            inner: self.sender.clone(),
        }
    }

    /// Get the receiver (should only be used by the main event loop)
    pub fn into_receiver(self) -> mpsc::UnboundedReceiver<AppEvent> {
        self.receiver
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for sending events to the event bus
#[derive(Debug, Clone)]
pub struct EventSender {
    inner: mpsc::UnboundedSender<AppEvent>,
}

impl EventSender {
    /// Send an event to the bus
    pub fn send(&self, event: AppEvent) -> Result<(), EventSendError> {
        self.inner
            .send(event)
            .map_err(|_| EventSendError::ChannelClosed)
    }

    /// Send a streamed fragment
    pub fn send_fragment(&self, exchange: ExchangeId, fragment: Fragment) -> Result<(), EventSendError> {
        self.send(AppEvent::Fragment { exchange, fragment })
    }

    /// Send a tool resolution
    pub fn send_resolution(
        &self,
        exchange: ExchangeId,
        tool_call_id: String,
        result: Option<String>,
    ) -> Result<(), EventSendError> {
        self.send(AppEvent::ToolResolved { exchange, tool_call_id, result })
    }

    /// Send a transport failure
    pub fn send_failure(&self, exchange: ExchangeId, error: TransportError) -> Result<(), EventSendError> {
        self.send(AppEvent::TransportFailed { exchange, error })
    }

    /// Bind this sender to one exchange so transports only ever emit
    /// fragments for the exchange they were started with.
    pub fn fragment_sink(&self, exchange: ExchangeId) -> FragmentSink {
        FragmentSink {
            exchange,
            sender: self.clone(),
        }
    }
}

/// Sender scoped to a single exchange, handed to a transport
#[derive(Debug, Clone)]
pub struct FragmentSink {
    exchange: ExchangeId,
    sender: EventSender,
}

impl FragmentSink {
    pub fn exchange(&self) -> ExchangeId {
        self.exchange
    }

    pub fn emit(&self, fragment: Fragment) -> Result<(), EventSendError> {
        self.sender.send_fragment(self.exchange, fragment)
    }

    pub fn text(&self, text: impl Into<String>) -> Result<(), EventSendError> {
        self.emit(Fragment::TextDelta(text.into()))
    }

    pub fn tool_call(&self, call: ToolCall) -> Result<(), EventSendError> {
        self.emit(Fragment::ToolCall(call))
    }

    pub fn finish(&self, reason: FinishReason) -> Result<(), EventSendError> {
        self.emit(Fragment::StepFinish { reason })
    }
}

/// Errors that can occur when sending events
#[derive(Debug, thiserror::Error)]
pub enum EventSendError {
    #[error("Event channel is closed")]
    ChannelClosed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus() {
        let bus = EventBus::new();
        let sender = bus.sender();
        let mut receiver = bus.into_receiver();

        sender
            .send_failure(ExchangeId(3), TransportError::Network("reset".to_string()))
            .unwrap();

        let event = receiver.recv().await.unwrap();
        assert!(matches!(
            event,
            AppEvent::TransportFailed { exchange: ExchangeId(3), error: TransportError::Network(_) }
        ));
    }

    #[tokio::test]
    async fn test_fragment_sink_tags_exchange() {
        let bus = EventBus::new();
        let sink = bus.sender().fragment_sink(ExchangeId(7));
        let mut receiver = bus.into_receiver();

        sink.text("Hi").unwrap();
        sink.finish(FinishReason::Stop).unwrap();

        match receiver.recv().await.unwrap() {
            AppEvent::Fragment { exchange, fragment } => {
                assert_eq!(exchange, ExchangeId(7));
                assert_eq!(fragment, Fragment::TextDelta("Hi".to_string()));
            }
            other => panic!("Expected fragment, got {:?}", other),
        }
        match receiver.recv().await.unwrap() {
            AppEvent::Fragment { fragment, .. } => {
                assert_eq!(fragment, Fragment::StepFinish { reason: FinishReason::Stop });
            }
            other => panic!("Expected step finish, got {:?}", other),
        }
    }

    #[test]
    fn test_send_after_receiver_dropped() {
        let bus = EventBus::new();
        let sender = bus.sender();
        drop(bus.into_receiver());

        let sent = sender.send_failure(ExchangeId(1), TransportError::Network("reset".to_string()));
        assert!(matches!(sent, Err(EventSendError::ChannelClosed)));
    }
}
