use crate::config::ChatConfig;
use crate::events::{EventSendError, ExchangeId, FragmentSink};
use crate::session::ChatMessage;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub mod data_stream;
pub mod http;
pub mod scripted;

pub use http::HttpTransport;
pub use scripted::{ScriptedStep, ScriptedTransport};

/// Opens streaming exchanges with the assistant backend
#[async_trait]
pub trait Transport: Send + Sync {
    /// Stream one step of the conversation into `sink`.
    ///
    /// Returns once the step has finished; an `Err` is a transport failure
    /// for the whole exchange.
    async fn stream(&self, request: ExchangeRequest, sink: FragmentSink) -> Result<(), TransportError>;

    /// Get transport information
    fn info(&self) -> TransportInfo;
}

/// One round-trip request to the backend
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRequest {
    pub exchange: ExchangeId,
    pub messages: Vec<ChatMessage>,
    pub max_steps: u32,
}

/// Information about a transport
#[derive(Debug, Clone)]
pub struct TransportInfo {
    pub name: String,
    pub description: String,
}

/// Errors that end an exchange
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Backend returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Transport configuration error: {0}")]
    Configuration(String),

    #[error("Event channel closed")]
    ChannelClosed,
}

impl From<EventSendError> for TransportError {
    fn from(_: EventSendError) -> Self {
        TransportError::ChannelClosed
    }
}

/// Factory for creating transports
pub struct TransportFactory;

impl TransportFactory {
    /// HTTP transport when an API URL is configured, the offline scripted
    /// transport otherwise.
    pub fn from_config(config: &ChatConfig) -> Result<Arc<dyn Transport>, TransportError> {
        match &config.api_url {
            Some(url) => {
                let transport = HttpTransport::new(url.clone())?;
                Ok(Arc::new(transport))
            }
            None => Ok(Self::create_scripted()),
        }
    }

    /// Offline demo transport
    pub fn create_scripted() -> Arc<dyn Transport> {
        Arc::new(ScriptedTransport::new())
    }
}
