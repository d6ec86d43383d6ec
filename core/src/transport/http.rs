//! HTTP transport for the chat backend's streaming endpoint.

use crate::events::{FinishReason, Fragment, FragmentSink};
use crate::transport::data_stream::{parse_line, request_body, LineBuffer, StreamPart};
use crate::transport::{ExchangeRequest, Transport, TransportError, TransportInfo};
use async_trait::async_trait;
use futures_util::StreamExt;
use std::time::Instant;
use tracing::{debug, warn};
use url::Url;

pub struct HttpTransport {
    info: TransportInfo,
    url: Url,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(url: Url) -> Result<Self, TransportError> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TransportError::Configuration(format!(
                "unsupported scheme for {}",
                url
            )));
        }
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError::Configuration(e.to_string()))?;

        Ok(Self {
            info: TransportInfo {
                name: "HTTP".to_string(),
                description: format!("Streaming chat backend at {}", url),
            },
            url,
            client,
        })
    }

    /// Forward one decoded part. Returns the finish reason once the response ends.
    fn forward(
        part: StreamPart,
        sink: &FragmentSink,
        last_step: &mut Option<FinishReason>,
    ) -> Result<Option<FinishReason>, TransportError> {
        match part {
            StreamPart::Text(text) => sink.text(text)?,
            StreamPart::ToolCall(call) => sink.tool_call(call)?,
            StreamPart::ToolResult { tool_call_id, result } => {
                sink.emit(Fragment::ToolResult { tool_call_id, result })?
            }
            // Server-side steps are folded into one client step
            StreamPart::StepFinish(reason) => *last_step = Some(reason),
            StreamPart::Finish(reason) => return Ok(Some(reason)),
            StreamPart::Error(message) => return Err(TransportError::Backend(message)),
            StreamPart::Ignored => {}
        }
        Ok(None)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn stream(&self, request: ExchangeRequest, sink: FragmentSink) -> Result<(), TransportError> {
        let start = Instant::now();
        let body = request_body(&request.messages);

        let resp = self
            .client
            .post(self.url.clone())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let code = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::Status { code, body });
        }

        let mut bytes = resp.bytes_stream();
        let mut buffer = LineBuffer::new();
        let mut last_step = None;
        let mut finished = None;

        'read: while let Some(chunk) = bytes.next().await {
            let chunk = chunk.map_err(|e| TransportError::Network(e.to_string()))?;
            for line in buffer.push(&chunk) {
                if let Some(reason) = Self::forward(parse_line(&line)?, &sink, &mut last_step)? {
                    finished = Some(reason);
                    break 'read;
                }
            }
        }
        if finished.is_none() {
            if let Some(line) = buffer.finish() {
                finished = Self::forward(parse_line(&line)?, &sink, &mut last_step)?;
            }
        }

        let reason = match (finished, last_step) {
            (Some(reason), _) => reason,
            (None, Some(reason)) => {
                warn!("Stream for exchange {} ended without a finish line", sink.exchange());
                reason
            }
            (None, None) => {
                return Err(TransportError::Protocol("stream ended before finishing".to_string()))
            }
        };

        debug!(
            "Exchange {} streamed in {:?} ({:?})",
            sink.exchange(),
            start.elapsed(),
            reason
        );
        sink.finish(reason)?;
        Ok(())
    }

    fn info(&self) -> TransportInfo {
        self.info.clone()
    }
}
