//! Line-oriented data stream spoken by the chat backend.
//!
//! Each line is `<type>:<json>`. Only the parts the client acts on are
//! decoded; everything else is skipped.

use crate::events::FinishReason;
use crate::session::{ChatMessage, InvocationState};
use crate::tools::ToolCall;
use crate::transport::TransportError;
use serde::Deserialize;
use serde_json::{json, Value};

/// A decoded stream line
#[derive(Debug, Clone, PartialEq)]
pub enum StreamPart {
    Text(String),
    ToolCall(ToolCall),
    ToolResult { tool_call_id: String, result: String },
    /// One backend step ended; more may follow in the same stream
    StepFinish(FinishReason),
    /// The whole response ended
    Finish(FinishReason),
    Error(String),
    Ignored,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FinishPayload {
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ToolResultPayload {
    tool_call_id: String,
    #[serde(default)]
    result: Value,
}

/// Decode one line of the stream. Blank lines decode to `Ignored`.
pub fn parse_line(line: &str) -> Result<StreamPart, TransportError> {
    let line = line.trim_end_matches('\r');
    if line.trim().is_empty() {
        return Ok(StreamPart::Ignored);
    }
    let (kind, payload) = line
        .split_once(':')
        .ok_or_else(|| TransportError::Protocol(format!("malformed stream line: {}", truncate(line))))?;

    let part = match kind {
        "0" => StreamPart::Text(decode(payload)?),
        "9" => StreamPart::ToolCall(decode(payload)?),
        "a" => {
            let payload: ToolResultPayload = decode(payload)?;
            let result = match payload.result {
                Value::String(s) => s,
                other => other.to_string(),
            };
            StreamPart::ToolResult { tool_call_id: payload.tool_call_id, result }
        }
        "e" => StreamPart::StepFinish(finish_reason(decode(payload)?)),
        "d" => StreamPart::Finish(finish_reason(decode(payload)?)),
        "3" => StreamPart::Error(decode(payload)?),
        _ => StreamPart::Ignored,
    };
    Ok(part)
}

fn decode<T: serde::de::DeserializeOwned>(payload: &str) -> Result<T, TransportError> {
    serde_json::from_str(payload)
        .map_err(|e| TransportError::Protocol(format!("bad stream payload {}: {}", truncate(payload), e)))
}

fn finish_reason(payload: FinishPayload) -> FinishReason {
    match payload.finish_reason.as_deref() {
        Some("stop") => FinishReason::Stop,
        Some("tool-calls") => FinishReason::ToolCalls,
        _ => FinishReason::Other,
    }
}

fn truncate(s: &str) -> String {
    s.chars().take(80).collect()
}

/// Splits a byte stream into complete lines, holding back a partial tail
/// (which may end mid UTF-8 sequence) until the rest arrives.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and take every line it completes
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let rest = self.pending.split_off(pos + 1);
            let mut line = std::mem::replace(&mut self.pending, rest);
            line.pop();
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// Take whatever is left once the stream has ended
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let line = std::mem::take(&mut self.pending);
        Some(String::from_utf8_lossy(&line).into_owned())
    }
}

/// Request body for the backend. Tool invocations without an
/// acknowledgment are left out so the backend continues without them.
pub fn request_body(messages: &[ChatMessage]) -> Value {
    let messages: Vec<Value> = messages
        .iter()
        .map(|m| {
            let invocations: Vec<Value> = m
                .tool_invocations
                .iter()
                .filter_map(|inv| match &inv.state {
                    InvocationState::Resolved { result: Some(result) } => Some(json!({
                        "state": "result",
                        "toolCallId": inv.tool_call_id,
                        "toolName": inv.tool_name,
                        "args": inv.args,
                        "result": result,
                    })),
                    _ => None,
                })
                .collect();

            let mut message = json!({
                "id": m.id,
                "role": m.role,
                "content": m.content,
            });
            if !invocations.is_empty() {
                message["toolInvocations"] = Value::Array(invocations);
            }
            message
        })
        .collect();

    json!({ "messages": messages })
}
