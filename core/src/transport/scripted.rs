use super::{ExchangeRequest, Transport, TransportError, TransportInfo};
use crate::events::{FinishReason, FragmentSink};
use crate::session::{ChatMessage, MessageRole};
use crate::tools::ToolCall;
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

/// One scripted backend step
#[derive(Debug, Clone)]
pub enum ScriptedStep {
    /// Stream the text in chunks, then finish with `stop`
    Reply(String),
    /// Optional lead-in text, the tool calls, then finish with `tool-calls`
    CallTools { text: String, calls: Vec<ToolCall> },
    /// Fail the exchange
    Fail(TransportError),
}

/// Offline transport that plays back canned steps with a simulated delay.
///
/// With a queued script the steps are played in order, one per exchange.
/// Without one it improvises from the last user message.
pub struct ScriptedTransport {
    info: TransportInfo,
    delay: Duration,
    script: Mutex<VecDeque<ScriptedStep>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            info: TransportInfo {
                name: "Offline".to_string(),
                description: "Scripted assistant for trying the client without a backend".to_string(),
            },
            delay: Duration::from_millis(40), // Simulate streaming
            script: Mutex::new(VecDeque::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_script(self, steps: impl IntoIterator<Item = ScriptedStep>) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.extend(steps);
        }
        self
    }

    fn next_step(&self, messages: &[ChatMessage]) -> ScriptedStep {
        let queued = self.script.lock().ok().and_then(|mut script| script.pop_front());
        queued.unwrap_or_else(|| Self::improvise(messages))
    }

    /// Pick a step from the conversation so far
    fn improvise(messages: &[ChatMessage]) -> ScriptedStep {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();
        let lower = last_user.to_lowercase();

        // A follow-up step: the last assistant message already carries tool results
        let acknowledged = messages
            .last()
            .filter(|m| m.role == MessageRole::Assistant)
            .map(|m| m.tool_invocations.iter().filter_map(|inv| inv.result()).count())
            .unwrap_or(0);
        if acknowledged > 0 {
            return ScriptedStep::Reply(
                "Here you go! Let me know if you want suggestions for things to do nearby.".to_string(),
            );
        }

        if lower.trim() == "error" {
            return ScriptedStep::Fail(TransportError::Network("Simulated network failure".to_string()));
        }

        if lower.contains("weather") || lower.contains("天氣") {
            return ScriptedStep::CallTools {
                text: "Let me check the weather for you.\n\n".to_string(),
                calls: vec![ToolCall::new(
                    format!("call_{}", Uuid::new_v4().simple()),
                    "showWeatherInformation",
                    json!({
                        "city": "Naha",
                        "weather": "Sunny",
                        "temperature": 29,
                        "typicalWeather": "Warm and humid, with short showers in the afternoon."
                    }),
                )],
            };
        }

        if lower.contains("note") || lower.contains("hackmd") || lower.contains("行程") {
            return ScriptedStep::CallTools {
                text: String::new(),
                calls: vec![ToolCall::new(
                    format!("call_{}", Uuid::new_v4().simple()),
                    "showHackmdContent",
                    json!({
                        "content": "## Day 1\n- Shuri Castle\n- Kokusai Street\n\n## Day 2\n- Churaumi Aquarium",
                        "source": "https://hackmd.io/@okinawa/trip"
                    }),
                )],
            };
        }

        ScriptedStep::Reply(format!(
            "You asked: **{}**\n\nI'm running offline, so try asking about the *weather* or your trip *notes*.",
            last_user
        ))
    }

    /// Split text into small chunks so the UI shows it arriving
    fn chunks(text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        chars.chunks(12).map(|c| c.iter().collect()).collect()
    }

    async fn stream_text(&self, text: &str, sink: &FragmentSink) -> Result<(), TransportError> {
        for chunk in Self::chunks(text) {
            sink.text(chunk)?;
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }
        Ok(())
    }
}

impl Default for ScriptedTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn stream(&self, request: ExchangeRequest, sink: FragmentSink) -> Result<(), TransportError> {
        tokio::time::sleep(self.delay).await;

        match self.next_step(&request.messages) {
            ScriptedStep::Reply(text) => {
                self.stream_text(&text, &sink).await?;
                sink.finish(FinishReason::Stop)?;
            }
            ScriptedStep::CallTools { text, calls } => {
                self.stream_text(&text, &sink).await?;
                for call in calls {
                    sink.tool_call(call)?;
                }
                sink.finish(FinishReason::ToolCalls)?;
            }
            ScriptedStep::Fail(error) => return Err(error),
        }
        Ok(())
    }

    fn info(&self) -> TransportInfo {
        self.info.clone()
    }
}
