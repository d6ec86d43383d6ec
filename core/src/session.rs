use crate::effect::Effect;
use crate::events::{AppEvent, ExchangeId, FinishReason, Fragment};
use crate::tools::{ToolCall, ToolName, ToolPayload};
use crate::transport::{ExchangeRequest, TransportError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Default cap on backend round-trips per user turn
pub const DEFAULT_MAX_STEPS: u32 = 5;

/// Who sent the message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

/// Resolution state of a tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum InvocationState {
    Pending,
    /// `result: None` means the resolver declined to acknowledge the call
    Resolved { result: Option<String> },
}

/// A single tool call attached to an assistant message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInvocation {
    pub tool_call_id: String,
    pub tool_name: ToolName,
    pub args: Value,
    #[serde(flatten)]
    pub state: InvocationState,
}

impl ToolInvocation {
    fn pending(call: ToolCall) -> Self {
        Self {
            tool_call_id: call.tool_call_id,
            tool_name: call.tool_name,
            args: call.args,
            state: InvocationState::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state == InvocationState::Pending
    }

    /// What this invocation renders as
    pub fn payload(&self) -> ToolPayload {
        ToolPayload::from_call(&self.tool_name, &self.args)
    }

    /// The acknowledgment text, if one was produced
    pub fn result(&self) -> Option<&str> {
        match &self.state {
            InvocationState::Resolved { result } => result.as_deref(),
            InvocationState::Pending => None,
        }
    }
}

/// One turn in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_invocations: Vec<ToolInvocation>,
}

impl ChatMessage {
    fn new(role: MessageRole, content: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content,
            tool_invocations: Vec::new(),
        }
    }
}

/// Session status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Ready for the next user turn
    Idle,
    /// Waiting for the first fragment of an exchange
    Submitted,
    Streaming,
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Idle => "ready",
            Status::Submitted => "submitted",
            Status::Streaming => "streaming",
            Status::Error => "error",
        };
        f.write_str(label)
    }
}

/// Why a user action was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionRejected {
    #[error("Nothing to send")]
    EmptyInput,
    #[error("A response is still in progress ({0})")]
    Busy(Status),
    #[error("Retry is only available after an error")]
    NotInError,
    #[error("No user message to retry")]
    NothingToRetry,
}

/// Conversation state: ordered messages plus the status machine.
///
/// Every transition returns the effects it needs; the session itself never
/// performs I/O.
#[derive(Debug)]
pub struct Session {
    messages: Vec<ChatMessage>,
    status: Status,
    input: String,
    step_count: u32,
    max_steps: u32,
    last_error: Option<TransportError>,

    /// Last exchange id handed out; never reset so stale ids stay stale
    exchange_counter: u64,
    current_exchange: Option<ExchangeId>,
    /// Index of the assistant message being streamed for this turn
    turn_message: Option<usize>,
    /// Tool calls streamed during the current step
    step_calls: Vec<String>,
    /// Set once the current step has finished streaming
    finished_step: Option<FinishReason>,
}

impl Session {
    /// Create an empty session
    pub fn new(max_steps: u32) -> Self {
        Self {
            messages: Vec::new(),
            status: Status::Idle,
            input: String::new(),
            step_count: 0,
            max_steps: max_steps.max(1),
            last_error: None,
            exchange_counter: 0,
            current_exchange: None,
            turn_message: None,
            step_calls: Vec::new(),
            finished_step: None,
        }
    }

    /// Get all messages in the session
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status == Status::Idle
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    pub fn max_steps(&self) -> u32 {
        self.max_steps
    }

    pub fn last_error(&self) -> Option<&TransportError> {
        self.last_error.as_ref()
    }

    pub fn current_exchange(&self) -> Option<ExchangeId> {
        self.current_exchange
    }

    /// Submit the input buffer as a new user turn
    pub fn submit(&mut self) -> Result<Vec<Effect>, ActionRejected> {
        if self.status != Status::Idle {
            return Err(ActionRejected::Busy(self.status));
        }
        let text = self.input.trim();
        if text.is_empty() {
            return Err(ActionRejected::EmptyInput);
        }

        let message = ChatMessage::new(MessageRole::User, text.to_string());
        debug!("Submitting user message {}", message.id);
        self.messages.push(message);
        self.input.clear();
        self.step_count = 1;
        self.turn_message = None;

        let mut effects = vec![self.start_exchange()];
        effects.push(Effect::ScrollToLatest);
        Ok(effects)
    }

    /// Re-issue the failed turn from the existing history
    pub fn retry(&mut self) -> Result<Vec<Effect>, ActionRejected> {
        if self.status != Status::Error {
            return Err(ActionRejected::NotInError);
        }
        let last_user = self
            .messages
            .iter()
            .rposition(|m| m.role == MessageRole::User)
            .ok_or(ActionRejected::NothingToRetry)?;

        // The partial reply of the failed turn is replaced by the retried one
        self.messages.truncate(last_user + 1);
        self.last_error = None;
        self.step_count = 1;
        self.turn_message = None;
        info!("Retrying turn from message {}", self.messages[last_user].id);

        let mut effects = vec![self.start_exchange()];
        effects.push(Effect::ScrollToLatest);
        Ok(effects)
    }

    /// Start a new conversation. Any in-flight exchange is orphaned.
    pub fn reset(&mut self) -> Vec<Effect> {
        if let Some(exchange) = self.current_exchange.take() {
            debug!("Orphaning exchange {}", exchange);
        }
        self.messages.clear();
        self.input.clear();
        self.status = Status::Idle;
        self.step_count = 0;
        self.last_error = None;
        self.turn_message = None;
        self.step_calls.clear();
        self.finished_step = None;
        vec![Effect::ScrollToLatest, Effect::FocusInput]
    }

    /// Apply an event from the bus
    pub fn apply(&mut self, event: AppEvent) -> Vec<Effect> {
        match event {
            AppEvent::Fragment { exchange, fragment } => self.handle_fragment(exchange, fragment),
            AppEvent::ToolResolved { exchange, tool_call_id, result } => {
                self.handle_resolution(exchange, &tool_call_id, result)
            }
            AppEvent::TransportFailed { exchange, error } => self.handle_failure(exchange, error),
        }
    }

    /// Apply one streamed fragment
    pub fn handle_fragment(&mut self, exchange: ExchangeId, fragment: Fragment) -> Vec<Effect> {
        if !self.is_current(exchange) {
            debug!("Dropping fragment for orphaned exchange {}", exchange);
            return Vec::new();
        }
        if self.finished_step.is_some() {
            warn!("Fragment after step finish on exchange {}, ignoring", exchange);
            return Vec::new();
        }

        match fragment {
            Fragment::TextDelta(text) => {
                let index = self.begin_streaming();
                self.messages[index].content.push_str(&text);
                vec![Effect::ScrollToLatest]
            }
            Fragment::ToolCall(call) => {
                let index = self.begin_streaming();
                let message = &mut self.messages[index];
                if message
                    .tool_invocations
                    .iter()
                    .any(|inv| inv.tool_call_id == call.tool_call_id)
                {
                    warn!("Duplicate tool call {} ignored", call.tool_call_id);
                    return Vec::new();
                }
                debug!("Tool call {} ({})", call.tool_call_id, call.tool_name);
                self.step_calls.push(call.tool_call_id.clone());
                message.tool_invocations.push(ToolInvocation::pending(call.clone()));
                vec![
                    Effect::ResolveToolCall { exchange, call },
                    Effect::ScrollToLatest,
                ]
            }
            Fragment::ToolResult { tool_call_id, result } => {
                if self.settle(&tool_call_id, Some(result)) {
                    vec![Effect::ScrollToLatest]
                } else {
                    Vec::new()
                }
            }
            Fragment::StepFinish { reason } => {
                debug!("Step {} finished: {:?}", self.step_count, reason);
                self.finished_step = Some(reason);
                self.advance()
            }
        }
    }

    /// Record the resolver's answer for a tool call
    pub fn handle_resolution(
        &mut self,
        exchange: ExchangeId,
        tool_call_id: &str,
        result: Option<String>,
    ) -> Vec<Effect> {
        if !self.is_current(exchange) {
            debug!("Dropping resolution of {} for orphaned exchange {}", tool_call_id, exchange);
            return Vec::new();
        }
        let mut effects = Vec::new();
        if self.settle(tool_call_id, result) {
            effects.push(Effect::ScrollToLatest);
        }
        effects.extend(self.advance());
        effects
    }

    /// The transport gave up on the current exchange
    pub fn handle_failure(&mut self, exchange: ExchangeId, error: TransportError) -> Vec<Effect> {
        if !self.is_current(exchange) {
            debug!("Dropping failure for orphaned exchange {}: {}", exchange, error);
            return Vec::new();
        }
        tracing::error!("Exchange {} failed: {}", exchange, error);
        self.status = Status::Error;
        self.last_error = Some(error);
        self.current_exchange = None;
        self.turn_message = None;
        self.step_calls.clear();
        self.finished_step = None;
        vec![Effect::ScrollToLatest]
    }

    fn is_current(&self, exchange: ExchangeId) -> bool {
        self.current_exchange == Some(exchange)
    }

    fn start_exchange(&mut self) -> Effect {
        self.exchange_counter += 1;
        let exchange = ExchangeId(self.exchange_counter);
        self.current_exchange = Some(exchange);
        self.status = Status::Submitted;
        self.step_calls.clear();
        self.finished_step = None;
        debug!("Starting exchange {} (step {}/{})", exchange, self.step_count, self.max_steps);
        Effect::StartExchange(ExchangeRequest {
            exchange,
            messages: self.messages.clone(),
            max_steps: self.max_steps,
        })
    }

    /// Enter streaming and return the index of this turn's assistant message
    fn begin_streaming(&mut self) -> usize {
        if self.status == Status::Submitted {
            self.status = Status::Streaming;
        }
        match self.turn_message {
            Some(index) => index,
            None => {
                self.messages.push(ChatMessage::new(MessageRole::Assistant, String::new()));
                let index = self.messages.len() - 1;
                self.turn_message = Some(index);
                index
            }
        }
    }

    /// Resolve a pending invocation of the current step. Later answers for
    /// the same call are ignored.
    fn settle(&mut self, tool_call_id: &str, result: Option<String>) -> bool {
        let Some(index) = self.turn_message else {
            return false;
        };
        let Some(invocation) = self.messages[index]
            .tool_invocations
            .iter_mut()
            .find(|inv| inv.tool_call_id == tool_call_id)
        else {
            debug!("Resolution for unknown tool call {}", tool_call_id);
            return false;
        };
        if !invocation.is_pending() {
            debug!("Tool call {} already resolved", tool_call_id);
            return false;
        }
        invocation.state = InvocationState::Resolved { result };
        true
    }

    fn pending_in_step(&self) -> usize {
        let Some(index) = self.turn_message else {
            return 0;
        };
        self.messages[index]
            .tool_invocations
            .iter()
            .filter(|inv| inv.is_pending() && self.step_calls.contains(&inv.tool_call_id))
            .count()
    }

    /// Decide what follows a finished step once its tool calls are settled
    fn advance(&mut self) -> Vec<Effect> {
        let Some(reason) = self.finished_step else {
            return Vec::new();
        };
        let wants_follow_up = reason == FinishReason::ToolCalls && !self.step_calls.is_empty();

        // The turn stays open until every call of this step has an answer
        if self.pending_in_step() > 0 {
            return Vec::new();
        }
        if wants_follow_up && self.step_count >= self.max_steps {
            info!("Step limit {} reached, finalizing turn without a follow-up", self.max_steps);
            return self.complete_turn();
        }
        if wants_follow_up {
            self.step_count += 1;
            return vec![self.start_exchange()];
        }
        self.complete_turn()
    }

    fn complete_turn(&mut self) -> Vec<Effect> {
        debug!("Turn complete after {} step(s)", self.step_count);
        self.status = Status::Idle;
        self.step_count = 0;
        self.current_exchange = None;
        self.turn_message = None;
        self.step_calls.clear();
        self.finished_step = None;
        vec![Effect::FocusInput, Effect::ScrollToLatest]
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STEPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn started_exchange(effects: &[Effect]) -> ExchangeId {
        effects
            .iter()
            .find_map(|e| match e {
                Effect::StartExchange(req) => Some(req.exchange),
                _ => None,
            })
            .expect("Expected StartExchange effect")
    }

    fn submit(session: &mut Session, text: &str) -> ExchangeId {
        session.set_input(text);
        let effects = session.submit().unwrap();
        started_exchange(&effects)
    }

    fn text(session: &mut Session, exchange: ExchangeId, t: &str) -> Vec<Effect> {
        session.handle_fragment(exchange, Fragment::TextDelta(t.to_string()))
    }

    fn finish(session: &mut Session, exchange: ExchangeId, reason: FinishReason) -> Vec<Effect> {
        session.handle_fragment(exchange, Fragment::StepFinish { reason })
    }

    fn weather_call(id: &str) -> ToolCall {
        ToolCall::new(
            id,
            "showWeatherInformation",
            json!({ "city": "Naha", "weather": "Sunny", "temperature": 29 }),
        )
    }

    #[test]
    fn test_simple_turn() {
        let mut session = Session::default();
        let exchange = submit(&mut session, "Hello");
        assert_eq!(session.status(), Status::Submitted);
        assert_eq!(session.step_count(), 1);
        assert!(session.input().is_empty());

        text(&mut session, exchange, "Hi ");
        assert_eq!(session.status(), Status::Streaming);
        text(&mut session, exchange, "there");

        let effects = finish(&mut session, exchange, FinishReason::Stop);
        assert_eq!(session.status(), Status::Idle);
        assert_eq!(session.step_count(), 0);
        assert!(effects.contains(&Effect::FocusInput));

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].content, "Hello");
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(messages[1].content, "Hi there");
        assert_ne!(messages[0].id, messages[1].id);
    }

    #[test]
    fn test_blank_input_is_rejected() {
        let mut session = Session::default();
        session.set_input("   \n\t");
        assert_eq!(session.submit(), Err(ActionRejected::EmptyInput));
        assert_eq!(session.status(), Status::Idle);
        assert!(session.messages().is_empty());
        assert_eq!(session.input(), "   \n\t");
    }

    #[test]
    fn test_submit_while_busy_is_rejected() {
        let mut session = Session::default();
        let exchange = submit(&mut session, "Hello");
        text(&mut session, exchange, "Hi");

        session.set_input("Another question");
        assert_eq!(session.submit(), Err(ActionRejected::Busy(Status::Streaming)));
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.input(), "Another question");
    }

    #[test]
    fn test_tool_call_follow_up() {
        let mut session = Session::default();
        let first = submit(&mut session, "Weather in Naha?");

        let effects = session.handle_fragment(first, Fragment::ToolCall(weather_call("call-1")));
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::ResolveToolCall { call, .. } if call.tool_call_id == "call-1"
        )));

        // Step ends before the resolver answers: wait
        let effects = finish(&mut session, first, FinishReason::ToolCalls);
        assert!(effects.is_empty());
        assert_eq!(session.status(), Status::Streaming);
        assert_eq!(session.step_count(), 1);

        let effects = session.handle_resolution(
            first,
            "call-1",
            Some("Weather information was shown to the user.".to_string()),
        );
        let second = started_exchange(&effects);
        assert_ne!(first, second);
        assert_eq!(session.status(), Status::Submitted);
        assert_eq!(session.step_count(), 2);

        // The follow-up request carries the resolution
        let request = effects
            .iter()
            .find_map(|e| match e {
                Effect::StartExchange(req) => Some(req),
                _ => None,
            })
            .unwrap();
        let invocation = &request.messages[1].tool_invocations[0];
        assert_eq!(invocation.result(), Some("Weather information was shown to the user."));

        text(&mut session, second, "It is sunny in Naha.");
        finish(&mut session, second, FinishReason::Stop);
        assert_eq!(session.status(), Status::Idle);
        assert_eq!(session.step_count(), 0);

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].content, "It is sunny in Naha.");
        assert_eq!(messages[1].tool_invocations.len(), 1);
    }

    #[test]
    fn test_resolution_before_step_finish() {
        let mut session = Session::default();
        let first = submit(&mut session, "Weather?");
        session.handle_fragment(first, Fragment::ToolCall(weather_call("call-1")));
        let effects = session.handle_resolution(first, "call-1", Some("ok".to_string()));
        assert!(!effects.iter().any(|e| matches!(e, Effect::StartExchange(_))));

        let effects = finish(&mut session, first, FinishReason::ToolCalls);
        started_exchange(&effects);
        assert_eq!(session.step_count(), 2);
    }

    #[test]
    fn test_unknown_tool_does_not_block_follow_up() {
        let mut session = Session::default();
        let first = submit(&mut session, "Do something");
        session.handle_fragment(
            first,
            Fragment::ToolCall(ToolCall::new("call-x", "bookRestaurant", json!({}))),
        );
        finish(&mut session, first, FinishReason::ToolCalls);
        let effects = session.handle_resolution(first, "call-x", None);
        started_exchange(&effects);

        let invocation = &session.messages()[1].tool_invocations[0];
        assert_eq!(invocation.state, InvocationState::Resolved { result: None });
    }

    #[test]
    fn test_duplicate_resolution_ignored() {
        let mut session = Session::default();
        let first = submit(&mut session, "Weather?");
        session.handle_fragment(first, Fragment::ToolCall(weather_call("call-1")));
        session.handle_resolution(first, "call-1", Some("first".to_string()));
        session.handle_resolution(first, "call-1", Some("second".to_string()));

        let invocation = &session.messages()[1].tool_invocations[0];
        assert_eq!(invocation.result(), Some("first"));
    }

    #[test]
    fn test_step_limit_finalizes_turn() {
        let mut session = Session::new(2);
        let mut exchange = submit(&mut session, "Weather everywhere");

        for step in 1..=2u32 {
            assert_eq!(session.step_count(), step);
            let id = format!("call-{}", step);
            session.handle_fragment(exchange, Fragment::ToolCall(weather_call(&id)));
            session.handle_resolution(exchange, &id, Some("shown".to_string()));
            let effects = finish(&mut session, exchange, FinishReason::ToolCalls);
            assert!(session.step_count() <= session.max_steps());
            if step < 2 {
                exchange = started_exchange(&effects);
            } else {
                assert!(effects.contains(&Effect::FocusInput));
            }
        }

        assert_eq!(session.status(), Status::Idle);
        assert_eq!(session.step_count(), 0);
        assert!(session.last_error().is_none());
    }

    #[test]
    fn test_step_limit_waits_for_resolution_then_finalizes() {
        let mut session = Session::new(1);
        let exchange = submit(&mut session, "Weather?");
        session.handle_fragment(exchange, Fragment::ToolCall(weather_call("call-1")));
        let effects = finish(&mut session, exchange, FinishReason::ToolCalls);
        assert!(effects.is_empty());
        assert_eq!(session.status(), Status::Streaming);

        let effects = session.handle_resolution(exchange, "call-1", Some("shown".to_string()));
        assert!(!effects.iter().any(|e| matches!(e, Effect::StartExchange(_))));
        assert!(effects.contains(&Effect::FocusInput));
        assert_eq!(session.status(), Status::Idle);
        assert_eq!(session.messages()[1].tool_invocations[0].result(), Some("shown"));

        // Anything after the turn closed is dropped
        let effects = session.handle_resolution(exchange, "call-1", Some("late".to_string()));
        assert!(effects.is_empty());
        assert_eq!(session.messages()[1].tool_invocations[0].result(), Some("shown"));
    }

    #[test]
    fn test_failure_then_retry() {
        let mut session = Session::default();
        let exchange = submit(&mut session, "Hello");
        text(&mut session, exchange, "Partial");
        session.handle_failure(exchange, TransportError::Network("connection reset".to_string()));
        assert_eq!(session.status(), Status::Error);
        assert!(session.last_error().is_some());

        let effects = session.retry().unwrap();
        let retried = started_exchange(&effects);
        assert_eq!(session.status(), Status::Submitted);
        assert!(session.last_error().is_none());

        let request = effects
            .iter()
            .find_map(|e| match e {
                Effect::StartExchange(req) => Some(req),
                _ => None,
            })
            .unwrap();
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].content, "Hello");

        let users = session
            .messages()
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .count();
        assert_eq!(users, 1);

        text(&mut session, retried, "Hi there");
        finish(&mut session, retried, FinishReason::Stop);
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[1].content, "Hi there");
    }

    #[test]
    fn test_retry_only_in_error() {
        let mut session = Session::default();
        assert_eq!(session.retry(), Err(ActionRejected::NotInError));
    }

    #[test]
    fn test_reset_orphans_exchange() {
        let mut session = Session::default();
        let exchange = submit(&mut session, "Hello");
        text(&mut session, exchange, "Hi");

        let effects = session.reset();
        assert!(effects.contains(&Effect::FocusInput));
        assert!(session.messages().is_empty());
        assert_eq!(session.status(), Status::Idle);
        assert_eq!(session.step_count(), 0);

        assert!(text(&mut session, exchange, " late").is_empty());
        assert!(finish(&mut session, exchange, FinishReason::Stop).is_empty());
        session.handle_failure(exchange, TransportError::Network("late".to_string()));
        assert!(session.messages().is_empty());
        assert_eq!(session.status(), Status::Idle);

        // A fresh turn gets a new exchange id
        let next = submit(&mut session, "Again");
        assert_ne!(next, exchange);
    }

    #[test]
    fn test_empty_response_completes_turn() {
        let mut session = Session::default();
        let exchange = submit(&mut session, "Hello");
        finish(&mut session, exchange, FinishReason::Stop);
        assert_eq!(session.status(), Status::Idle);
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn test_message_order_across_turns() {
        let mut session = Session::default();
        for (i, question) in ["one", "two", "three"].iter().enumerate() {
            let exchange = submit(&mut session, question);
            text(&mut session, exchange, &format!("answer {}", i));
            finish(&mut session, exchange, FinishReason::Stop);
        }
        let contents: Vec<&str> = session.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "answer 0", "two", "answer 1", "three", "answer 2"]);
    }

    #[test]
    fn test_message_serialization_shape() {
        let mut session = Session::default();
        let exchange = submit(&mut session, "Weather?");
        session.handle_fragment(exchange, Fragment::ToolCall(weather_call("call-1")));
        session.handle_resolution(exchange, "call-1", Some("shown".to_string()));

        let value = serde_json::to_value(&session.messages()[1]).unwrap();
        assert_eq!(value["role"], "assistant");
        let invocation = &value["toolInvocations"][0];
        assert_eq!(invocation["toolCallId"], "call-1");
        assert_eq!(invocation["toolName"], "showWeatherInformation");
        assert_eq!(invocation["state"], "resolved");
        assert_eq!(invocation["result"], "shown");
    }
}
