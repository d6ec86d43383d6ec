//! Executes the effects a session transition asks for.
//!
//! Transport streams and resolver calls run as background tasks and only
//! talk back through the event bus, so the session keeps a single writer.

use crate::coordinator::UiCoordinator;
use crate::effect::Effect;
use crate::events::{AppEvent, EventSender, ExchangeId};
use crate::session::{ActionRejected, Session};
use crate::tools::{ToolCall, ToolCallResolver};
use crate::transport::{ExchangeRequest, Transport, TransportInfo};
use std::sync::Arc;
use tracing::{debug, warn};

pub struct Runtime {
    transport: Arc<dyn Transport>,
    resolver: Arc<dyn ToolCallResolver>,
    event_sender: EventSender,
}

impl Runtime {
    pub fn new(
        transport: Arc<dyn Transport>,
        resolver: Arc<dyn ToolCallResolver>,
        event_sender: EventSender,
    ) -> Self {
        Self {
            transport,
            resolver,
            event_sender,
        }
    }

    pub fn transport_info(&self) -> TransportInfo {
        self.transport.info()
    }

    /// Run runtime effects and hand the presentational ones to the coordinator
    pub fn dispatch(&self, effects: Vec<Effect>, coordinator: &mut dyn UiCoordinator) {
        coordinator.apply_effects(&effects);
        for effect in effects {
            match effect {
                Effect::StartExchange(request) => self.start_exchange(request),
                Effect::ResolveToolCall { exchange, call } => self.resolve(exchange, call),
                Effect::ScrollToLatest | Effect::FocusInput => {}
            }
        }
    }

    /// Apply a bus event to the session and run the resulting effects
    pub fn handle_event(&self, session: &mut Session, event: AppEvent, coordinator: &mut dyn UiCoordinator) {
        let effects = session.apply(event);
        self.dispatch(effects, coordinator);
    }

    pub fn submit(&self, session: &mut Session, coordinator: &mut dyn UiCoordinator) -> Result<(), ActionRejected> {
        let effects = session.submit()?;
        self.dispatch(effects, coordinator);
        Ok(())
    }

    pub fn retry(&self, session: &mut Session, coordinator: &mut dyn UiCoordinator) -> Result<(), ActionRejected> {
        let effects = session.retry()?;
        self.dispatch(effects, coordinator);
        Ok(())
    }

    pub fn reset(&self, session: &mut Session, coordinator: &mut dyn UiCoordinator) {
        let effects = session.reset();
        self.dispatch(effects, coordinator);
    }

    fn start_exchange(&self, request: ExchangeRequest) {
        let transport = self.transport.clone();
        let sender = self.event_sender.clone();
        let exchange = request.exchange;
        debug!("Streaming exchange {} with {} message(s)", exchange, request.messages.len());

        tokio::spawn(async move {
            let sink = sender.fragment_sink(exchange);
            if let Err(error) = transport.stream(request, sink).await {
                if sender.send_failure(exchange, error).is_err() {
                    debug!("Event bus closed before failure of exchange {} was reported", exchange);
                }
            }
        });
    }

    fn resolve(&self, exchange: ExchangeId, call: ToolCall) {
        let resolver = self.resolver.clone();
        let sender = self.event_sender.clone();

        tokio::spawn(async move {
            let result = resolver.resolve(&call).await;
            if sender.send_resolution(exchange, call.tool_call_id, result).is_err() {
                warn!("Event bus closed before tool resolution could be delivered");
            }
        });
    }
}
