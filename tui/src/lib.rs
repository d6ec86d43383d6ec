//! Terminal client for Okinawa Go: app loop, components, input handling and
//! Markdown rendering on top of `okinawa-core`.

pub mod app;
pub mod components;
pub mod handlers;
pub mod markdown;
pub mod state;
pub mod utils;

// Re-export main types for convenience
pub use app::App;

use anyhow::Result;
use okinawa_core::{ChatConfig, DisplayResolver, EventBus, Runtime, Session, TransportFactory};
use state::AppState;
use std::sync::Arc;
use tracing::info;

/// Wire the session, transport and resolver together and run the UI until quit
pub async fn launch(config: ChatConfig) -> Result<()> {
    let event_bus = EventBus::new();
    let transport = TransportFactory::from_config(&config)?;
    let info = transport.info();
    info!("Using {} transport: {}", info.name, info.description);

    let runtime = Runtime::new(transport, Arc::new(DisplayResolver::new()), event_bus.sender());
    let session = Session::new(config.max_steps);
    let state = AppState::new(session, runtime, event_bus.into_receiver(), config.presets);

    let mut app = App::new(state);
    app.run().await
}
