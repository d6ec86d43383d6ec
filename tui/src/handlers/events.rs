use crate::state::AppState;
use okinawa_core::AppEvent;
use tracing::debug;

/// Handles application events from the transport and resolver tasks
pub struct EventHandler;

impl EventHandler {
    /// Handle application events
    pub fn handle_event(state: &mut AppState, event: AppEvent) {
        debug!("Handling app event: {:?}", event);
        let before = state.session.status();
        state.apply_event(event);
        let after = state.session.status();
        if before != after {
            debug!("Status {} -> {}", before, after);
        }
    }
}
