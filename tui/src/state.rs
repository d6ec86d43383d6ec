use okinawa_core::{AppEvent, Runtime, Session, UiCoordinator};
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::debug;

/// Which panel receives scroll keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Chat,
}

/// Scroll and focus state the session effects act on
#[derive(Debug)]
pub struct ViewState {
    /// Currently focused panel
    pub focus: Focus,

    /// Chat scroll offset in lines
    pub chat_scroll: usize,

    /// Whether to keep the chat pinned to the newest line
    pub auto_scroll_chat: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            focus: Focus::Input,
            chat_scroll: 0,
            auto_scroll_chat: true,
        }
    }
}

impl UiCoordinator for ViewState {
    fn scroll_to_latest(&mut self) {
        self.auto_scroll_chat = true;
    }

    fn focus_input(&mut self) {
        debug!("Focusing input");
        self.focus = Focus::Input;
    }
}

/// Preset prompt palette state
#[derive(Debug, Default)]
pub struct PresetPalette {
    pub open: bool,
    pub selected: usize,
    pub filter: String,
}

impl PresetPalette {
    pub fn open(&mut self) {
        self.open = true;
        self.selected = 0;
        self.filter.clear();
    }

    pub fn close(&mut self) {
        self.open = false;
        self.selected = 0;
        self.filter.clear();
    }

    /// Presets matching the filter, case-insensitively
    pub fn filtered<'a>(&self, presets: &'a [String]) -> Vec<&'a String> {
        let filter = self.filter.to_lowercase();
        presets
            .iter()
            .filter(|p| filter.is_empty() || p.to_lowercase().contains(&filter))
            .collect()
    }
}

/// Application state
pub struct AppState {
    /// The chat session
    pub session: Session,

    /// Executes session effects in the background
    pub runtime: Runtime,

    /// Event receiver for transport and resolver events
    pub event_receiver: mpsc::UnboundedReceiver<AppEvent>,

    /// Scroll and focus
    pub view: ViewState,

    /// Cursor position in the input buffer (byte index)
    pub input_cursor: usize,

    /// Preset prompts offered in the palette
    pub presets: Vec<String>,

    /// Preset palette overlay
    pub palette: PresetPalette,

    /// Short message for the status line, e.g. why a key did nothing
    pub notice: Option<String>,

    /// Whether the application should quit
    pub should_quit: bool,

    /// Whether cursor is visible (for blinking effect)
    pub cursor_visible: bool,

    /// Last time cursor blinked
    pub last_cursor_blink: Instant,

    /// Drives the busy spinner
    pub started_at: Instant,
}

impl AppState {
    /// Create a new application state
    pub fn new(
        session: Session,
        runtime: Runtime,
        event_receiver: mpsc::UnboundedReceiver<AppEvent>,
        presets: Vec<String>,
    ) -> Self {
        Self {
            session,
            runtime,
            event_receiver,
            view: ViewState::default(),
            input_cursor: 0,
            presets,
            palette: PresetPalette::default(),
            notice: None,
            should_quit: false,
            cursor_visible: true,
            last_cursor_blink: Instant::now(),
            started_at: Instant::now(),
        }
    }

    /// Update cursor blinking state
    pub fn update_cursor_blink(&mut self) {
        let now = Instant::now();
        if now.duration_since(self.last_cursor_blink).as_millis() >= 500 {
            self.cursor_visible = !self.cursor_visible;
            self.last_cursor_blink = now;
        }
    }

    /// Submit the input buffer as a user turn
    pub fn submit(&mut self) {
        match self.runtime.submit(&mut self.session, &mut self.view) {
            Ok(()) => {
                self.input_cursor = 0;
                self.notice = None;
            }
            Err(rejected) => {
                debug!("Submit rejected: {}", rejected);
                self.notice = Some(rejected.to_string());
            }
        }
    }

    /// Retry the failed turn
    pub fn retry(&mut self) {
        match self.runtime.retry(&mut self.session, &mut self.view) {
            Ok(()) => self.notice = None,
            Err(rejected) => self.notice = Some(rejected.to_string()),
        }
    }

    /// Start a new conversation
    pub fn reset(&mut self) {
        self.runtime.reset(&mut self.session, &mut self.view);
        self.input_cursor = 0;
        self.notice = None;
        self.view.chat_scroll = 0;
    }

    /// Feed a bus event into the session
    pub fn apply_event(&mut self, event: AppEvent) {
        self.runtime.handle_event(&mut self.session, event, &mut self.view);
    }

    /// Replace the input buffer with a preset prompt
    pub fn fill_input(&mut self, text: &str) {
        self.session.set_input(text);
        self.input_cursor = self.session.input().len();
        self.view.focus = Focus::Input;
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use okinawa_core::transport::{ScriptedStep, ScriptedTransport};
    use okinawa_core::{DisplayResolver, EventBus};
    use std::sync::Arc;
    use std::time::Duration;

    /// State wired to a scripted transport with no delay
    pub fn state_with_script(steps: Vec<ScriptedStep>) -> AppState {
        let bus = EventBus::new();
        let transport = ScriptedTransport::new()
            .with_delay(Duration::ZERO)
            .with_script(steps);
        let runtime = Runtime::new(Arc::new(transport), Arc::new(DisplayResolver::new()), bus.sender());
        AppState::new(
            Session::default(),
            runtime,
            bus.into_receiver(),
            vec!["Weather in Naha?".to_string(), "Show my trip notes".to_string()],
        )
    }

    /// Pump bus events until the session is no longer busy
    pub async fn settle(state: &mut AppState) {
        use okinawa_core::Status;
        while matches!(state.session.status(), Status::Submitted | Status::Streaming) {
            let event = tokio::time::timeout(Duration::from_secs(5), state.event_receiver.recv())
                .await
                .expect("Timed out waiting for events")
                .expect("Event bus closed");
            state.apply_event(event);
        }
    }
}
