use anyhow::Result;
use crossterm::event;
use okinawa_core::Status;
use ratatui::{backend::Backend, Frame, Terminal};
use std::time::Duration;
use tracing::info;

use crate::{
    components::{ChatComponent, ErrorComponent, InputComponent, PresetsComponent, StatusComponent},
    handlers::{EventHandler, InputHandler},
    state::AppState,
    utils::{layout, terminal},
};

/// Main application
pub struct App {
    state: AppState,
}

impl App {
    /// Create a new application instance
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Run the application main loop
    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = terminal::setup()?;

        info!("TUI initialized, starting main loop");

        let result = self.run_app(&mut terminal).await;

        terminal::restore(&mut terminal)?;

        result
    }

    /// Main application loop
    async fn run_app<B: Backend + std::io::Write>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            self.state.update_cursor_blink();

            terminal.draw(|f| self.ui(f))?;

            // Handle events with timeout to ensure UI responsiveness
            tokio::select! {
                terminal_event = async {
                    if event::poll(Duration::from_millis(0)).unwrap_or(false) {
                        event::read().ok()
                    } else {
                        None
                    }
                } => {
                    if let Some(event) = terminal_event {
                        InputHandler::handle_event(&mut self.state, event);
                    }
                },

                // Transport fragments, tool resolutions and failures
                app_event = self.state.event_receiver.recv() => {
                    if let Some(event) = app_event {
                        EventHandler::handle_event(&mut self.state, event);
                    }
                },

                // Keeps the spinner and cursor blink moving
                _ = tokio::time::sleep(Duration::from_millis(50)) => {},
            }

            if self.state.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Draw the user interface
    fn ui(&mut self, f: &mut Frame) {
        let show_error = self.state.session.status() == Status::Error;
        let main = layout::create_main_layout(f.size(), show_error);

        ChatComponent::render(&mut self.state, f, main.chat);
        if let Some(area) = main.error {
            ErrorComponent::render(&self.state, f, area);
        }
        InputComponent::render(&self.state, f, main.input);
        StatusComponent::render(&self.state, f, main.status);

        // Preset palette overlay (render on top)
        if self.state.palette.open {
            PresetsComponent::render(&self.state, f);
        }
    }
}
