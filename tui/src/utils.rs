/// Utility functions for the TUI application

/// Terminal management utilities
pub mod terminal {
    use anyhow::Result;
    use crossterm::{
        event::{DisableMouseCapture, EnableMouseCapture},
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    };
    use ratatui::{backend::CrosstermBackend, Terminal};
    use std::io;

    /// Setup terminal for TUI mode
    pub fn setup() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        Ok(Terminal::new(backend)?)
    }

    /// Restore terminal to normal mode
    pub fn restore<B: ratatui::backend::Backend + io::Write>(terminal: &mut Terminal<B>) -> Result<()> {
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
        terminal.show_cursor()?;
        Ok(())
    }
}

/// Logging setup shared by the binaries
pub mod logging {
    use anyhow::{Context, Result};
    use okinawa_core::ChatConfig;
    use std::fs::OpenOptions;
    use std::sync::Mutex;

    /// Log to `OKINAWA_LOG_FILE` when set, otherwise WARN and above to stderr.
    ///
    /// The alternate screen hides stderr while the UI runs, so the file is
    /// the way to see debug output.
    pub fn init(config: &ChatConfig) -> Result<()> {
        match &config.log_file {
            Some(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open log file {}", path.display()))?;
                tracing_subscriber::fmt()
                    .with_max_level(tracing::Level::DEBUG)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .init();
            }
            None => {
                tracing_subscriber::fmt()
                    .with_max_level(tracing::Level::WARN)
                    .with_writer(std::io::stderr)
                    .init();
            }
        }
        Ok(())
    }
}

/// Layout calculation utilities
pub mod layout {
    use ratatui::layout::{Constraint, Direction, Layout, Rect};

    /// Chat, optional error banner, input and status line
    pub struct MainLayout {
        pub chat: Rect,
        pub error: Option<Rect>,
        pub input: Rect,
        pub status: Rect,
    }

    /// Create the main application layout
    pub fn create_main_layout(area: Rect, show_error: bool) -> MainLayout {
        let error_height = if show_error { 4 } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Min(1),               // Chat area
                Constraint::Length(error_height), // Error banner
                Constraint::Length(3),            // Input line
                Constraint::Length(1),            // Status line
            ])
            .split(area);

        MainLayout {
            chat: chunks[0],
            error: show_error.then_some(chunks[1]),
            input: chunks[2],
            status: chunks[3],
        }
    }

    /// A rectangle centered in `area`, sized in percent
    pub fn centered(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
        let width = percent_of(area.width, width_percent);
        let height = percent_of(area.height, height_percent);
        Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        }
    }

    /// `percent` of `length`, computed wide and capped at 100%
    fn percent_of(length: u16, percent: u16) -> u16 {
        let scaled = u32::from(length) * u32::from(percent.min(100)) / 100;
        u16::try_from(scaled).unwrap_or(length)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_error_banner_only_when_requested() {
            let area = Rect::new(0, 0, 80, 24);
            assert!(create_main_layout(area, false).error.is_none());
            let layout = create_main_layout(area, true);
            assert_eq!(layout.error.map(|r| r.height), Some(4));
            assert_eq!(layout.input.height, 3);
            assert_eq!(layout.status.height, 1);
        }

        #[test]
        fn test_centered_stays_inside() {
            let area = Rect::new(0, 0, 81, 25);
            let popup = centered(area, 60, 50);
            assert!(popup.x + popup.width <= area.width);
            assert!(popup.y + popup.height <= area.height);
        }

        #[test]
        fn test_centered_on_wide_terminal() {
            // Rect::new would clamp the area, so build it directly
            let area = Rect { x: 0, y: 0, width: 2000, height: 30 };
            let popup = centered(area, 60, 50);
            assert_eq!((popup.width, popup.height), (1200, 15));
            assert_eq!((popup.x, popup.y), (400, 7));

            let full = centered(area, 150, 100);
            assert_eq!(full, area);
        }
    }
}
