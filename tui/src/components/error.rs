use crate::markdown;
use crate::state::AppState;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Banner shown above the input while the session is in error
pub struct ErrorComponent;

impl ErrorComponent {
    pub fn render(state: &AppState, f: &mut Frame, area: Rect) {
        let mut lines = vec![Line::from(Span::styled(
            "An error occurred. Please try again.",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))];
        if let Some(error) = state.session.last_error() {
            lines.push(Line::from(Span::styled(
                markdown::sanitize(&error.to_string()).replace('\n', " "),
                Style::default().fg(Color::Gray),
            )));
        }

        let banner = Paragraph::new(Text::from(lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Error · Ctrl+R to retry "),
        );
        f.render_widget(banner, area);
    }
}
