use crate::markdown;
use crate::state::{AppState, Focus};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const PLACEHOLDER: &str = "How can I help you today?";

/// Component for rendering the input line
pub struct InputComponent;

impl InputComponent {
    /// Render the input area
    pub fn render(state: &AppState, f: &mut Frame, area: Rect) {
        let ready = state.session.is_ready();
        let focused = state.view.focus == Focus::Input && !state.palette.open;
        let text_width = area.width.saturating_sub(2) as usize;

        let border_style = if !ready {
            Style::default().fg(Color::DarkGray)
        } else if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let input = state.session.input();
        let cursor = state.input_cursor.min(input.len());
        let (visible, cursor_col) = Self::visible_window(input, cursor, text_width);

        let content = if input.is_empty() {
            Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray))
        } else if ready {
            Span::raw(visible)
        } else {
            Span::styled(visible, Style::default().fg(Color::DarkGray))
        };

        let title = if ready { " Message (Enter to send) " } else { " Message " };
        let widget = Paragraph::new(content).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        );
        f.render_widget(widget, area);

        if ready && focused && state.cursor_visible && area.width > 2 && area.height > 2 {
            let cursor_x = area.x + 1 + cursor_col as u16;
            if cursor_x < area.x + area.width - 1 {
                f.set_cursor(cursor_x, area.y + 1);
            }
        }
    }

    /// Slice of the single-line input that keeps the cursor in view, and
    /// the cursor column within it
    fn visible_window(input: &str, cursor: usize, width: usize) -> (String, usize) {
        let clean = markdown::sanitize(input);
        let before = markdown::sanitize(input.get(..cursor).unwrap_or(input));
        let cursor_col = before.width();
        let skip = cursor_col.saturating_sub(width.saturating_sub(1));

        let mut skipped = 0;
        let mut used = 0;
        let mut visible = String::new();
        for c in clean.chars() {
            let w = c.width().unwrap_or(0);
            if skipped < skip {
                skipped += w;
                continue;
            }
            if used + w > width {
                break;
            }
            used += w;
            visible.push(c);
        }
        (visible, cursor_col.saturating_sub(skipped))
    }
}
