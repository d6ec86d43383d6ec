use crate::components::cards::CardsComponent;
use crate::markdown;
use crate::state::{AppState, Focus};
use okinawa_core::{ChatMessage, MessageRole, Status};
use ratatui::{
    layout::{Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Component for rendering the chat panel
pub struct ChatComponent;

impl ChatComponent {
    /// Render the chat messages
    pub fn render(state: &mut AppState, f: &mut Frame, area: Rect) {
        // Account for borders and the scrollbar column
        let available_width = area.width.saturating_sub(3) as usize;
        let chat_lines = Self::lines(state, available_width);

        // Calculate scroll limits
        let content_height = chat_lines.len();
        let visible_height = area.height.saturating_sub(2) as usize;
        let max_scroll = content_height.saturating_sub(visible_height);

        let scroll_pos = if state.view.auto_scroll_chat {
            max_scroll
        } else {
            state.view.chat_scroll.min(max_scroll)
        };
        // Scrolling back down to the end re-pins the view
        if scroll_pos == max_scroll {
            state.view.auto_scroll_chat = true;
        }
        state.view.chat_scroll = scroll_pos;

        let visible_lines: Vec<Line> = chat_lines.into_iter().skip(scroll_pos).take(visible_height).collect();

        let focused = state.view.focus == Focus::Chat;
        let border_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let chat = Paragraph::new(Text::from(visible_lines)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(" Okinawa Go "),
        );
        f.render_widget(chat, area);

        if content_height > visible_height {
            let scrollbar = Scrollbar::default()
                .orientation(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"));
            let mut scrollbar_state = ScrollbarState::new(max_scroll.max(1)).position(scroll_pos);
            f.render_stateful_widget(
                scrollbar,
                area.inner(&Margin { vertical: 1, horizontal: 0 }),
                &mut scrollbar_state,
            );
        }
    }

    /// Every line of the transcript, laid out for `width` columns
    pub fn lines(state: &AppState, width: usize) -> Vec<Line<'static>> {
        let messages = state.session.messages();
        let mut chat_lines = Vec::new();

        if messages.is_empty() {
            Self::render_welcome(&mut chat_lines);
        }
        for msg in messages {
            match msg.role {
                MessageRole::User => Self::render_user_message(&mut chat_lines, msg, width),
                MessageRole::Assistant => Self::render_assistant_message(&mut chat_lines, msg, width),
                MessageRole::System => {
                    let style = Style::default().fg(Color::Yellow);
                    chat_lines.extend(markdown::plain(&msg.content, style, width).into_iter().map(|l| l.line));
                }
            }
            chat_lines.push(Line::default());
        }

        let status = state.session.status();
        if matches!(status, Status::Submitted | Status::Streaming) {
            let frame = (state.started_at.elapsed().as_millis() / 100) as usize % SPINNER.len();
            let label = if status == Status::Submitted { "Loading..." } else { "Thinking..." };
            chat_lines.push(Line::from(vec![
                Span::styled(format!("{} ", SPINNER[frame]), Style::default().fg(Color::Yellow)),
                Span::styled(label, Style::default().fg(Color::DarkGray)),
            ]));
        }
        chat_lines
    }

    fn render_welcome(chat_lines: &mut Vec<Line<'static>>) {
        chat_lines.push(Line::default());
        chat_lines.push(Line::from(Span::styled(
            "Welcome to Okinawa Go",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        chat_lines.push(Line::from(Span::styled(
            "Your personal assistant for discovering Okinawa.",
            Style::default().fg(Color::DarkGray),
        )));
        chat_lines.push(Line::default());
        chat_lines.push(Line::from(Span::styled(
            "Ctrl+P for ideas",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    fn render_user_message(chat_lines: &mut Vec<Line<'static>>, msg: &ChatMessage, width: usize) {
        chat_lines.push(Line::from(Span::styled(
            "You",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        // User text is shown as typed, not as Markdown
        let style = Style::default().fg(Color::Cyan);
        chat_lines.extend(markdown::plain(&msg.content, style, width).into_iter().map(|l| l.line));
    }

    fn render_assistant_message(chat_lines: &mut Vec<Line<'static>>, msg: &ChatMessage, width: usize) {
        chat_lines.push(Line::from(Span::styled(
            "Okinawa Go",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
        chat_lines.extend(markdown::render(&msg.content, width).into_iter().map(|l| l.line));

        for invocation in &msg.tool_invocations {
            let card = CardsComponent::lines(&invocation.payload(), width);
            if card.is_empty() {
                continue;
            }
            chat_lines.push(Line::default());
            chat_lines.extend(card);
        }
    }
}
