use crate::state::AppState;
use crate::utils::layout;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Preset prompt palette overlay
pub struct PresetsComponent;

impl PresetsComponent {
    /// Render the palette centered over the whole frame
    pub fn render(state: &AppState, f: &mut Frame) {
        let popup_area = layout::centered(f.size(), 60, 50);
        f.render_widget(Clear, popup_area);

        let filtered = state.palette.filtered(&state.presets);
        let header = if state.palette.filter.is_empty() {
            "Preset prompts (type to filter)".to_string()
        } else {
            format!("Preset prompts (filter: {})", state.palette.filter)
        };
        let mut lines = vec![
            Line::from(Span::styled(
                header,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        if filtered.is_empty() {
            lines.push(Line::from(Span::styled("No matching prompts", Style::default().fg(Color::Red))));
        } else {
            for (i, prompt) in filtered.iter().enumerate() {
                let is_selected = i == state.palette.selected;
                let style = if is_selected {
                    Style::default().bg(Color::DarkGray).fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Green)
                };
                lines.push(Line::from(vec![
                    Span::styled(if is_selected { "► " } else { "  " }, style),
                    Span::styled(prompt.to_string(), style),
                ]));
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "↑↓ Navigate • Enter Fill input • Esc Close",
            Style::default().fg(Color::DarkGray),
        )));

        let popup = Paragraph::new(Text::from(lines))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
                    .title(" Presets ")
                    .title_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(popup, popup_area);
    }
}
