use crate::state::AppState;
use okinawa_core::Status;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Component for rendering the status line
pub struct StatusComponent;

impl StatusComponent {
    /// Render the status line
    pub fn render(state: &AppState, f: &mut Frame, area: Rect) {
        f.render_widget(Paragraph::new(Self::line(state)), area);
    }

    pub fn line(state: &AppState) -> Line<'static> {
        let status = state.session.status();
        let color = match status {
            Status::Idle => Color::Green,
            Status::Submitted | Status::Streaming => Color::Yellow,
            Status::Error => Color::Red,
        };

        let mut spans = vec![
            Span::styled(format!("● {}", status), Style::default().fg(color)),
            Span::styled(
                format!(" | {}", state.runtime.transport_info().name),
                Style::default().fg(Color::DarkGray),
            ),
        ];
        if state.session.step_count() > 0 {
            spans.push(Span::styled(
                format!(" | step {}/{}", state.session.step_count(), state.session.max_steps()),
                Style::default().fg(Color::DarkGray),
            ));
        }

        match &state.notice {
            Some(notice) => spans.push(Span::styled(format!(" | {}", notice), Style::default().fg(Color::Yellow))),
            None => {
                let hints = if status == Status::Error {
                    " | Ctrl+R retry · Ctrl+N new chat · Ctrl+C quit"
                } else {
                    " | Enter send · Ctrl+P presets · Ctrl+N new chat · Tab focus · Ctrl+C quit"
                };
                spans.push(Span::styled(hints, Style::default().fg(Color::DarkGray)));
            }
        }
        Line::from(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::tests::line_texts;
    use crate::state::test_support::{settle, state_with_script};
    use okinawa_core::transport::ScriptedStep;
    use okinawa_core::TransportError;

    #[tokio::test]
    async fn test_status_line_tracks_session() {
        let mut state = state_with_script(vec![
            ScriptedStep::Reply("ok".to_string()),
            ScriptedStep::Fail(TransportError::Network("offline".to_string())),
        ]);
        let idle = &line_texts(&[StatusComponent::line(&state)])[0];
        assert!(idle.starts_with("● ready | Offline"));

        state.fill_input("Hello");
        state.submit();
        let busy = &line_texts(&[StatusComponent::line(&state)])[0];
        assert!(busy.starts_with("● submitted"));
        assert!(busy.contains("step 1/5"));
        settle(&mut state).await;

        state.fill_input("Again");
        state.submit();
        settle(&mut state).await;
        let failed = &line_texts(&[StatusComponent::line(&state)])[0];
        assert!(failed.starts_with("● error"));
        assert!(failed.contains("Ctrl+R retry"));
    }

    #[tokio::test]
    async fn test_notice_replaces_hints() {
        let mut state = state_with_script(vec![]);
        state.submit();
        let line = &line_texts(&[StatusComponent::line(&state)])[0];
        assert!(line.ends_with("| Nothing to send"));
    }
}
