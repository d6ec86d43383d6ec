use crate::state::{AppState, Focus};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};
use okinawa_core::Status;
use tracing::debug;

/// Handles input events for the application
pub struct InputHandler;

impl InputHandler {
    /// Handle input events (keyboard and mouse)
    pub fn handle_event(state: &mut AppState, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => Self::handle_key_event(state, key),
            Event::Mouse(mouse_event) => Self::handle_mouse_event(state, mouse_event),
            Event::Paste(text) => Self::insert_str(state, &text),
            _ => {}
        }
    }

    fn handle_key_event(state: &mut AppState, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => state.should_quit = true,
                KeyCode::Char('n') => {
                    debug!("Starting a new conversation");
                    state.palette.close();
                    state.reset();
                }
                KeyCode::Char('r') => state.retry(),
                KeyCode::Char('p') => {
                    if state.palette.open {
                        state.palette.close();
                    } else {
                        state.palette.open();
                    }
                }
                _ => {}
            }
            return;
        }

        if state.palette.open {
            Self::handle_palette_key(state, key.code);
            return;
        }

        match key.code {
            KeyCode::Tab => {
                state.view.focus = match state.view.focus {
                    Focus::Input => Focus::Chat,
                    Focus::Chat => Focus::Input,
                };
            }
            KeyCode::Esc => {
                state.session.input_mut().clear();
                state.input_cursor = 0;
                state.view.focus = Focus::Input;
            }
            KeyCode::Enter => state.submit(),
            KeyCode::Up => Self::scroll_up(state, 1),
            KeyCode::Down => Self::scroll_down(state, 1),
            KeyCode::PageUp => Self::scroll_up(state, 10),
            KeyCode::PageDown => Self::scroll_down(state, 10),
            KeyCode::End if state.view.focus == Focus::Chat => {
                // Jump to bottom and re-enable auto-scroll
                state.view.auto_scroll_chat = true;
            }
            KeyCode::Home if state.view.focus == Focus::Chat => {
                state.view.chat_scroll = 0;
                state.view.auto_scroll_chat = false;
            }
            KeyCode::Char(c) => Self::insert_char(state, c),
            KeyCode::Backspace => Self::delete_char(state),
            KeyCode::Delete => Self::delete_char_forward(state),
            KeyCode::Left => Self::move_cursor_left(state),
            KeyCode::Right => Self::move_cursor_right(state),
            KeyCode::Home => state.input_cursor = 0,
            KeyCode::End => state.input_cursor = state.session.input().len(),
            _ => {}
        }
    }

    fn handle_palette_key(state: &mut AppState, code: KeyCode) {
        match code {
            KeyCode::Esc => state.palette.close(),
            KeyCode::Up => {
                state.palette.selected = state.palette.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                let count = state.palette.filtered(&state.presets).len();
                if state.palette.selected + 1 < count {
                    state.palette.selected += 1;
                }
            }
            KeyCode::Enter => Self::select_preset(state),
            KeyCode::Backspace => {
                if state.palette.filter.pop().is_none() {
                    state.palette.close();
                } else {
                    state.palette.selected = 0;
                }
            }
            KeyCode::Char(c) => {
                state.palette.filter.push(c);
                // Reset selection when filter changes
                state.palette.selected = 0;
            }
            _ => {}
        }
    }

    /// Put the selected preset in the input; the user still presses Enter to send
    fn select_preset(state: &mut AppState) {
        let selected = state
            .palette
            .filtered(&state.presets)
            .get(state.palette.selected)
            .map(|p| p.to_string());
        state.palette.close();
        if let Some(prompt) = selected {
            state.fill_input(&prompt);
        }
    }

    fn handle_mouse_event(state: &mut AppState, mouse_event: MouseEvent) {
        match mouse_event.kind {
            MouseEventKind::ScrollUp => Self::scroll_up(state, 3),
            MouseEventKind::ScrollDown => Self::scroll_down(state, 3),
            _ => {}
        }
    }

    fn scroll_up(state: &mut AppState, lines: usize) {
        state.view.chat_scroll = state.view.chat_scroll.saturating_sub(lines);
        // Disable auto-scroll when user manually scrolls
        state.view.auto_scroll_chat = false;
    }

    fn scroll_down(state: &mut AppState, lines: usize) {
        // The chat component clamps this and re-pins at the bottom
        state.view.chat_scroll = state.view.chat_scroll.saturating_add(lines);
        state.view.auto_scroll_chat = false;
    }

    /// The input only takes edits while the session is ready
    fn editable(state: &AppState) -> bool {
        state.session.status() == Status::Idle
    }

    /// Insert a character at the cursor position
    fn insert_char(state: &mut AppState, ch: char) {
        if !Self::editable(state) {
            return;
        }
        let cursor = state.input_cursor.min(state.session.input().len());
        state.session.input_mut().insert(cursor, ch);
        state.input_cursor = cursor + ch.len_utf8();
        state.view.focus = Focus::Input;
    }

    fn insert_str(state: &mut AppState, text: &str) {
        if !Self::editable(state) {
            return;
        }
        // Single-line input
        let text: String = text.chars().map(|c| if c == '\n' || c == '\r' { ' ' } else { c }).collect();
        let cursor = state.input_cursor.min(state.session.input().len());
        state.session.input_mut().insert_str(cursor, &text);
        state.input_cursor = cursor + text.len();
    }

    /// Delete character before cursor
    fn delete_char(state: &mut AppState) {
        if !Self::editable(state) || state.input_cursor == 0 {
            return;
        }
        let previous = state.session.input()[..state.input_cursor].char_indices().next_back();
        if let Some((idx, _)) = previous {
            state.session.input_mut().remove(idx);
            state.input_cursor = idx;
        }
    }

    /// Delete character under cursor
    fn delete_char_forward(state: &mut AppState) {
        if !Self::editable(state) || state.input_cursor >= state.session.input().len() {
            return;
        }
        state.session.input_mut().remove(state.input_cursor);
    }

    /// Move cursor left
    fn move_cursor_left(state: &mut AppState) {
        let input = state.session.input();
        if let Some((idx, _)) = input[..state.input_cursor.min(input.len())].char_indices().next_back() {
            state.input_cursor = idx;
        }
    }

    /// Move cursor right
    fn move_cursor_right(state: &mut AppState) {
        let input = state.session.input();
        if let Some(ch) = input.get(state.input_cursor..).and_then(|rest| rest.chars().next()) {
            state.input_cursor += ch.len_utf8();
        }
    }
}
