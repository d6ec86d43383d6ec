// UI components for the TUI

pub mod cards;
pub mod chat;
pub mod error;
pub mod input;
pub mod presets;
pub mod status;

pub use cards::CardsComponent;
pub use chat::ChatComponent;
pub use error::ErrorComponent;
pub use input::InputComponent;
pub use presets::PresetsComponent;
pub use status::StatusComponent;

#[cfg(test)]
pub(crate) mod tests {
    use ratatui::{buffer::Buffer, text::Line};

    /// Screen contents, one row per line
    pub fn buffer_text(buffer: &Buffer) -> String {
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer.get(x, y).symbol());
            }
            text.push('\n');
        }
        text
    }

    pub fn line_texts(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }
}
