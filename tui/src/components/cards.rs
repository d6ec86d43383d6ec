use crate::markdown;
use okinawa_core::tools::{HackmdCard, WeatherCard};
use okinawa_core::ToolPayload;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

const BAR: &str = "│ ";
const NOTES_TITLE: &str = "行程筆記";
const SOURCE_LABEL: &str = "查看原始文檔";

/// Renders tool invocations as cards inside the chat
pub struct CardsComponent;

impl CardsComponent {
    /// Lines for one card; unsupported tools render nothing
    pub fn lines(payload: &ToolPayload, width: usize) -> Vec<Line<'static>> {
        let inner = width.saturating_sub(BAR.width()).max(1);
        let body = match payload {
            ToolPayload::Weather(card) => Self::weather(card, inner),
            ToolPayload::Hackmd(card) => Self::hackmd(card, inner),
            ToolPayload::Unsupported => return Vec::new(),
        };
        body.into_iter()
            .map(|line| {
                let mut spans = vec![Span::styled(BAR, bar_style())];
                spans.extend(line.spans);
                Line::from(spans)
            })
            .collect()
    }

    fn weather(card: &WeatherCard, width: usize) -> Vec<Line<'static>> {
        let mut title = vec![Span::styled(markdown::sanitize(&card.city), title_style())];
        if let Some(weather) = &card.weather {
            title.push(Span::raw("  "));
            title.push(Span::raw(weather_icon(weather)));
        }
        let mut lines = vec![Line::from(title)];

        let mut details = Vec::new();
        if let Some(weather) = &card.weather {
            details.push(Span::styled("☁ ", label_style()));
            details.push(Span::styled(markdown::sanitize(weather), value_style()));
        }
        if let Some(temperature) = card.temperature {
            if !details.is_empty() {
                details.push(Span::raw("   "));
            }
            details.push(Span::styled("🌡 ", label_style()));
            details.push(Span::styled(format!("{}°C", format_temperature(temperature)), value_style()));
        }
        if !details.is_empty() {
            lines.push(Line::from(details));
        }

        if let Some(typical) = &card.typical_weather {
            let text = format!("ℹ {}", typical);
            lines.extend(markdown::plain(&text, note_style(), width).into_iter().map(|l| l.line));
        }
        lines
    }

    fn hackmd(card: &HackmdCard, width: usize) -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(vec![
            Span::styled(NOTES_TITLE, title_style()),
            Span::styled("  ℹ", label_style()),
        ])];

        if let Some(content) = &card.content {
            lines.extend(markdown::render(content, width).into_iter().map(|l| l.line));
        }

        if let Some(source) = &card.source {
            lines.push(Line::default());
            lines.push(Line::from(vec![
                Span::styled(format!("{} ", SOURCE_LABEL), link_label_style()),
                Span::styled(source.to_string(), link_target_style()),
            ]));
        }
        lines
    }
}

/// Keyword groups checked in order; the first match picks the icon
const WEATHER_ICONS: &[(&[&str], &str)] = &[
    (&["thunder", "storm", "雷"], "⛈️"),
    (&["snow", "雪"], "❄️"),
    (&["rain", "shower", "drizzle", "雨"], "🌧️"),
    (&["fog", "mist", "haze", "霧"], "🌫️"),
    (&["wind", "typhoon", "風"], "💨"),
    (&["partly", "sunny intervals"], "⛅"),
    (&["cloud", "overcast", "雲", "陰"], "☁️"),
    (&["sun", "clear", "晴"], "☀️"),
];

/// Pick an icon for a free-form weather description
pub fn weather_icon(weather: &str) -> &'static str {
    let weather = weather.to_lowercase();
    WEATHER_ICONS
        .iter()
        .find(|(words, _)| words.iter().any(|w| weather.contains(w)))
        .map(|(_, icon)| *icon)
        .unwrap_or("🌤️")
}

/// Whole degrees print without a fraction
fn format_temperature(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

fn bar_style() -> Style {
    Style::default().fg(Color::Blue)
}

fn title_style() -> Style {
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
}

fn label_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn value_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn note_style() -> Style {
    Style::default().fg(Color::Gray)
}

fn link_label_style() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED)
}

fn link_target_style() -> Style {
    Style::default().fg(Color::Blue).add_modifier(Modifier::ITALIC)
}
