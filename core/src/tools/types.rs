use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use url::Url;

/// Tool names the client knows how to present. Anything else the backend
/// sends is carried through as `Other` and never rendered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ToolName {
    ShowWeatherInformation,
    ShowHackmdContent,
    Other(String),
}

impl ToolName {
    pub fn as_str(&self) -> &str {
        match self {
            ToolName::ShowWeatherInformation => "showWeatherInformation",
            ToolName::ShowHackmdContent => "showHackmdContent",
            ToolName::Other(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ToolName::Other(_))
    }
}

impl From<String> for ToolName {
    fn from(name: String) -> Self {
        match name.as_str() {
            "showWeatherInformation" => ToolName::ShowWeatherInformation,
            "showHackmdContent" => ToolName::ShowHackmdContent,
            _ => ToolName::Other(name),
        }
    }
}

impl From<&str> for ToolName {
    fn from(name: &str) -> Self {
        ToolName::from(name.to_string())
    }
}

impl From<ToolName> for String {
    fn from(name: ToolName) -> Self {
        match name {
            ToolName::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tool call as emitted by the transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCall {
    pub tool_call_id: String,
    pub tool_name: ToolName,
    #[serde(default)]
    pub args: Value,
}

impl ToolCall {
    pub fn new(tool_call_id: impl Into<String>, tool_name: impl Into<ToolName>, args: Value) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            args,
        }
    }
}

// Card payloads

/// `showWeatherInformation` arguments, normalized for display
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeatherCard {
    /// Empty when the backend omitted the city
    pub city: String,
    pub weather: Option<String>,
    /// Degrees Celsius
    pub temperature: Option<f64>,
    pub typical_weather: Option<String>,
}

impl WeatherCard {
    pub fn from_args(args: &Value) -> Self {
        Self {
            city: string_field(args, "city").unwrap_or_default(),
            weather: string_field(args, "weather"),
            temperature: number_field(args, "temperature"),
            typical_weather: string_field(args, "typicalWeather"),
        }
    }
}

/// `showHackmdContent` arguments, normalized for display
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HackmdCard {
    /// Markdown text; `None` leaves the content slot empty
    pub content: Option<String>,
    /// Link to the original document, only kept when it is an absolute http(s) URL
    pub source: Option<Url>,
}

impl HackmdCard {
    pub fn from_args(args: &Value) -> Self {
        Self {
            content: string_field(args, "content"),
            source: string_field(args, "source").and_then(|raw| parse_link_target(&raw)),
        }
    }
}

/// What a tool invocation renders as
#[derive(Debug, Clone, PartialEq)]
pub enum ToolPayload {
    Weather(WeatherCard),
    Hackmd(HackmdCard),
    /// No card for this tool
    Unsupported,
}

impl ToolPayload {
    pub fn from_call(tool_name: &ToolName, args: &Value) -> Self {
        match tool_name {
            ToolName::ShowWeatherInformation => ToolPayload::Weather(WeatherCard::from_args(args)),
            ToolName::ShowHackmdContent => ToolPayload::Hackmd(HackmdCard::from_args(args)),
            ToolName::Other(_) => ToolPayload::Unsupported,
        }
    }
}

/// Accepts only absolute http(s) URLs usable as a hyperlink target.
pub fn parse_link_target(raw: &str) -> Option<Url> {
    let url = Url::parse(raw.trim()).ok()?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Some(url),
        _ => None,
    }
}

/// Non-empty string field; other JSON types count as absent.
fn string_field(args: &Value, key: &str) -> Option<String> {
    match args.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Number field; numeric strings like "29.5" are accepted too.
fn number_field(args: &Value, key: &str) -> Option<f64> {
    match args.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}
