use crate::tools::types::{parse_link_target, ToolName};
use serde_json::Value;
use std::fmt;

/// Something wrong with a tool's arguments. Never fatal: the card degrades.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgIssue {
    NotAnObject,
    MissingField(&'static str),
    WrongType { field: &'static str, expected: &'static str },
    InvalidUrl(String),
}

impl fmt::Display for ArgIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgIssue::NotAnObject => write!(f, "Arguments must be an object"),
            ArgIssue::MissingField(field) => write!(f, "Missing required field: {}", field),
            ArgIssue::WrongType { field, expected } => {
                write!(f, "Field {} should be a {}", field, expected)
            }
            ArgIssue::InvalidUrl(raw) => write!(f, "Not an absolute http(s) URL: {}", raw),
        }
    }
}

/// Check tool arguments against the display contract.
///
/// Unknown tools have no contract and always pass.
pub fn validate_args(name: &ToolName, args: &Value) -> Vec<ArgIssue> {
    if !name.is_known() {
        return Vec::new();
    }

    let Some(obj) = args.as_object() else {
        return vec![ArgIssue::NotAnObject];
    };

    let mut issues = Vec::new();
    match name {
        ToolName::ShowWeatherInformation => {
            match obj.get("city") {
                None | Some(Value::Null) => issues.push(ArgIssue::MissingField("city")),
                Some(Value::String(city)) if city.trim().is_empty() => {
                    issues.push(ArgIssue::MissingField("city"))
                }
                Some(Value::String(_)) => {}
                Some(_) => issues.push(ArgIssue::WrongType { field: "city", expected: "string" }),
            }
            expect_string(obj, "weather", &mut issues);
            expect_string(obj, "typicalWeather", &mut issues);
            match obj.get("temperature") {
                None | Some(Value::Null) | Some(Value::Number(_)) => {}
                Some(Value::String(s)) if s.trim().parse::<f64>().is_ok() => {}
                Some(_) => issues.push(ArgIssue::WrongType { field: "temperature", expected: "number" }),
            }
        }
        ToolName::ShowHackmdContent => {
            expect_string(obj, "content", &mut issues);
            match obj.get("source") {
                Some(Value::String(raw)) if parse_link_target(raw).is_none() => {
                    issues.push(ArgIssue::InvalidUrl(raw.clone()))
                }
                None | Some(Value::Null) | Some(Value::String(_)) => {}
                Some(_) => issues.push(ArgIssue::WrongType { field: "source", expected: "string" }),
            }
        }
        ToolName::Other(_) => {}
    }
    issues
}

fn expect_string(obj: &serde_json::Map<String, Value>, field: &'static str, issues: &mut Vec<ArgIssue>) {
    match obj.get(field) {
        None | Some(Value::Null) | Some(Value::String(_)) => {}
        Some(_) => issues.push(ArgIssue::WrongType { field, expected: "string" }),
    }
}
