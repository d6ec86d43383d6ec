use crate::tools::{validate_args, ArgIssue, ToolName};
use serde_json::json;

#[test]
fn test_validate_args_success() {
    let issues = validate_args(
        &ToolName::ShowWeatherInformation,
        &json!({ "city": "Naha", "weather": "Sunny", "temperature": 29 }),
    );
    assert!(issues.is_empty());

    let issues = validate_args(
        &ToolName::ShowHackmdContent,
        &json!({ "content": "# Plan", "source": "https://hackmd.io/abc" }),
    );
    assert!(issues.is_empty());
}

#[test]
fn test_validate_args_failure() {
    let issues = validate_args(&ToolName::ShowWeatherInformation, &json!({ "temperature": [1] }));
    assert_eq!(
        issues,
        vec![
            ArgIssue::MissingField("city"),
            ArgIssue::WrongType { field: "temperature", expected: "number" }
        ]
    );
    assert_eq!(issues[0].to_string(), "Missing required field: city");

    let issues = validate_args(&ToolName::ShowHackmdContent, &json!({ "source": "notes.md" }));
    assert_eq!(issues, vec![ArgIssue::InvalidUrl("notes.md".to_string())]);

    let issues = validate_args(&ToolName::ShowHackmdContent, &json!("just a string"));
    assert_eq!(issues, vec![ArgIssue::NotAnObject]);
}

#[test]
fn test_numeric_string_temperature_is_accepted() {
    let issues = validate_args(
        &ToolName::ShowWeatherInformation,
        &json!({ "city": "Naha", "temperature": "29.5" }),
    );
    assert!(issues.is_empty());
}

#[test]
fn test_unknown_tool_has_no_contract() {
    assert!(validate_args(&ToolName::from("bookFlight"), &json!(42)).is_empty());
}
