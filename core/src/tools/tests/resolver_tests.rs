use super::call;
use crate::tools::resolver::{HACKMD_SHOWN, WEATHER_SHOWN};
use crate::tools::{DisplayResolver, ToolCallResolver};
use serde_json::json;

#[tokio::test]
async fn test_resolves_weather() {
    let resolver = DisplayResolver::new();
    let result = resolver
        .resolve(&call("showWeatherInformation", json!({ "city": "Naha" })))
        .await;
    assert_eq!(result.as_deref(), Some(WEATHER_SHOWN));
}

#[tokio::test]
async fn test_resolves_hackmd() {
    let resolver = DisplayResolver::new();
    let result = resolver
        .resolve(&call("showHackmdContent", json!({ "content": "# Day 1" })))
        .await;
    assert_eq!(result.as_deref(), Some(HACKMD_SHOWN));
}

#[tokio::test]
async fn test_malformed_args_still_resolve() {
    let resolver = DisplayResolver::new();
    let result = resolver.resolve(&call("showWeatherInformation", json!(null))).await;
    assert_eq!(result.as_deref(), Some(WEATHER_SHOWN));
}

#[tokio::test]
async fn test_unknown_tool_is_not_resolved() {
    let resolver = DisplayResolver::new();
    assert_eq!(resolver.resolve(&call("bookFlight", json!({}))).await, None);
}

#[test]
fn test_resolver_works_behind_trait_object() {
    let resolver: Box<dyn ToolCallResolver> = Box::new(DisplayResolver::new());
    let result = tokio_test::block_on(resolver.resolve(&call("showHackmdContent", json!({}))));
    assert_eq!(result.as_deref(), Some(HACKMD_SHOWN));
}
