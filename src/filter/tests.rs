//! Tests for the filter pipeline

use super::*;
use crate::types::Record;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_case::test_case;

fn records(values: Vec<Value>) -> Vec<Record> {
    values
        .into_iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect()
}

fn ids(records: &[Record]) -> Vec<i64> {
    records.iter().map(|r| r["id"].as_i64().unwrap()).collect()
}

fn donor_pipeline() -> FilterPipeline {
    FilterPipeline::new(["donorNameFirst", "donorNameLast", "panelId"])
}

fn donors() -> Vec<Record> {
    records(vec![
        json!({"id": 1, "donorNameFirst": "John", "donorNameLast": "Smith", "panelId": "P-100", "status": "CONFIRMED"}),
        json!({"id": 2, "donorNameFirst": "Alice", "donorNameLast": "Johnson", "panelId": "P-101", "status": "CONFIRMED"}),
        json!({"id": 3, "donorNameFirst": "Johnny", "donorNameLast": "Doe", "panelId": "P-102", "status": "PENDING"}),
        json!({"id": 4, "donorNameFirst": "Bob", "donorNameLast": "Brown", "panelId": "JOHN-7", "status": "REJECTED"}),
        json!({"id": 5, "donorNameFirst": "Carol", "donorNameLast": "White", "panelId": "P-104", "status": "CONFIRMED"}),
    ])
}

// ============================================================================
// Search
// ============================================================================

#[test]
fn test_empty_state_matches_all() {
    let result = donor_pipeline().apply(&donors(), &FilterState::new());
    assert_eq!(ids(&result), vec![1, 2, 3, 4, 5]);
}

#[test_case("john", vec![1, 2, 3, 4] ; "lowercase across fields")]
#[test_case("JOHN", vec![1, 2, 3, 4] ; "uppercase")]
#[test_case("p-10", vec![1, 2, 3, 5] ; "panel id")]
#[test_case("white", vec![5] ; "last name")]
#[test_case("zzz", vec![] ; "no match")]
fn test_search_is_case_insensitive_any_field(text: &str, expected: Vec<i64>) {
    let state = FilterState::new().search(text);
    let result = donor_pipeline().apply(&donors(), &state);
    assert_eq!(ids(&result), expected);
}

#[test]
fn test_search_ignores_unconfigured_fields() {
    // "status" is not a search field
    let state = FilterState::new().search("pending");
    assert!(donor_pipeline().apply(&donors(), &state).is_empty());
}

#[test]
fn test_search_missing_or_null_field_does_not_match() {
    let data = records(vec![
        json!({"id": 1, "donorNameFirst": null, "donorNameLast": "Adams"}),
        json!({"id": 2}),
        json!({"id": 3, "donorNameFirst": ["john"]}),
    ]);
    let state = FilterState::new().search("john");
    assert!(donor_pipeline().apply(&data, &state).is_empty());

    let state = FilterState::new().search("adams");
    assert_eq!(ids(&donor_pipeline().apply(&data, &state)), vec![1]);
}

#[test]
fn test_search_matches_numeric_fields() {
    let pipeline = FilterPipeline::new(["email", "phone"]);
    let data = records(vec![
        json!({"id": 1, "email": "a@example.com", "phone": 5551234}),
        json!({"id": 2, "email": "b@example.com", "phone": "555-9999"}),
    ]);
    let state = FilterState::new().search("5551");
    assert_eq!(ids(&pipeline.apply(&data, &state)), vec![1]);
}

// ============================================================================
// Exact Filters
// ============================================================================

#[test]
fn test_exact_filter_is_case_sensitive() {
    let state = FilterState::new().filter("status", "CONFIRMED");
    assert_eq!(ids(&donor_pipeline().apply(&donors(), &state)), vec![1, 2, 5]);

    let state = FilterState::new().filter("status", "confirmed");
    assert!(donor_pipeline().apply(&donors(), &state).is_empty());
}

#[test]
fn test_empty_filter_value_is_ignored() {
    let state = FilterState::new().filter("status", "");
    assert_eq!(donor_pipeline().apply(&donors(), &state).len(), 5);
    assert!(state.is_empty());
}

#[test]
fn test_multiple_exact_filters_and_together() {
    let data = records(vec![
        json!({"id": 1, "role": "ADMIN", "status": "ACTIVE"}),
        json!({"id": 2, "role": "ADMIN", "status": "BLOCKED"}),
        json!({"id": 3, "role": "USER", "status": "ACTIVE"}),
    ]);
    let state = FilterState::new()
        .filter("role", "ADMIN")
        .filter("status", "ACTIVE");
    let result = FilterPipeline::new(["email"]).apply(&data, &state);
    assert_eq!(ids(&result), vec![1]);
}

#[test]
fn test_exact_filter_on_boolean_field() {
    let data = records(vec![
        json!({"id": 1, "name": "Urine panel", "status": true}),
        json!({"id": 2, "name": "Hair panel", "status": false}),
        json!({"id": 3, "name": "Breath test"}),
    ]);
    let pipeline = FilterPipeline::new(["name"]);

    let active = FilterState::new().filter("status", "true");
    assert_eq!(ids(&pipeline.apply(&data, &active)), vec![1]);

    let inactive = FilterState::new().filter("status", "false");
    assert_eq!(ids(&pipeline.apply(&data, &inactive)), vec![2]);
}

#[test]
fn test_exact_filter_missing_field_is_unequal() {
    let data = records(vec![json!({"id": 1}), json!({"id": 2, "status": null})]);
    let state = FilterState::new().filter("status", "CONFIRMED");
    assert!(donor_pipeline().apply(&data, &state).is_empty());
}

// ============================================================================
// Composition
// ============================================================================

#[test]
fn test_search_and_status_combined() {
    let state = FilterState::new()
        .search("john")
        .filter("status", "CONFIRMED");
    let pipeline = FilterPipeline::new(["donorNameFirst", "donorNameLast"]);
    let result = pipeline.apply(&donors(), &state);

    assert_eq!(ids(&result), vec![1, 2]);
    for record in &result {
        assert_eq!(record["status"], "CONFIRMED");
        let first = record["donorNameFirst"].as_str().unwrap().to_lowercase();
        let last = record["donorNameLast"].as_str().unwrap().to_lowercase();
        assert!(first.contains("john") || last.contains("john"));
    }
}

#[test_case(FilterState::new() ; "empty")]
#[test_case(FilterState::new().search("jo") ; "search only")]
#[test_case(FilterState::new().filter("status", "CONFIRMED") ; "filter only")]
#[test_case(FilterState::new().search("P-1").filter("status", "PENDING") ; "both")]
fn test_apply_is_idempotent(state: FilterState) {
    let pipeline = donor_pipeline();
    let once = pipeline.apply(&donors(), &state);
    let twice = pipeline.apply(&once, &state);
    assert_eq!(once, twice);
}

#[test]
fn test_matches_agrees_with_apply() {
    let pipeline = donor_pipeline();
    let state = FilterState::new().search("john").filter("status", "CONFIRMED");
    let data = donors();
    let expected: Vec<bool> = data.iter().map(|r| pipeline.matches(r, &state)).collect();
    let kept = pipeline.apply(&data, &state);
    assert_eq!(expected.iter().filter(|m| **m).count(), kept.len());
}

// ============================================================================
// FilterState
// ============================================================================

#[test]
fn test_set_filter_reports_changes() {
    let mut state = FilterState::new();
    assert!(state.set_filter("status", "CONFIRMED"));
    assert!(!state.set_filter("status", "CONFIRMED"));
    assert!(state.set_filter("status", "REJECTED"));
    assert!(state.set_filter("status", ""));
    assert!(!state.set_filter("status", ""));
    assert!(state.is_empty());
}
