//! Verify the link parser and schema filter against JSON test vectors stored
//! in `test-vectors/`.
//!
//! Comparing parsed JSON (not raw strings) avoids false negatives from
//! field-ordering differences.

use hal_form_core::{filter_uri_properties, parse_link_header, ApiError};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Link header
// ---------------------------------------------------------------------------

#[test]
fn link_header_test_vectors() {
    let raw = include_str!("../../test-vectors/link-header.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let header = case["header"].as_str().unwrap();
        let result = parse_link_header(header);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            match expected_error.as_str().unwrap() {
                "MalformedLinkHeader" => assert!(
                    matches!(err, ApiError::MalformedLinkHeader { .. }),
                    "{name}: expected MalformedLinkHeader, got {err:?}"
                ),
                other => panic!("{name}: unknown expected_error: {other}"),
            }
        } else {
            let links = result.unwrap_or_else(|e| panic!("{name}: {e}"));
            let json = serde_json::to_value(&links).unwrap();
            assert_eq!(json, case["expected"], "{name}: links");
        }
    }
}

// ---------------------------------------------------------------------------
// Schema filter
// ---------------------------------------------------------------------------

#[test]
fn schema_filter_test_vectors() {
    let raw = include_str!("../../test-vectors/schema-filter.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let mut properties: Map<String, Value> =
            serde_json::from_value(case["properties"].clone()).unwrap();

        let removed = filter_uri_properties(&mut properties);

        assert_eq!(removed as u64, case["removed"].as_u64().unwrap(), "{name}: removed");
        assert_eq!(Value::Object(properties), case["expected"], "{name}: properties");
    }
}
