//! Purpose: Lock normalizer contract expectations with corpus coverage.
//! Exports: Integration tests only (no runtime exports).
//! Role: Catch drift in the repair rules against the upstream dialect.
//! Invariants: Strict JSON input stays byte-identical through normalization.
//! Invariants: Known-lossy inputs stay documented here, not silently fixed.

use meshwire::api::{ResponseRecord, normalize, parse_normalized, parse_response};

fn to_quasi(record: &ResponseRecord) -> String {
    format!(
        "{{'message': '{}', 'session_id': '{}', 'image': '{}', 'object': '{}'}}",
        record.message,
        record.session_id,
        record.image.as_deref().unwrap_or(""),
        record.object.as_deref().unwrap_or(""),
    )
}

#[test]
fn corpus_quasi_payloads_parse() {
    let corpus = [
        "{'message': 'hi', 'session_id': 'abc123', 'image': '', 'object': ''}",
        "{'message': '', 'session_id': '', 'image': '', 'object': ''}",
        "{'message': 'two words here', 'session_id': 'x-1', 'image': 'aGk=', 'object': 'Z2xURg=='}",
    ];

    for case in corpus {
        parse_response(case).unwrap_or_else(|err| panic!("case {case:?} failed: {err}"));
    }
}

#[test]
fn round_trip_reconstructs_equal_record() {
    let records = [
        ResponseRecord {
            message: "a castle on a hill".to_string(),
            session_id: "abc123".to_string(),
            image: Some("aGVsbG8=".to_string()),
            object: Some("Z2xURg==".to_string()),
        },
        ResponseRecord {
            message: String::new(),
            session_id: "s2".to_string(),
            image: Some(String::new()),
            object: Some(String::new()),
        },
    ];

    for record in records {
        let quasi = to_quasi(&record);
        let reconstructed = parse_response(&quasi).expect("round trip");
        assert_eq!(reconstructed, record);
    }
}

#[test]
fn strict_json_is_a_fixed_point() {
    let strict = r#"{"message": "hi", "session_id": "abc123", "image": "", "object": ""}"#;
    assert_eq!(normalize(strict), strict);
    assert_eq!(normalize(&normalize(strict)), strict);

    let record = parse_normalized(strict).expect("record");
    assert_eq!(record.message, "hi");
    assert_eq!(record.session_id, "abc123");
}

#[test]
fn scenario_one_produces_record_with_no_payloads() {
    let raw = "{'message': 'hi', 'session_id': 'abc123', 'image': '', 'object': ''}";
    let record = parse_response(raw).expect("record");
    assert_eq!(record.message, "hi");
    assert_eq!(record.session_id, "abc123");
    assert_eq!(record.image.as_deref(), Some(""));
    assert_eq!(record.object.as_deref(), Some(""));
    assert!(!record.has_payloads());
}

#[test]
fn embedded_transition_pattern_is_a_known_loss() {
    // Documented limitation of the heuristic: a value containing `', '`
    // is indistinguishable from a value/key transition. The contract is
    // that corruption is detected by the strict parse, never propagated.
    let raw = "{'message': 'a', 'b', 'session_id': 'x'}";
    assert!(parse_response(raw).is_err());
}
