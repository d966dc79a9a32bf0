use inflow_core::{
    ErrorCode, ImportError, ImportOutcome, ImportWarning, MailboxRecord,
};
use serde_json::json;

#[test]
fn queued_serializes_with_result_tag_only() {
    let value = serde_json::to_value(MailboxRecord::Queued).unwrap();
    assert_eq!(value, json!({ "result": "Queued" }));
}

#[test]
fn success_carries_filename_field() {
    let value = serde_json::to_value(MailboxRecord::Success {
        filename: "Example.png".into(),
    })
    .unwrap();
    assert_eq!(value["result"], "Success");
    assert_eq!(value["filename"], "Example.png");
}

#[test]
fn warning_carries_warnings_and_stash_key() {
    let value = serde_json::to_value(MailboxRecord::Warning {
        warnings: vec![ImportWarning::DuplicateContent {
            existing: "Original.png".into(),
        }],
        stash_key: "abcd1234-ef567890".into(),
    })
    .unwrap();
    assert_eq!(value["result"], "Warning");
    assert_eq!(value["stash_key"], "abcd1234-ef567890");
    assert!(value["warnings"].is_array());
}

#[test]
fn failure_carries_errors_field() {
    let value = serde_json::to_value(MailboxRecord::Failure {
        errors: vec![ImportError::new(ErrorCode::HttpStatus(502), "bad gateway")],
    })
    .unwrap();
    assert_eq!(value["result"], "Failure");
    assert_eq!(value["errors"].as_array().map(Vec::len), Some(1));
}

#[test]
fn record_round_trips_through_json() {
    let record = MailboxRecord::Warning {
        warnings: vec![ImportWarning::DestinationExists {
            existing: "Example.png".into(),
        }],
        stash_key: "abcd1234-ef567890".into(),
    };
    let value = serde_json::to_value(&record).unwrap();
    let back: MailboxRecord = serde_json::from_value(value).unwrap();
    assert_eq!(back, record);
}

#[test]
fn outcome_maps_onto_matching_record() {
    let outcome = ImportOutcome::Failure {
        errors: vec![ImportError::new(ErrorCode::Timeout, "deadline exceeded")],
    };
    let record = MailboxRecord::from(outcome);
    assert_eq!(record.result(), "Failure");

    let record = MailboxRecord::from(ImportOutcome::Success {
        filename: "Example.png".into(),
    });
    assert_eq!(record.result(), "Success");
}
