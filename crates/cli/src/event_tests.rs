use super::*;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_number_at_top_level() {
    let event = json!({ "action": "synchronize", "number": 17 });

    assert_eq!(pull_request_number(&event).unwrap(), 17);
}

#[test]
fn test_number_as_string() {
    let event = json!({ "number": "17" });

    assert_eq!(pull_request_number(&event).unwrap(), 17);
}

#[test]
fn test_number_from_pull_request_object() {
    let event = json!({ "action": "submitted", "pull_request": { "number": 23 } });

    assert_eq!(pull_request_number(&event).unwrap(), 23);
}

#[test]
fn test_missing_number() {
    let event = json!({ "ref": "refs/heads/main" });

    assert!(matches!(
        pull_request_number(&event),
        Err(CliError::InvalidArguments(_))
    ));
}

#[test]
fn test_invalid_numbers() {
    for event in [
        json!({ "number": "seventeen" }),
        json!({ "number": -1 }),
        json!({ "number": 0 }),
        json!({ "number": null }),
    ] {
        assert!(pull_request_number(&event).is_err(), "accepted {}", event);
    }
}

#[test]
fn test_read_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"number": 5, "pull_request": {{"number": 5}}}}"#).unwrap();

    assert_eq!(read_pull_request_number(file.path()).unwrap(), 5);
}

#[test]
fn test_read_malformed_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();

    assert!(matches!(
        read_pull_request_number(file.path()),
        Err(CliError::ConfigError(_))
    ));
}
