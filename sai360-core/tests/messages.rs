use sai360_core::messages::highest_severity;
use sai360_core::{format_messages, parse_messages, MessageLevel};
use serde_json::json;

#[test]
fn groups_follow_severity_order() {
    let body = json!({
        "TRACE": ["t"],
        "INFO": ["saved 3 records"],
        "FATAL": ["database offline"],
        "DEBUG": []
    });
    let groups = parse_messages(&body);
    let levels: Vec<_> = groups.iter().map(|g| g.level).collect();
    assert_eq!(levels, vec![MessageLevel::Fatal, MessageLevel::Info, MessageLevel::Trace]);
    assert_eq!(highest_severity(&groups), Some(MessageLevel::Fatal));
}

#[test]
fn formatting_joins_messages_per_level() {
    let body = json!({ "ERROR": ["a", "b"], "WARNING": ["c"] });
    assert_eq!(format_messages(&parse_messages(&body)), "ERROR: a; b\nWARNING: c");
}

#[test]
fn non_string_messages_are_rendered_as_json() {
    let body = json!({ "ERROR": [{ "code": 7 }] });
    assert_eq!(format_messages(&parse_messages(&body)), "ERROR: {\"code\":7}");
}

#[test]
fn non_message_bodies_yield_nothing() {
    assert!(parse_messages(&json!("plain")).is_empty());
    assert!(parse_messages(&json!({ "ERROR": "not a list" })).is_empty());
    assert_eq!(highest_severity(&[]), None);
}
