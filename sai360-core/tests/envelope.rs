use std::collections::BTreeMap;

use sai360_core::{
    is_auth_expiry, is_error_status, HttpMethod, RequestEcho, ResponseBody, ResponseDetails,
    ResponseEnvelope,
};
use serde_json::json;

fn envelope(status: u16, body: ResponseBody) -> ResponseEnvelope {
    ResponseEnvelope {
        request: RequestEcho {
            method: HttpMethod::Get,
            url: "https://x.example/api/datamodel/classes".to_string(),
            headers: BTreeMap::new(),
            body: None,
        },
        response: ResponseDetails::new(status, BTreeMap::new(), body),
    }
}

#[test]
fn error_flag_starts_at_400() {
    assert!(!is_error_status(200));
    assert!(!is_error_status(302));
    assert!(!is_error_status(399));
    assert!(is_error_status(400));
    assert!(is_error_status(404));
    assert!(is_error_status(503));
    assert!(envelope(500, ResponseBody::Empty).is_error());
    assert!(!envelope(204, ResponseBody::Empty).is_error());
}

#[test]
fn only_401_and_403_are_auth_expiry() {
    assert!(is_auth_expiry(401));
    assert!(is_auth_expiry(403));
    assert!(!is_auth_expiry(400));
    assert!(!is_auth_expiry(404));
    assert!(!is_auth_expiry(500));
}

#[test]
fn decode_prefers_json_when_requested() {
    let body = ResponseBody::decode(br#"[{"name":"Risk"}]"#, true, None);
    assert_eq!(body, ResponseBody::Json(json!([{ "name": "Risk" }])));

    let body = ResponseBody::decode(b"<html>v1</html>", true, None);
    assert_eq!(body, ResponseBody::Text("<html>v1</html>".to_string()));
}

#[test]
fn decode_honours_json_content_type() {
    let body = ResponseBody::decode(b"42", false, Some("application/json;charset=UTF-8"));
    assert_eq!(body, ResponseBody::Json(json!(42)));

    let body = ResponseBody::decode(b"42", false, Some("text/plain"));
    assert_eq!(body, ResponseBody::Text("42".to_string()));
}

#[test]
fn decode_keeps_binary_and_empty_payloads() {
    let zip = vec![0x50, 0x4b, 0x03, 0x04, 0xff, 0xfe];
    assert_eq!(ResponseBody::decode(&zip, false, None), ResponseBody::Binary(zip.clone()));
    assert_eq!(ResponseBody::decode(b"", true, None), ResponseBody::Empty);
}

#[test]
fn envelope_serializes_camel_case() {
    let env = envelope(404, ResponseBody::Text("not found".to_string()));
    let v = serde_json::to_value(&env).unwrap();
    assert_eq!(v["response"]["statusCode"], json!(404));
    assert_eq!(v["response"]["isError"], json!(true));
    assert_eq!(v["response"]["body"], json!("not found"));
    assert_eq!(v["request"]["method"], json!("GET"));
    assert!(v["request"].get("body").is_none());
}

#[test]
fn error_message_uses_sai360_messages() {
    let env = envelope(
        422,
        ResponseBody::Json(json!({
            "ERROR": ["name is required", "owner unknown"],
            "INFO": ["1 record skipped"],
            "WARNING": []
        })),
    );
    assert_eq!(
        env.error_message(),
        "Request failed with status 422:\nERROR: name is required; owner unknown\nINFO: 1 record skipped"
    );
}

#[test]
fn error_message_falls_back_to_raw_body() {
    let env = envelope(500, ResponseBody::Json(json!({ "message": "boom" })));
    assert_eq!(env.error_message(), "Request failed with status 500:\n{\"message\":\"boom\"}");

    let env = envelope(400, ResponseBody::Text("<error>bad xml</error>".to_string()));
    assert_eq!(env.error_message(), "Request failed with status 400:\n<error>bad xml</error>");
}
