use sai360_core::{graphql_errors, GraphQlRequest, RequestError};
use serde_json::json;

#[test]
fn body_omits_empty_parts() {
    let body = GraphQlRequest::new("  { risks { name } }\n").to_body().unwrap();
    assert_eq!(body, json!({ "query": "{ risks { name } }" }));

    let body = GraphQlRequest::new("query R($n: Int) { risks(first: $n) { name } }")
        .variable("n", 5)
        .operation_name(" R ")
        .to_body()
        .unwrap();
    assert_eq!(body["variables"], json!({ "n": 5 }));
    assert_eq!(body["operationName"], json!("R"));
}

#[test]
fn blank_query_is_rejected() {
    let err = GraphQlRequest::new("   ").to_body().unwrap_err();
    assert!(matches!(err, RequestError::EmptyQuery));
}

#[test]
fn errors_are_joined() {
    let body = json!({
        "errors": [
            { "message": "Field 'x' not found" },
            { "path": ["risks"] }
        ]
    });
    assert_eq!(
        graphql_errors(&body).unwrap(),
        "Field 'x' not found; {\"path\":[\"risks\"]}"
    );
    assert_eq!(graphql_errors(&json!({ "data": {} })), None);
}
