use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use sai360_core::Secret;
use sai360_transport::{
    login, DispatchError, HttpClient, HttpError, HttpRequestParts, HttpResponseParts,
    LoginResponse, SessionToken,
};
use serde_json::json;

struct FixedResponse {
    status: u16,
    body: &'static str,
    seen: Mutex<Vec<HttpRequestParts>>,
}

impl FixedResponse {
    fn new(status: u16, body: &'static str) -> Self {
        Self {
            status,
            body,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl HttpClient for FixedResponse {
    async fn send(
        &self,
        req: HttpRequestParts,
        _timeout: Duration,
        _max_response_bytes: usize,
    ) -> Result<HttpResponseParts, HttpError> {
        self.seen.lock().unwrap().push(req);
        Ok(HttpResponseParts {
            status: self.status,
            headers: vec![],
            body: self.body.as_bytes().to_vec(),
        })
    }
}

async fn run(http: &FixedResponse) -> Result<LoginResponse, DispatchError> {
    login(
        http,
        "https://grc.example/bwise/",
        "svc user",
        &Secret::new("p@ss word"),
        Duration::from_secs(5),
        1024,
    )
    .await
}

#[tokio::test]
async fn posts_form_encoded_credentials() {
    let http = FixedResponse::new(200, r#"{"sessionid":"s-1"}"#);
    let resp = run(&http).await.unwrap();
    assert_eq!(resp.session_token(), Some(SessionToken::new("s-1")));

    let seen = http.seen.lock().unwrap();
    let req = &seen[0];
    assert_eq!(req.url.as_str(), "https://grc.example/bwise/api/login");
    assert_eq!(
        req.body.as_deref(),
        Some(b"username=svc+user&password=p%40ss+word".as_slice())
    );
    assert_eq!(req.header("Content-Type"), Some("application/x-www-form-urlencoded"));
}

#[test]
fn sessionid_takes_precedence_over_token() {
    let resp = LoginResponse::from_json(&json!({ "sessionid": "a", "token": "b" }));
    assert_eq!(resp.session_token(), Some(SessionToken::new("a")));

    let resp = LoginResponse::from_json(&json!({ "sessionid": "", "token": "b" }));
    assert_eq!(resp.session_token(), Some(SessionToken::new("b")));

    let resp = LoginResponse::from_json(&json!({ "sessionid": { "id": "x" } }));
    assert_eq!(resp.session_token(), None);
}

#[test]
fn numeric_session_ids_are_accepted() {
    let resp = LoginResponse::from_json(&json!({ "sessionid": 12345 }));
    assert_eq!(resp.session_token(), Some(SessionToken::new("12345")));

    let resp = LoginResponse::from_json(&json!({ "sessionid": null, "token": 7 }));
    assert_eq!(resp.session_token(), Some(SessionToken::new("7")));
}

#[tokio::test]
async fn answer_without_token_is_an_error() {
    let http = FixedResponse::new(200, r#"{"user":"svc"}"#);
    let err = run(&http).await.unwrap_err();
    assert!(matches!(err, DispatchError::MissingSessionToken));
}

#[tokio::test]
async fn non_json_answer_is_reported() {
    let http = FixedResponse::new(200, "<html>maintenance</html>");
    let err = run(&http).await.unwrap_err();
    assert!(matches!(err, DispatchError::LoginResponse(_)));
}

#[tokio::test]
async fn rejected_credentials_keep_status_and_body() {
    let http = FixedResponse::new(403, "account locked");
    let err = run(&http).await.unwrap_err();
    assert_eq!(err.status_code(), Some(403));
    assert_eq!(
        err.to_string(),
        "SAI360 login failed with status 403: account locked"
    );
}
