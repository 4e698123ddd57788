use std::collections::BTreeMap;
use std::time::Duration;

use sai360_core::HttpMethod;
use sai360_transport::{
    DispatcherConfig, HttpClient, HttpError, HttpRequestParts, ReqwestHttpClient,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Accepts one connection, captures the raw request and answers with `response`.
async fn serve_once(response: &'static str) -> (url::Url, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        request
    });
    (url::Url::parse(&format!("http://{addr}/bwise")).unwrap(), handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(end) = text.find("\r\n\r\n") {
            let content_length = text[..end]
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

fn client() -> ReqwestHttpClient {
    ReqwestHttpClient::new(&DispatcherConfig::default()).unwrap()
}

fn request(method: HttpMethod, url: url::Url) -> HttpRequestParts {
    HttpRequestParts {
        method,
        url,
        headers: BTreeMap::new(),
        body: None,
    }
}

#[tokio::test]
async fn sends_headers_and_body_and_reads_response() {
    let (url, server) = serve_once(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nX-Trace: a\r\nX-Trace: b\r\nContent-Length: 11\r\nConnection: close\r\n\r\n{\"ok\":true}",
    )
    .await;

    let mut req = request(HttpMethod::Post, url);
    req.set_header("bwise-session", "abc123");
    req.set_header("Content-Type", "application/xml");
    req.body = Some(b"<Risk/>".to_vec());

    let resp = client()
        .send(req, Duration::from_secs(5), 1024 * 1024)
        .await
        .unwrap();
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, b"{\"ok\":true}".to_vec());
    let headers = resp.header_map();
    assert_eq!(headers.get("x-trace").map(String::as_str), Some("a, b"));

    let raw = server.await.unwrap();
    assert!(raw.starts_with("POST /bwise HTTP/1.1\r\n"));
    assert!(raw.to_ascii_lowercase().contains("bwise-session: abc123"));
    assert!(raw.to_ascii_lowercase().contains("content-type: application/xml"));
    assert!(raw.ends_with("<Risk/>"));
}

#[tokio::test]
async fn error_statuses_are_not_transport_errors() {
    let (url, server) = serve_once(
        "HTTP/1.1 403 Forbidden\r\nContent-Length: 6\r\nConnection: close\r\n\r\ndenied",
    )
    .await;

    let resp = client()
        .send(request(HttpMethod::Get, url), Duration::from_secs(5), 1024)
        .await
        .unwrap();
    assert_eq!(resp.status, 403);
    assert_eq!(resp.body, b"denied".to_vec());
    server.await.unwrap();
}

#[tokio::test]
async fn enforces_response_size_limit() {
    let (url, server) = serve_once(
        "HTTP/1.1 200 OK\r\nContent-Length: 20\r\nConnection: close\r\n\r\n01234567890123456789",
    )
    .await;

    let err = client()
        .send(request(HttpMethod::Get, url), Duration::from_secs(5), 10)
        .await
        .unwrap_err();
    match err {
        HttpError::ResponseTooLarge { max_bytes } => assert_eq!(max_bytes, 10),
        other => panic!("expected response too large error, got {other:?}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn refused_connection_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = url::Url::parse(&format!("http://{addr}/api/login")).unwrap();
    let err = client()
        .send(request(HttpMethod::Post, url), Duration::from_secs(5), 1024)
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn slow_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        drop(socket);
    });

    let url = url::Url::parse(&format!("http://{addr}/api/log")).unwrap();
    let err = client()
        .send(request(HttpMethod::Get, url), Duration::from_millis(200), 1024)
        .await
        .unwrap_err();
    assert!(matches!(err, HttpError::Timeout), "got {err:?}");
    server.abort();
}
