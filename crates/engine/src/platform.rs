//! Real implementation of [`DeckApi`] over HTTP.
//!
//! - [`ReqwestDeckApi`]: plain reqwest client against a fixed base URL

use crate::query::{add_query_params, DeckQuery};
use crate::traits::*;
use reqwest::Method;
use serde_json::Value;

/// Default address of a locally running Card Games Engine.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

// ===========================================================================
// Network – wraps reqwest
// ===========================================================================

pub struct ReqwestDeckApi {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestDeckApi {
    /// Build a client for `base_url`. A single trailing `/` is dropped so
    /// paths can always start with one.
    pub fn new(base_url: &str) -> ApiResult<Self> {
        // reqwest is built without a bundled crypto provider; installing
        // twice returns Err, which is fine.
        let _ = rustls::crypto::ring::default_provider().install_default();

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::Other(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, base_url))
    }

    /// Use a preconfigured client (proxy settings, default headers, ...).
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.strip_suffix('/').unwrap_or(base_url).to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, method: Method, path: &str) -> ApiResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "dispatching request");

        let resp = self
            .client
            .request(method.clone(), &url)
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("{} {}: {}", method, url, e)))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("reading body: {}", e)))?;
        let body = parse_body(&text);

        tracing::debug!(status = status.as_u16(), "response received");
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl DeckApi for ReqwestDeckApi {
    async fn create(&self, query: &DeckQuery) -> ApiResult<Value> {
        self.send(Method::POST, &add_query_params("/create", query))
            .await
    }

    async fn open(&self, guid: &str) -> ApiResult<Value> {
        self.send(Method::GET, &format!("/open/{}", guid)).await
    }

    async fn draw(&self, guid: &str, query: &DeckQuery) -> ApiResult<Value> {
        let path = add_query_params(&format!("/draw/{}", guid), query);
        self.send(Method::PATCH, &path).await
    }
}

/// JSON if it parses, otherwise the raw text as a JSON string. The backend
/// writes plain-text bodies for most of its errors.
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// One-shot HTTP stub: accepts a single connection, answers with
    /// `status` and `body`, and hands back the request line it saw.
    async fn stub_server(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
            let head = String::from_utf8_lossy(&buf).to_string();
            head.lines().next().unwrap_or_default().to_string()
        });
        (format!("http://{}", addr), handle)
    }

    /// Loopback client that ignores any proxy env of the test machine.
    fn local_api(base: &str) -> ReqwestDeckApi {
        let _ = rustls::crypto::ring::default_provider().install_default();
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        ReqwestDeckApi::with_client(client, base)
    }

    #[tokio::test]
    async fn test_create_posts_with_query() {
        let (base, server) = stub_server("200 OK", r#"{"deck_id":"abc","shuffled":true,"remaining":52}"#).await;
        let api = local_api(&base);
        let query = DeckQuery {
            cards: String::new(),
            shuffled: true,
            count: 0,
        };

        let body = api.create(&query).await.unwrap();
        assert_eq!(body["deck_id"], "abc");
        assert_eq!(server.await.unwrap(), "POST /create?shuffled=true HTTP/1.1");
    }

    #[tokio::test]
    async fn test_open_gets_guid_path() {
        let (base, server) = stub_server("200 OK", r#"{"deck_id":"abc","cards":[]}"#).await;
        let api = local_api(&format!("{}/", base));
        assert_eq!(api.base_url(), base);

        let body = api.open("abc").await.unwrap();
        assert_eq!(body["cards"], serde_json::json!([]));
        assert_eq!(server.await.unwrap(), "GET /open/abc HTTP/1.1");
    }

    #[tokio::test]
    async fn test_draw_patches_with_count() {
        let (base, server) = stub_server("200 OK", r#"{"cards":[{"code":"KH"}]}"#).await;
        let api = local_api(&base);

        api.draw("abc", &DeckQuery::with_count(2)).await.unwrap();
        assert_eq!(server.await.unwrap(), "PATCH /draw/abc?count=2 HTTP/1.1");
    }

    #[tokio::test]
    async fn test_error_status_keeps_plain_text_body() {
        let (base, _server) = stub_server("400 Bad Request", "invalid UUID length: 3").await;
        let api = local_api(&base);

        match api.open("abc").await {
            Err(ApiError::Status { status, body }) => {
                assert_eq!(status, 400);
                assert_eq!(body, Value::String("invalid UUID length: 3".into()));
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = local_api(&format!("http://{}", addr));
        let err = api.open("abc").await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
        assert_eq!(err.error_code(), crate::types::ErrorCode::NetworkError);
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body("{\"a\":1}"), serde_json::json!({ "a": 1 }));
        assert_eq!(parse_body("oops"), Value::String("oops".into()));
    }
}
