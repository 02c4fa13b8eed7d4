//! HTTP client for the clipboard backend
//!
//! The backend exposes two calls: `POST /save {value}` answering `{key}` and
//! `GET /get/:key` answering `{data}`. Failures carry `{error}`.

use crate::constants::{MSG_GET_MISSING_DATA, MSG_SAVE_MISSING_KEY};
use crate::types::{ErrorBody, GetResponse, SaveRequest, SaveResponse};
use crate::utils::normalize_backend_url;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("invalid backend URL: {0}")]
    InvalidBaseUrl(String),

    /// Message supplied by the backend in its `error` field
    #[error("{0}")]
    Server(String),

    /// Non-2xx response without a usable error body
    #[error("HTTP {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Transport(String),

    /// Key that cannot be sent as a single path segment
    #[error("invalid key: {0:?}")]
    InvalidKey(String),

    /// 2xx response without the expected field
    #[error("{0}")]
    MissingField(&'static str),
}

impl ApiError {
    /// The backend's own message, if this error carries one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Server(msg) => Some(msg),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}

#[derive(Clone)]
pub struct ClipboardClient {
    base: Url,
    http: reqwest::Client,
}

impl ClipboardClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let normalized = normalize_backend_url(base_url);
        let base = Url::parse(&normalized)
            .map_err(|_| ApiError::InvalidBaseUrl(base_url.trim().to_string()))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl(base_url.trim().to_string()));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base, http })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Store `value` and return the key the backend issued for it.
    pub async fn save(&self, value: &str) -> Result<String, ApiError> {
        let url = self.endpoint(&["save"])?;
        debug!(url = %url, bytes = value.len(), "POST save");
        let response = self
            .http
            .post(url)
            .json(&SaveRequest { value })
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        decode_save(status, &body)
    }

    /// Fetch the text stored under `key`.
    pub async fn get(&self, key: &str) -> Result<String, ApiError> {
        let url = self.endpoint(&["get", key])?;
        debug!(url = %url, "GET data");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        decode_get(status, &body)
    }

    /// Base URL with `segments` appended, each percent-encoded as one path segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        // `url` resolves dot segments instead of encoding them
        if let Some(dot) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(ApiError::InvalidKey(dot.to_string()));
        }
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

pub fn decode_save(status: StatusCode, body: &str) -> Result<String, ApiError> {
    decode(
        status,
        body,
        |r: SaveResponse| {
            if let Some(message) = &r.message {
                debug!(message = %message, "Save acknowledged");
            }
            r.key
        },
        MSG_SAVE_MISSING_KEY,
    )
}

pub fn decode_get(status: StatusCode, body: &str) -> Result<String, ApiError> {
    decode(status, body, |r: GetResponse| r.data, MSG_GET_MISSING_DATA)
}

fn decode<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
    field: impl FnOnce(T) -> Option<String>,
    missing: &'static str,
) -> Result<String, ApiError> {
    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty());
        return Err(match message {
            Some(msg) => ApiError::Server(msg),
            None => ApiError::Status(status.as_u16()),
        });
    }

    serde_json::from_str::<T>(body)
        .ok()
        .and_then(field)
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::MissingField(missing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn client(base: &str) -> ClipboardClient {
        ClipboardClient::new(base, Duration::from_secs(5)).unwrap()
    }

    /// Accept one connection, answer with a canned JSON response and hand back the raw request.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&buf[..n]);
                if request_complete(&received) {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&received).into_owned()
        });
        (format!("http://{}", addr), handle)
    }

    fn request_complete(data: &[u8]) -> bool {
        let text = String::from_utf8_lossy(data);
        let Some(end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                if name.eq_ignore_ascii_case("content-length") {
                    value.trim().parse::<usize>().ok()
                } else {
                    None
                }
            })
            .unwrap_or(0);
        data.len() >= end + 4 + content_length
    }

    #[test]
    fn decode_save_returns_key() {
        let key = decode_save(StatusCode::OK, r#"{"message":"Saved successfully","key":"a1b2c3"}"#);
        assert_eq!(key, Ok("a1b2c3".to_string()));
    }

    #[test]
    fn decode_save_without_key_is_missing_field() {
        let result = decode_save(StatusCode::OK, r#"{"message":"Saved successfully"}"#);
        assert_eq!(result, Err(ApiError::MissingField(MSG_SAVE_MISSING_KEY)));
        let result = decode_save(StatusCode::OK, r#"{"key":""}"#);
        assert_eq!(result, Err(ApiError::MissingField(MSG_SAVE_MISSING_KEY)));
        let result = decode_save(StatusCode::OK, "not json");
        assert_eq!(result, Err(ApiError::MissingField(MSG_SAVE_MISSING_KEY)));
    }

    #[test]
    fn decode_get_passes_server_error_through() {
        let result = decode_get(StatusCode::NOT_FOUND, r#"{"error":"Invalid Key"}"#);
        assert_eq!(result, Err(ApiError::Server("Invalid Key".into())));
        assert_eq!(result.unwrap_err().server_message(), Some("Invalid Key"));
    }

    #[test]
    fn decode_get_falls_back_to_status() {
        let result = decode_get(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(result, Err(ApiError::Status(502)));
        let result = decode_get(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":""}"#);
        assert_eq!(result, Err(ApiError::Status(500)));
        assert_eq!(ApiError::Status(500).server_message(), None);
    }

    #[test]
    fn decode_get_returns_data() {
        let result = decode_get(StatusCode::OK, r#"{"data":"hello\nworld"}"#);
        assert_eq!(result, Ok("hello\nworld".to_string()));
        let result = decode_get(StatusCode::OK, r#"{"data":null}"#);
        assert_eq!(result, Err(ApiError::MissingField(MSG_GET_MISSING_DATA)));
    }

    #[test]
    fn new_rejects_bad_base_urls() {
        let timeout = Duration::from_secs(1);
        assert!(matches!(
            ClipboardClient::new("not a url", timeout),
            Err(ApiError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            ClipboardClient::new("mailto:someone@example.com", timeout),
            Err(ApiError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            ClipboardClient::new("ftp://example.com", timeout),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn endpoints_are_joined_and_encoded() {
        let c = client(" http://example.com/clip/ ");
        assert_eq!(c.endpoint(&["save"]).unwrap().as_str(), "http://example.com/clip/save");
        assert_eq!(
            c.endpoint(&["get", "a b/c"]).unwrap().as_str(),
            "http://example.com/clip/get/a%20b%2Fc"
        );
        let c = client("http://localhost:8080");
        assert_eq!(c.endpoint(&["get", "abc123"]).unwrap().as_str(), "http://localhost:8080/get/abc123");
    }

    #[test]
    fn dot_keys_are_not_collapsed_into_the_path() {
        let c = client("http://localhost:8080");
        assert_eq!(c.endpoint(&["get", ".."]), Err(ApiError::InvalidKey("..".into())));
        assert_eq!(c.endpoint(&["get", "."]), Err(ApiError::InvalidKey(".".into())));
        assert_eq!(
            c.endpoint(&["get", "..."]).unwrap().as_str(),
            "http://localhost:8080/get/..."
        );
    }

    #[tokio::test]
    async fn get_dot_key_is_refused_before_sending() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        // Nothing listens, so a Transport error would mean a request went out
        let result = client(&format!("http://{}", addr)).get("..").await;
        assert_eq!(result, Err(ApiError::InvalidKey("..".into())));
    }

    #[tokio::test]
    async fn save_posts_value_and_returns_key() {
        let (base, server) = serve_once("200 OK", r#"{"message":"Saved successfully","key":"0f3a9c"}"#).await;
        let key = client(&base).save("  some text ").await;
        assert_eq!(key, Ok("0f3a9c".to_string()));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /save HTTP/1.1"), "{request}");
        assert!(request.ends_with(r#"{"value":"  some text "}"#), "{request}");
    }

    #[tokio::test]
    async fn save_surfaces_server_error() {
        let (base, server) = serve_once("400 Bad Request", r#"{"error":"Value cannot be empty"}"#).await;
        let result = client(&base).save(" ").await;
        assert_eq!(result, Err(ApiError::Server("Value cannot be empty".into())));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn get_requests_encoded_key() {
        let (base, server) = serve_once("200 OK", r#"{"data":"stored text"}"#).await;
        let data = client(&base).get("ab cd").await;
        assert_eq!(data, Ok("stored text".to_string()));

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /get/ab%20cd HTTP/1.1"), "{request}");
    }

    #[tokio::test]
    async fn get_unknown_key_is_server_error() {
        let (base, server) = serve_once("404 Not Found", r#"{"error":"Invalid Key"}"#).await;
        let result = client(&base).get("ffffff").await;
        assert_eq!(result, Err(ApiError::Server("Invalid Key".into())));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_backend_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = client(&format!("http://{}", addr)).get("abc123").await;
        assert!(matches!(result, Err(ApiError::Transport(_))), "{result:?}");
    }
}
