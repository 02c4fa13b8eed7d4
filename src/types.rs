//! Common types and data structures

use crate::api::ApiError;

/// Body of `POST /save`
#[derive(serde::Serialize)]
pub struct SaveRequest<'a> {
    pub value: &'a str,
}

/// Successful `POST /save` response
#[derive(serde::Deserialize)]
pub struct SaveResponse {
    #[serde(default)]
    pub key: Option<String>,
    /// Human-readable acknowledgement, e.g. "Saved successfully"
    #[serde(default)]
    pub message: Option<String>,
}

/// Successful `GET /get/:key` response
#[derive(serde::Deserialize)]
pub struct GetResponse {
    #[serde(default)]
    pub data: Option<String>,
}

/// Error body the backend attaches to non-2xx responses
#[derive(serde::Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Lifecycle of one request kind (save or get)
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestStatus {
    #[default]
    Idle,
    Pending,
    Finished(Result<String, ApiError>),
}

impl RequestStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestStatus::Pending)
    }

    /// Take a finished result, leaving the slot idle. Pending and idle are left untouched.
    pub fn take_finished(&mut self) -> Option<Result<String, ApiError>> {
        if matches!(self, RequestStatus::Finished(_)) {
            match std::mem::take(self) {
                RequestStatus::Finished(result) => Some(result),
                _ => None,
            }
        } else {
            None
        }
    }
}

/// Shared between the UI thread and request tasks
#[derive(Default)]
pub struct RequestState {
    pub save: RequestStatus,
    pub get: RequestStatus,
}

impl RequestState {
    pub fn slot(&self, kind: RequestKind) -> &RequestStatus {
        match kind {
            RequestKind::Save => &self.save,
            RequestKind::Get => &self.get,
        }
    }

    pub fn slot_mut(&mut self, kind: RequestKind) -> &mut RequestStatus {
        match kind {
            RequestKind::Save => &mut self.save,
            RequestKind::Get => &mut self.get,
        }
    }
}

/// Which of the two backend calls a request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Save,
    Get,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_finished_resets_to_idle() {
        let mut status = RequestStatus::Finished(Ok("abc123".into()));
        assert_eq!(status.take_finished(), Some(Ok("abc123".into())));
        assert_eq!(status, RequestStatus::Idle);
        assert_eq!(status.take_finished(), None);
    }

    #[test]
    fn take_finished_leaves_pending_alone() {
        let mut status = RequestStatus::Pending;
        assert_eq!(status.take_finished(), None);
        assert!(status.is_pending());
    }

    #[test]
    fn error_body_tolerates_missing_field() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.error.is_none());
        let body: ErrorBody = serde_json::from_str(r#"{"error":"Invalid Key"}"#).unwrap();
        assert_eq!(body.error.as_deref(), Some("Invalid Key"));
    }

    #[test]
    fn save_response_reads_key_and_message() {
        let body: SaveResponse =
            serde_json::from_str(r#"{"message":"Saved successfully","key":"a1b2c3"}"#).unwrap();
        assert_eq!(body.key.as_deref(), Some("a1b2c3"));
        assert_eq!(body.message.as_deref(), Some("Saved successfully"));

        let body: SaveResponse = serde_json::from_str(r#"{"key":"a1b2c3"}"#).unwrap();
        assert!(body.message.is_none());
    }

    #[test]
    fn save_request_serializes_value_field() {
        let json = serde_json::to_string(&SaveRequest { value: "hello" }).unwrap();
        assert_eq!(json, r#"{"value":"hello"}"#);
    }
}
