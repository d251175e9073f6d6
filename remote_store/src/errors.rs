use serde::Deserialize;
use thiserror::Error;

/// PostgREST code for a single-object request that matched zero or many rows
pub const SINGLE_ROW_MISMATCH_CODE: &str = "PGRST116";
/// SQLSTATE for unique constraint violations
pub const UNIQUE_VIOLATION_CODE: &str = "23505";

/// Coarse classification of a remote failure.
///
/// Callers get the same error type for every failure; the kind only tells
/// them what the store reported, it does not change propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Transport,
    InvalidInput,
    Unknown,
}

/// The single error every data-access operation fails with.
///
/// Displays as the remote store's message, verbatim.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct RemoteQueryError {
    pub kind: ErrorKind,
    pub message: String,
    /// HTTP status, when the failure came back as a response
    pub status: Option<u16>,
    /// Store error code (PostgREST or SQLSTATE)
    pub code: Option<String>,
    /// Extra context sent by the store, e.g. "The result contains 0 rows"
    pub details: Option<String>,
    /// Store's suggestion for fixing the request
    pub hint: Option<String>,
}

/// Error body sent by PostgREST
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorPayload {
    pub message: Option<String>,
    pub code: Option<String>,
    pub details: Option<String>,
    pub hint: Option<String>,
}

impl RemoteQueryError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            code: None,
            details: None,
            hint: None,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Build an error from a failed HTTP response, classifying it by status and code
    pub fn from_response(status: u16, body: &str) -> Self {
        let payload = serde_json::from_str::<ErrorPayload>(body).unwrap_or_default();
        let message = payload
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    format!("request failed with status {}", status)
                } else {
                    body.trim().to_string()
                }
            });

        let kind = Self::classify(status, payload.code.as_deref());
        Self {
            kind,
            message,
            status: Some(status),
            code: payload.code,
            details: payload.details,
            hint: payload.hint,
        }
    }

    fn classify(status: u16, code: Option<&str>) -> ErrorKind {
        match (status, code) {
            (_, Some(SINGLE_ROW_MISMATCH_CODE)) => ErrorKind::NotFound,
            (_, Some(UNIQUE_VIOLATION_CODE)) => ErrorKind::Conflict,
            (404 | 406, _) => ErrorKind::NotFound,
            (409, _) => ErrorKind::Conflict,
            _ => ErrorKind::Unknown,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

impl From<reqwest::Error> for RemoteQueryError {
    fn from(err: reqwest::Error) -> Self {
        let mut error = Self::transport(err.to_string());
        error.status = err.status().map(|s| s.as_u16());
        error
    }
}

impl From<serde_json::Error> for RemoteQueryError {
    fn from(err: serde_json::Error) -> Self {
        Self::transport(format!("invalid response body: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_row_mismatch_is_not_found() {
        let body = r#"{"code":"PGRST116","details":"The result contains 0 rows","hint":null,"message":"JSON object requested, multiple (or no) rows returned"}"#;
        let err = RemoteQueryError::from_response(406, body);
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.status, Some(406));
        assert_eq!(err.code.as_deref(), Some("PGRST116"));
        assert_eq!(err.details.as_deref(), Some("The result contains 0 rows"));
        assert_eq!(err.hint, None);
        assert_eq!(
            err.to_string(),
            "JSON object requested, multiple (or no) rows returned"
        );
    }

    #[test]
    fn test_unique_violation_is_conflict() {
        let body = r#"{"code":"23505","message":"duplicate key value violates unique constraint \"users_pkey\""}"#;
        let err = RemoteQueryError::from_response(409, body);
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert!(err.message.starts_with("duplicate key"));
    }

    #[test]
    fn test_hint_is_kept() {
        let body = r#"{"code":"42P01","details":null,"hint":"Perhaps you meant the table 'public.posts'","message":"relation \"public.post\" does not exist"}"#;
        let err = RemoteQueryError::from_response(404, body);
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.details, None);
        assert_eq!(
            err.hint.as_deref(),
            Some("Perhaps you meant the table 'public.posts'")
        );
        assert_eq!(err.to_string(), r#"relation "public.post" does not exist"#);
    }

    #[test]
    fn test_non_json_body_is_kept_as_message() {
        let err = RemoteQueryError::from_response(502, "Bad Gateway\n");
        assert_eq!(err.kind, ErrorKind::Unknown);
        assert_eq!(err.message, "Bad Gateway");

        let err = RemoteQueryError::from_response(500, "");
        assert_eq!(err.message, "request failed with status 500");
    }
}
