use serde_json::Value;
use thiserror::Error;

/// Status and body of a failed response, kept verbatim for the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorPayload {
    pub status: u16,
    pub body: Option<Value>,
}

impl ErrorPayload {
    /// Non-JSON bodies are kept as a JSON string.
    pub fn from_text(status: u16, text: &str) -> Self {
        let trimmed = text.trim();
        let body = if trimmed.is_empty() {
            None
        } else {
            Some(serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string())))
        };
        Self { status, body }
    }

    /// `message` field of a `{ message }` error body.
    pub fn message(&self) -> Option<&str> {
        self.body.as_ref()?.get("message")?.as_str()
    }

    fn describe(&self, fallback: &str) -> String {
        match self.message() {
            Some(message) => format!("{} ({})", message, self.status),
            None => format!("{} ({})", fallback, self.status),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// 401: token missing, invalid or expired.
    #[error("{}", .0.describe("Session expired"))]
    AuthenticationExpired(ErrorPayload),

    /// 403
    #[error("{}", .0.describe("Forbidden"))]
    Forbidden(ErrorPayload),

    /// 404
    #[error("{}", .0.describe("Not found"))]
    NotFound(ErrorPayload),

    /// 5xx
    #[error("{}", .0.describe("Server error"))]
    Server(ErrorPayload),

    /// The request never got a response.
    #[error("Network unreachable: {0}")]
    NetworkUnreachable(String),

    /// Any other non-success status, usually a validation or business rule
    /// message for a form.
    #[error("{}", .0.describe("Request rejected"))]
    Validation(ErrorPayload),

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Failed to serialize request: {0}")]
    Encode(String),
}

impl ApiError {
    /// Classify a non-success response.
    pub fn from_response(status: u16, body: &str) -> Self {
        let payload = ErrorPayload::from_text(status, body);
        match status {
            401 => ApiError::AuthenticationExpired(payload),
            403 => ApiError::Forbidden(payload),
            404 => ApiError::NotFound(payload),
            s if s >= 500 => ApiError::Server(payload),
            _ => ApiError::Validation(payload),
        }
    }

    pub fn payload(&self) -> Option<&ErrorPayload> {
        match self {
            ApiError::AuthenticationExpired(p)
            | ApiError::Forbidden(p)
            | ApiError::NotFound(p)
            | ApiError::Server(p)
            | ApiError::Validation(p) => Some(p),
            ApiError::NetworkUnreachable(_) | ApiError::Decode(_) | ApiError::Encode(_) => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.payload().map(|p| p.status)
    }

    /// Message the server put in the error body, if any.
    pub fn server_message(&self) -> Option<String> {
        self.payload()?.message().map(str::to_string)
    }

    /// Failures worth one silent retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Server(_) | ApiError::NetworkUnreachable(_))
    }
}
