//! Error types for webTRDP clients.

use thiserror::Error;

/// Every failure a backend operation can end in.
///
/// The transport layer decides the variant; nothing downstream inspects
/// message text to tell them apart.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// No HTTP response reached the client (refused, DNS, reset, timeout)
    #[error("Backend at {base_url} is unreachable: {detail}")]
    Unreachable { base_url: String, detail: String },

    /// A response arrived with a non-success status
    #[error("{}", backend_text(.status, .message))]
    Backend {
        status: u16,
        message: Option<String>,
    },

    /// A success response did not match the expected schema
    #[error("Unexpected {what} response: {detail}")]
    Malformed { what: String, detail: String },

    /// The backend (or the precondition check) rejected the request
    #[error("{message}")]
    ValidationFailed { status: Option<u16>, message: String },
}

fn backend_text(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => message.clone(),
        None => format!("Backend returned HTTP {}", status),
    }
}

/// Fieldless discriminant of [`ClientError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unreachable,
    Backend,
    Malformed,
    ValidationFailed,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Unreachable { .. } => ErrorKind::Unreachable,
            ClientError::Backend { .. } => ErrorKind::Backend,
            ClientError::Malformed { .. } => ErrorKind::Malformed,
            ClientError::ValidationFailed { .. } => ErrorKind::ValidationFailed,
        }
    }

    /// Operator-facing message carried by the error itself, if any.
    ///
    /// A backend error with an empty body has none, so the classifier falls
    /// back to its generic wording instead of showing blank text.
    pub fn message(&self) -> Option<String> {
        match self {
            ClientError::Unreachable { .. } => Some(self.to_string()),
            ClientError::Backend { message, .. } => message.clone(),
            ClientError::Malformed { .. } => Some(self.to_string()),
            ClientError::ValidationFailed { message, .. } => {
                (!message.is_empty()).then(|| message.clone())
            }
        }
    }

    /// HTTP status when a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Backend { status, .. } => Some(*status),
            ClientError::ValidationFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// Build the error for a non-success response to a query
    pub fn from_response(status: u16, body: &str) -> Self {
        ClientError::Backend {
            status,
            message: error_body_message(body),
        }
    }

    /// Build the error for a non-success response to a command.
    ///
    /// 4xx is the backend refusing the request, 5xx is the backend failing.
    pub fn from_command_response(status: u16, body: &str) -> Self {
        let message = error_body_message(body);
        if (400..500).contains(&status) {
            ClientError::ValidationFailed {
                status: Some(status),
                message: message.unwrap_or_default(),
            }
        } else {
            ClientError::Backend { status, message }
        }
    }
}

/// Extract the message from a failure body.
///
/// `{"error": "..."}` is unwrapped, anything else is taken verbatim.
pub fn error_body_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(trimmed) {
        if let Some(serde_json::Value::String(error)) = map.get("error") {
            let error = error.trim();
            return (!error.is_empty()).then(|| error.to_string());
        }
    }

    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_unwrapping() {
        assert_eq!(error_body_message(""), None);
        assert_eq!(error_body_message("  \n"), None);
        assert_eq!(
            error_body_message(r#"{"error":"TRDP engine is not initialized"}"#),
            Some("TRDP engine is not initialized".to_string())
        );
        assert_eq!(
            error_body_message("config file not found"),
            Some("config file not found".to_string())
        );
        // JSON without an error field is shown as-is
        assert_eq!(
            error_body_message(r#"{"detail":"x"}"#),
            Some(r#"{"detail":"x"}"#.to_string())
        );
    }

    #[test]
    fn test_query_failures_are_backend_errors() {
        let err = ClientError::from_response(404, "no such route");
        assert_eq!(err.kind(), ErrorKind::Backend);
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.message().as_deref(), Some("no such route"));
    }

    #[test]
    fn test_command_failures_split_on_status_class() {
        let err = ClientError::from_command_response(400, r#"{"error":"Missing required fields: path, host_name"}"#);
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert_eq!(err.status(), Some(400));
        assert_eq!(
            err.message().as_deref(),
            Some("Missing required fields: path, host_name")
        );

        let err = ClientError::from_command_response(500, "");
        assert_eq!(err.kind(), ErrorKind::Backend);
        assert_eq!(err.message(), None);
        assert_eq!(err.to_string(), "Backend returned HTTP 500");
    }

    #[test]
    fn test_empty_validation_message_is_absent() {
        let err = ClientError::from_command_response(404, "");
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert_eq!(err.message(), None);
    }
}
