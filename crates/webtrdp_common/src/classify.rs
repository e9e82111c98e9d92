//! Error classifier
//!
//! Turns any [`ClientError`] into the one line written to the session's
//! notice slot. Pure: the same (action, error) always yields the same text.

use crate::error::ClientError;

/// Message for a failed `action` ("load telegrams", "load configuration", ...).
///
/// Unreachable gets its own wording so the operator knows to look at
/// connectivity rather than backend logic.
pub fn classify(action: &str, err: &ClientError) -> String {
    match err {
        ClientError::Unreachable { base_url, .. } => unreachable_message(action, base_url),
        _ => err.message().unwrap_or_else(|| generic_message(action)),
    }
}

/// Like [`classify`], but the generic fallback names the HTTP status.
///
/// Used by commands, where an empty error body still needs a hint.
pub fn classify_with_status(action: &str, err: &ClientError) -> String {
    match (err.message(), err.status()) {
        (None, Some(status)) if !matches!(err, ClientError::Unreachable { .. }) => {
            format!("{} (HTTP {})", generic_message(action), status)
        }
        _ => classify(action, err),
    }
}

pub fn unreachable_message(action: &str, base_url: &str) -> String {
    format!(
        "Could not {} – the backend at {} is unreachable. Is the server running and CORS allowed?",
        action, base_url
    )
}

pub fn generic_message(action: &str) -> String {
    format!("Failed to {}", action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable() -> ClientError {
        ClientError::Unreachable {
            base_url: "http://localhost:8080".to_string(),
            detail: "connection refused".to_string(),
        }
    }

    #[test]
    fn test_unreachable_names_action_and_backend() {
        let msg = classify("load telegrams", &unreachable());
        assert!(msg.contains("load telegrams"));
        assert!(msg.contains("unreachable"));
        assert!(msg.contains("http://localhost:8080"));
        assert_eq!(
            msg,
            "Could not load telegrams – the backend at http://localhost:8080 is unreachable. Is the server running and CORS allowed?"
        );
    }

    #[test]
    fn test_empty_backend_body_uses_generic_form() {
        let err = ClientError::Backend {
            status: 500,
            message: None,
        };
        assert_eq!(classify("load telegrams", &err), "Failed to load telegrams");
        assert_eq!(
            classify_with_status("load configuration", &err),
            "Failed to load configuration (HTTP 500)"
        );
    }

    #[test]
    fn test_backend_body_is_shown_verbatim() {
        let err = ClientError::from_command_response(400, "Unknown configuration path");
        assert_eq!(classify("load configuration", &err), "Unknown configuration path");
        assert_eq!(
            classify_with_status("load configuration", &err),
            "Unknown configuration path"
        );
    }

    #[test]
    fn test_unreachable_ignores_status_annotation() {
        assert_eq!(
            classify_with_status("load configuration", &unreachable()),
            classify("load configuration", &unreachable())
        );
    }

    #[test]
    fn test_malformed_carries_its_own_message() {
        let err = ClientError::Malformed {
            what: "telegram".to_string(),
            detail: "expected an array".to_string(),
        };
        assert_eq!(
            classify("load telegrams", &err),
            "Unexpected telegram response: expected an array"
        );
    }

    #[test]
    fn test_classify_is_deterministic() {
        let err = ClientError::Backend {
            status: 503,
            message: Some("engine busy".to_string()),
        };
        assert_eq!(classify("scan configs", &err), classify("scan configs", &err));
    }
}
