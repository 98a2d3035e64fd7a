//! Client error taxonomy.

use tally_protocol::ProtocolError;
use thiserror::Error;

/// Errors surfaced by a [`crate::Session`].
///
/// None of these are process-fatal; callers decide whether to retry,
/// abort, or continue.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The WebSocket connection or handshake could not be established.
    #[error("failed to connect: {context}")]
    Connect {
        /// What went wrong while connecting.
        context: String,
    },

    /// The endpoint requires authentication but no password was configured.
    #[error("endpoint requires authentication but no password is configured")]
    AuthRequired,

    /// The endpoint rejected the supplied credentials.
    #[error("authentication rejected by the endpoint")]
    AuthRejected,

    /// The connection closed while the call was pending, or the session is
    /// no longer connected.
    #[error("connection closed")]
    Closed,

    /// No response arrived within the configured per-call budget.
    #[error("request {request_type} timed out after {timeout_ms}ms")]
    Timeout {
        /// The request type that timed out.
        request_type: String,
        /// The budget that elapsed.
        timeout_ms: u64,
    },

    /// The endpoint explicitly rejected the call.
    #[error("request failed with code {code}: {comment}")]
    Call {
        /// Status code reported by the endpoint.
        code: u16,
        /// Endpoint-provided explanation (may be empty).
        comment: String,
    },

    /// The endpoint returned a payload that does not match the documented shape.
    #[error("unexpected response shape for {request_type}: {source}")]
    Response {
        /// The request whose response failed to decode.
        request_type: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Wire-format violation from the endpoint.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_display() {
        let err = ClientError::Connect {
            context: "connection refused".into(),
        };
        assert_eq!(err.to_string(), "failed to connect: connection refused");
    }

    #[test]
    fn timeout_display() {
        let err = ClientError::Timeout {
            request_type: "GetVersion".into(),
            timeout_ms: 15_000,
        };
        assert!(err.to_string().contains("GetVersion"));
        assert!(err.to_string().contains("15000ms"));
    }

    #[test]
    fn call_display_includes_code() {
        let err = ClientError::Call {
            code: 601,
            comment: "already exists".into(),
        };
        assert!(err.to_string().contains("601"));
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn closed_display() {
        assert_eq!(ClientError::Closed.to_string(), "connection closed");
    }

    #[test]
    fn protocol_error_converts() {
        let source = serde_json::from_str::<serde_json::Value>("oops").unwrap_err();
        let err: ClientError = ProtocolError::MalformedFrame { source }.into();
        assert!(matches!(err, ClientError::Protocol(_)));
    }

    #[test]
    fn client_error_is_std_error() {
        let _: &dyn std::error::Error = &ClientError::AuthRequired;
    }
}
