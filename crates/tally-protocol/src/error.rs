//! Wire-format error type.

use thiserror::Error;

/// Errors produced while encoding or decoding protocol frames.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The frame was not valid JSON or did not match the envelope shape.
    #[error("malformed frame: {source}")]
    MalformedFrame {
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The envelope's `d` payload did not match the expected shape for its opcode.
    #[error("payload decode failed for op {op}: {source}")]
    PayloadDecode {
        /// Opcode of the envelope being decoded.
        op: u8,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A payload could not be serialized into an envelope.
    #[error("payload encode failed: {source}")]
    PayloadEncode {
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("not json").unwrap_err()
    }

    #[test]
    fn malformed_frame_display() {
        let err = ProtocolError::MalformedFrame {
            source: json_error(),
        };
        assert!(err.to_string().starts_with("malformed frame:"));
    }

    #[test]
    fn payload_decode_display_includes_op() {
        let err = ProtocolError::PayloadDecode {
            op: 7,
            source: json_error(),
        };
        assert!(err.to_string().contains("op 7"));
    }

    #[test]
    fn protocol_error_is_std_error() {
        let err = ProtocolError::PayloadEncode {
            source: json_error(),
        };
        let _: &dyn std::error::Error = &err;
    }
}
