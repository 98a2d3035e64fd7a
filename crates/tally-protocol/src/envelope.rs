//! The `{op, d}` frame envelope every protocol message travels in.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtocolError;

/// Opcodes carried in the envelope's `op` field.
pub mod opcode {
    /// First message from the endpoint after the WebSocket opens.
    pub const HELLO: u8 = 0;
    /// Client response to `Hello`, optionally carrying authentication.
    pub const IDENTIFY: u8 = 1;
    /// Endpoint acknowledgement that the session is identified.
    pub const IDENTIFIED: u8 = 2;
    /// Client request to change session parameters after identification.
    pub const REIDENTIFY: u8 = 3;
    /// Server-pushed event.
    pub const EVENT: u8 = 5;
    /// Client-issued request.
    pub const REQUEST: u8 = 6;
    /// Endpoint response to a request, correlated by request id.
    pub const REQUEST_RESPONSE: u8 = 7;
}

/// A single protocol frame: `{"op": <opcode>, "d": <payload>}`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope {
    /// Message opcode, see [`opcode`].
    pub op: u8,
    /// Opcode-specific payload.
    #[serde(default)]
    pub d: Value,
}

impl Envelope {
    /// Wrap a typed payload in an envelope for the given opcode.
    pub fn pack<T: Serialize>(op: u8, payload: &T) -> Result<Self, ProtocolError> {
        let d = serde_json::to_value(payload)
            .map_err(|source| ProtocolError::PayloadEncode { source })?;
        Ok(Self { op, d })
    }

    /// Decode the payload as the type expected for this envelope's opcode.
    pub fn payload<T: DeserializeOwned>(&self) -> Result<T, ProtocolError> {
        serde_json::from_value(self.d.clone()).map_err(|source| ProtocolError::PayloadDecode {
            op: self.op,
            source,
        })
    }

    /// Parse an envelope from the text of a WebSocket frame.
    pub fn from_text(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(|source| ProtocolError::MalformedFrame { source })
    }

    /// Serialize the envelope to frame text.
    pub fn to_text(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|source| ProtocolError::PayloadEncode { source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;
    use serde_json::json;

    #[test]
    fn pack_and_unpack_request() {
        let req = Request {
            request_type: "CreateScene".into(),
            request_id: "req_1".into(),
            request_data: Some(json!({"sceneName": "Demo"})),
        };
        let env = Envelope::pack(opcode::REQUEST, &req).unwrap();
        assert_eq!(env.op, opcode::REQUEST);

        let back: Request = env.payload().unwrap();
        assert_eq!(back.request_type, "CreateScene");
        assert_eq!(back.request_id, "req_1");
        assert_eq!(back.request_data.unwrap()["sceneName"], "Demo");
    }

    #[test]
    fn wire_format_roundtrip() {
        let raw = r#"{"op": 6, "d": {"requestType": "GetVersion", "requestId": "r1"}}"#;
        let env = Envelope::from_text(raw).unwrap();
        assert_eq!(env.op, 6);
        assert_eq!(env.d["requestType"], "GetVersion");

        let text = env.to_text().unwrap();
        let again = Envelope::from_text(&text).unwrap();
        assert_eq!(again.op, 6);
    }

    #[test]
    fn missing_payload_defaults_to_null() {
        let env = Envelope::from_text(r#"{"op": 3}"#).unwrap();
        assert_eq!(env.op, opcode::REIDENTIFY);
        assert!(env.d.is_null());
    }

    #[test]
    fn from_text_rejects_garbage() {
        let err = Envelope::from_text("not a frame").unwrap_err();
        assert!(matches!(err, ProtocolError::MalformedFrame { .. }));
    }

    #[test]
    fn payload_rejects_wrong_shape() {
        let env = Envelope::from_text(r#"{"op": 7, "d": {"unexpected": true}}"#).unwrap();
        let err = env.payload::<Request>().unwrap_err();
        assert!(matches!(err, ProtocolError::PayloadDecode { op: 7, .. }));
    }
}
