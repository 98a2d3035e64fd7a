//! Handshake payloads (opcodes 0–2) and the challenge/salt authentication.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// First message from the endpoint after the WebSocket opens (opcode 0).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hello {
    /// Endpoint's obs-websocket version string.
    pub obs_web_socket_version: String,
    /// Latest RPC version the endpoint supports.
    pub rpc_version: u32,
    /// Present when the endpoint requires authentication.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<AuthChallenge>,
}

/// Challenge/salt pair issued by an endpoint that requires authentication.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthChallenge {
    /// Per-connection random challenge.
    pub challenge: String,
    /// Server-configured salt.
    pub salt: String,
}

/// Client response to `Hello` (opcode 1).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identify {
    /// RPC version the client wants to speak.
    pub rpc_version: u32,
    /// Authentication string, required iff `Hello` carried a challenge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<String>,
    /// Bitmask of event categories to receive, see [`crate::events::subscription`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_subscriptions: Option<u32>,
}

/// Endpoint acknowledgement that the session is identified (opcode 2).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identified {
    /// RPC version both sides will speak.
    pub negotiated_rpc_version: u32,
}

/// Compute the authentication string for a challenge/salt pair.
///
/// The contract is `base64(sha256(base64(sha256(password + salt)) + challenge))`.
#[must_use]
pub fn authentication_string(password: &str, salt: &str, challenge: &str) -> String {
    let secret = BASE64.encode(Sha256::digest(format!("{password}{salt}")));
    BASE64.encode(Sha256::digest(format!("{secret}{challenge}")))
}
