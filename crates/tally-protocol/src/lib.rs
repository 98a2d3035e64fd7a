//! # tally-protocol
//!
//! Serde mirror of the obs-websocket v5 wire contract, consumed as-is.
//!
//! The protocol is owned by the remote endpoint (OBS Studio); this crate
//! does not define or extend it, it only gives the contract typed Rust
//! shapes:
//!
//! - **Envelope**: every frame is `{"op": <u8>, "d": {...}}` — see [`Envelope`]
//!   and the [`opcode`] constants
//! - **Handshake**: `Hello` / `Identify` / `Identified` payloads plus the
//!   challenge/salt [`authentication_string`] computation
//! - **Requests**: `Request` / `RequestResponse` with
//!   `RequestStatus { result, code, comment }` and the [`status`] codes
//! - **Events**: server-pushed `Event` payloads and [`subscription`] intent bits

pub mod envelope;
pub mod error;
pub mod events;
pub mod handshake;
pub mod request;
pub mod status;

pub use envelope::{Envelope, opcode};
pub use error::ProtocolError;
pub use events::{Event, subscription};
pub use handshake::{AuthChallenge, Hello, Identified, Identify, authentication_string};
pub use request::{Request, RequestResponse, RequestStatus};
pub use status::{close_code, request_status};
