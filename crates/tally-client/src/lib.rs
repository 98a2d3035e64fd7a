//! # tally-client
//!
//! Remote-control session manager for OBS Studio's WebSocket protocol.
//!
//! The central type is [`Session`]: it owns one connection to the endpoint,
//! correlates asynchronous responses back to callers by request id, and
//! guarantees that every in-flight call resolves exactly once — with its
//! result, a typed error, or [`ClientError::Closed`] when the connection
//! goes away.
//!
//! ```ignore
//! let session = Session::connect(ConnectOptions::from_env()).await?;
//! match session.ensure_scene("Interview").await? {
//!     EnsureOutcome::Created => {}
//!     EnsureOutcome::AlreadyExisted => {}
//! }
//! session.set_current_program_scene("Interview").await?;
//! session.disconnect().await;
//! ```
//!
//! Lifecycle is explicit: `connect → use → disconnect`. Dropping a session
//! performs the same cleanup, so no exit path leaves callers hanging.

pub mod api;
pub mod ensure;
pub mod error;
pub mod options;
pub mod session;

pub use api::{
    Input, InputVolume, MediaAction, MediaInputStatus, Scene, SceneItem, SceneList, Version,
};
pub use ensure::{EnsureOutcome, Namespace, RemoveOutcome};
pub use error::ClientError;
pub use options::ConnectOptions;
pub use session::{Session, SessionState};

pub use tally_protocol as protocol;
