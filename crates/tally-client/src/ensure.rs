//! Idempotent create-if-absent / remove-if-present helpers.
//!
//! The endpoint reports "already exists" and "not found" through status
//! codes. These helpers convert exactly those two codes into explicit
//! outcome variants so callers never inspect error codes themselves; every
//! other failure propagates unchanged.

use serde_json::Value;
use tracing::debug;

use tally_protocol::request_status;

use crate::error::ClientError;
use crate::session::Session;

/// Namespaces of named remote-managed objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Namespace {
    /// Composition layers.
    Scene,
    /// Media/content sources.
    Input,
    /// Scene-change effects.
    Transition,
}

impl Namespace {
    fn remove_request_type(self) -> &'static str {
        match self {
            Self::Scene => "RemoveScene",
            Self::Input => "RemoveInput",
            Self::Transition => "RemoveSceneTransition",
        }
    }

    fn name_field(self) -> &'static str {
        match self {
            Self::Scene => "sceneName",
            Self::Input => "inputName",
            Self::Transition => "transitionName",
        }
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scene => write!(f, "scene"),
            Self::Input => write!(f, "input"),
            Self::Transition => write!(f, "transition"),
        }
    }
}

/// Outcome of a create-if-absent helper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// The object did not exist and was created.
    Created,
    /// The object was already there; nothing changed.
    AlreadyExisted,
}

/// Outcome of a remove-if-present helper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The object existed and was removed.
    Removed,
    /// There was nothing to remove.
    NotPresent,
}

fn is_already_exists(err: &ClientError) -> bool {
    matches!(
        err,
        ClientError::Call { code, .. } if *code == request_status::RESOURCE_ALREADY_EXISTS
    )
}

fn is_not_found(err: &ClientError) -> bool {
    matches!(
        err,
        ClientError::Call { code, .. } if *code == request_status::RESOURCE_NOT_FOUND
    )
}

impl Session {
    /// Create a scene unless one with this name already exists.
    pub async fn ensure_scene(&self, scene_name: &str) -> Result<EnsureOutcome, ClientError> {
        match self.create_scene(scene_name).await {
            Ok(()) => Ok(EnsureOutcome::Created),
            Err(err) if is_already_exists(&err) => {
                debug!(scene_name, "scene already exists");
                Ok(EnsureOutcome::AlreadyExisted)
            }
            Err(err) => Err(err),
        }
    }

    /// Create an input unless one with this name already exists.
    pub async fn ensure_input(
        &self,
        scene_name: &str,
        input_name: &str,
        input_kind: &str,
        input_settings: Value,
    ) -> Result<EnsureOutcome, ClientError> {
        match self
            .create_input(scene_name, input_name, input_kind, input_settings)
            .await
        {
            Ok(()) => Ok(EnsureOutcome::Created),
            Err(err) if is_already_exists(&err) => {
                debug!(input_name, "input already exists");
                Ok(EnsureOutcome::AlreadyExisted)
            }
            Err(err) => Err(err),
        }
    }

    /// Create a scene transition unless one with this name already exists.
    pub async fn ensure_transition(
        &self,
        transition_name: &str,
        transition_kind: &str,
        transition_settings: Value,
    ) -> Result<EnsureOutcome, ClientError> {
        match self
            .create_scene_transition(transition_name, transition_kind, transition_settings)
            .await
        {
            Ok(()) => Ok(EnsureOutcome::Created),
            Err(err) if is_already_exists(&err) => {
                debug!(transition_name, "transition already exists");
                Ok(EnsureOutcome::AlreadyExisted)
            }
            Err(err) => Err(err),
        }
    }

    /// Remove a named object if it exists; absence is not an error.
    pub async fn remove_if_present(
        &self,
        namespace: Namespace,
        name: &str,
    ) -> Result<RemoveOutcome, ClientError> {
        let mut params = serde_json::Map::new();
        let _ = params.insert(
            namespace.name_field().to_owned(),
            Value::String(name.to_owned()),
        );
        match self
            .call(namespace.remove_request_type(), Some(Value::Object(params)))
            .await
        {
            Ok(_) => Ok(RemoveOutcome::Removed),
            Err(err) if is_not_found(&err) => {
                debug!(%namespace, name, "nothing to remove");
                Ok(RemoveOutcome::NotPresent)
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call_error(code: u16) -> ClientError {
        ClientError::Call {
            code,
            comment: String::new(),
        }
    }

    #[test]
    fn already_exists_matches_only_its_code() {
        assert!(is_already_exists(&call_error(
            request_status::RESOURCE_ALREADY_EXISTS
        )));
        assert!(!is_already_exists(&call_error(
            request_status::RESOURCE_NOT_FOUND
        )));
        assert!(!is_already_exists(&ClientError::Closed));
    }

    #[test]
    fn not_found_matches_only_its_code() {
        assert!(is_not_found(&call_error(request_status::RESOURCE_NOT_FOUND)));
        assert!(!is_not_found(&call_error(
            request_status::RESOURCE_ALREADY_EXISTS
        )));
        assert!(!is_not_found(&ClientError::Timeout {
            request_type: "RemoveScene".into(),
            timeout_ms: 100,
        }));
    }

    #[test]
    fn namespace_request_types() {
        assert_eq!(Namespace::Scene.remove_request_type(), "RemoveScene");
        assert_eq!(Namespace::Input.remove_request_type(), "RemoveInput");
        assert_eq!(
            Namespace::Transition.remove_request_type(),
            "RemoveSceneTransition"
        );
    }

    #[test]
    fn namespace_name_fields() {
        assert_eq!(Namespace::Scene.name_field(), "sceneName");
        assert_eq!(Namespace::Input.name_field(), "inputName");
        assert_eq!(Namespace::Transition.name_field(), "transitionName");
    }

    #[test]
    fn namespace_display() {
        assert_eq!(Namespace::Scene.to_string(), "scene");
        assert_eq!(Namespace::Input.to_string(), "input");
        assert_eq!(Namespace::Transition.to_string(), "transition");
    }
}
