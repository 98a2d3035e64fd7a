//! Typed wrappers over [`Session::call`] for the request types the client
//! supports, with serde-validated response shapes.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::ClientError;
use crate::session::Session;

/// Endpoint version information (`GetVersion`).
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    /// Application version string.
    pub obs_version: String,
    /// obs-websocket version string.
    pub obs_web_socket_version: String,
    /// Human-readable platform description.
    #[serde(default)]
    pub platform_description: Option<String>,
}

/// Scene collection state (`GetSceneList`).
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneList {
    /// Scene currently on program output.
    pub current_program_scene_name: String,
    /// Scene currently on preview output, when in studio mode.
    #[serde(default)]
    pub current_preview_scene_name: Option<String>,
    /// All scenes, front of list first.
    pub scenes: Vec<Scene>,
}

/// One scene in a [`SceneList`].
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Scene name, unique within the scene namespace.
    pub scene_name: String,
}

/// One item of a scene (`GetSceneItemList`).
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneItem {
    /// Item id, unique within its scene.
    pub scene_item_id: u64,
    /// Name of the underlying source.
    pub source_name: String,
    /// Whether the item is currently visible.
    pub scene_item_enabled: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SceneItemList {
    scene_items: Vec<SceneItem>,
}

/// One input (`GetInputList`).
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
    /// Input name, unique within the input namespace.
    pub input_name: String,
    /// Input kind identifier (e.g. `ffmpeg_source`).
    pub input_kind: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InputList {
    inputs: Vec<Input>,
}

/// Input audio volume (`GetInputVolume`).
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputVolume {
    /// Volume as a multiplier, `1.0` = unity gain.
    pub input_volume_mul: f64,
    /// Volume in decibels.
    pub input_volume_db: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InputMute {
    input_muted: bool,
}

/// Media input playback state (`GetMediaInputStatus`).
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInputStatus {
    /// Playback state identifier.
    pub media_state: String,
    /// Total duration in milliseconds, when known.
    #[serde(default)]
    pub media_duration: Option<u64>,
    /// Playback position in milliseconds, when known.
    #[serde(default)]
    pub media_cursor: Option<u64>,
}

/// Playback actions for `TriggerMediaInputAction`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaAction {
    /// Start or resume playback.
    Play,
    /// Pause playback.
    Pause,
    /// Restart from the beginning.
    Restart,
    /// Stop playback.
    Stop,
    /// Skip to the next item.
    Next,
    /// Skip to the previous item.
    Previous,
}

impl MediaAction {
    /// Wire identifier for the action.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Play => "OBS_WEBSOCKET_MEDIA_INPUT_ACTION_PLAY",
            Self::Pause => "OBS_WEBSOCKET_MEDIA_INPUT_ACTION_PAUSE",
            Self::Restart => "OBS_WEBSOCKET_MEDIA_INPUT_ACTION_RESTART",
            Self::Stop => "OBS_WEBSOCKET_MEDIA_INPUT_ACTION_STOP",
            Self::Next => "OBS_WEBSOCKET_MEDIA_INPUT_ACTION_NEXT",
            Self::Previous => "OBS_WEBSOCKET_MEDIA_INPUT_ACTION_PREVIOUS",
        }
    }
}

fn decode<T: DeserializeOwned>(request_type: &str, value: Value) -> Result<T, ClientError> {
    serde_json::from_value(value).map_err(|source| ClientError::Response {
        request_type: request_type.to_owned(),
        source,
    })
}

impl Session {
    /// Endpoint version information.
    pub async fn version(&self) -> Result<Version, ClientError> {
        let value = self.call("GetVersion", None).await?;
        decode("GetVersion", value)
    }

    // ─── Scenes ──────────────────────────────────────────────────────────

    /// All scenes plus the current program/preview scene.
    pub async fn scene_list(&self) -> Result<SceneList, ClientError> {
        let value = self.call("GetSceneList", None).await?;
        decode("GetSceneList", value)
    }

    /// Create a scene. Fails with the already-exists code if one with this
    /// name exists; see [`Session::ensure_scene`] for the idempotent form.
    pub async fn create_scene(&self, scene_name: &str) -> Result<(), ClientError> {
        let _ = self
            .call("CreateScene", Some(json!({"sceneName": scene_name})))
            .await?;
        Ok(())
    }

    /// Remove a scene and the items in it.
    pub async fn remove_scene(&self, scene_name: &str) -> Result<(), ClientError> {
        let _ = self
            .call("RemoveScene", Some(json!({"sceneName": scene_name})))
            .await?;
        Ok(())
    }

    /// Put a scene on program output.
    pub async fn set_current_program_scene(&self, scene_name: &str) -> Result<(), ClientError> {
        let _ = self
            .call(
                "SetCurrentProgramScene",
                Some(json!({"sceneName": scene_name})),
            )
            .await?;
        Ok(())
    }

    /// Items of a scene, bottom of the stack first.
    pub async fn scene_item_list(&self, scene_name: &str) -> Result<Vec<SceneItem>, ClientError> {
        let value = self
            .call("GetSceneItemList", Some(json!({"sceneName": scene_name})))
            .await?;
        let list: SceneItemList = decode("GetSceneItemList", value)?;
        Ok(list.scene_items)
    }

    // ─── Inputs ──────────────────────────────────────────────────────────

    /// All inputs.
    pub async fn input_list(&self) -> Result<Vec<Input>, ClientError> {
        let value = self.call("GetInputList", None).await?;
        let list: InputList = decode("GetInputList", value)?;
        Ok(list.inputs)
    }

    /// Create an input inside a scene.
    pub async fn create_input(
        &self,
        scene_name: &str,
        input_name: &str,
        input_kind: &str,
        input_settings: Value,
    ) -> Result<(), ClientError> {
        let _ = self
            .call(
                "CreateInput",
                Some(json!({
                    "sceneName": scene_name,
                    "inputName": input_name,
                    "inputKind": input_kind,
                    "inputSettings": input_settings,
                })),
            )
            .await?;
        Ok(())
    }

    /// Remove an input from every scene that references it.
    pub async fn remove_input(&self, input_name: &str) -> Result<(), ClientError> {
        let _ = self
            .call("RemoveInput", Some(json!({"inputName": input_name})))
            .await?;
        Ok(())
    }

    // ─── Transitions ─────────────────────────────────────────────────────

    /// Create a scene transition.
    pub async fn create_scene_transition(
        &self,
        transition_name: &str,
        transition_kind: &str,
        transition_settings: Value,
    ) -> Result<(), ClientError> {
        let _ = self
            .call(
                "CreateSceneTransition",
                Some(json!({
                    "transitionName": transition_name,
                    "transitionKind": transition_kind,
                    "transitionSettings": transition_settings,
                })),
            )
            .await?;
        Ok(())
    }

    /// Select the active scene transition.
    pub async fn set_current_scene_transition(
        &self,
        transition_name: &str,
    ) -> Result<(), ClientError> {
        let _ = self
            .call(
                "SetCurrentSceneTransition",
                Some(json!({"transitionName": transition_name})),
            )
            .await?;
        Ok(())
    }

    // ─── Audio ───────────────────────────────────────────────────────────

    /// Volume of an input.
    pub async fn input_volume(&self, input_name: &str) -> Result<InputVolume, ClientError> {
        let value = self
            .call("GetInputVolume", Some(json!({"inputName": input_name})))
            .await?;
        decode("GetInputVolume", value)
    }

    /// Set the volume of an input as a multiplier (`1.0` = unity gain).
    pub async fn set_input_volume(
        &self,
        input_name: &str,
        volume_mul: f64,
    ) -> Result<(), ClientError> {
        let _ = self
            .call(
                "SetInputVolume",
                Some(json!({
                    "inputName": input_name,
                    "inputVolumeMul": volume_mul,
                })),
            )
            .await?;
        Ok(())
    }

    /// Whether an input is muted.
    pub async fn input_mute(&self, input_name: &str) -> Result<bool, ClientError> {
        let value = self
            .call("GetInputMute", Some(json!({"inputName": input_name})))
            .await?;
        let mute: InputMute = decode("GetInputMute", value)?;
        Ok(mute.input_muted)
    }

    /// Mute or unmute an input.
    pub async fn set_input_mute(&self, input_name: &str, muted: bool) -> Result<(), ClientError> {
        let _ = self
            .call(
                "SetInputMute",
                Some(json!({"inputName": input_name, "inputMuted": muted})),
            )
            .await?;
        Ok(())
    }

    /// Toggle an input's mute state, returning the new state.
    pub async fn toggle_input_mute(&self, input_name: &str) -> Result<bool, ClientError> {
        let value = self
            .call("ToggleInputMute", Some(json!({"inputName": input_name})))
            .await?;
        let mute: InputMute = decode("ToggleInputMute", value)?;
        Ok(mute.input_muted)
    }

    // ─── Media ───────────────────────────────────────────────────────────

    /// Trigger a playback action on a media input.
    pub async fn trigger_media_input_action(
        &self,
        input_name: &str,
        action: MediaAction,
    ) -> Result<(), ClientError> {
        let _ = self
            .call(
                "TriggerMediaInputAction",
                Some(json!({
                    "inputName": input_name,
                    "mediaAction": action.as_str(),
                })),
            )
            .await?;
        Ok(())
    }

    /// Playback state of a media input.
    pub async fn media_input_status(
        &self,
        input_name: &str,
    ) -> Result<MediaInputStatus, ClientError> {
        let value = self
            .call("GetMediaInputStatus", Some(json!({"inputName": input_name})))
            .await?;
        decode("GetMediaInputStatus", value)
    }
}
