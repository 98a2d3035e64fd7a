//! Server-pushed event payloads (opcode 5) and subscription intent bits.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A server-pushed event (opcode 5).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Event type name (e.g. `CurrentProgramSceneChanged`).
    pub event_type: String,
    /// Subscription bit the event belongs to, see [`subscription`].
    pub event_intent: u32,
    /// Event payload, shape depends on `event_type`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_data: Option<Value>,
}

/// Event-subscription intent bits, combined into the `eventSubscriptions`
/// bitmask of an `Identify` payload.
pub mod subscription {
    /// Receive no events.
    pub const NONE: u32 = 0;
    /// General endpoint events.
    pub const GENERAL: u32 = 1 << 0;
    /// Configuration changes.
    pub const CONFIG: u32 = 1 << 1;
    /// Scene lifecycle and ordering.
    pub const SCENES: u32 = 1 << 2;
    /// Input lifecycle and settings.
    pub const INPUTS: u32 = 1 << 3;
    /// Transition lifecycle and settings.
    pub const TRANSITIONS: u32 = 1 << 4;
    /// Filter lifecycle and settings.
    pub const FILTERS: u32 = 1 << 5;
    /// Output state (streaming, recording).
    pub const OUTPUTS: u32 = 1 << 6;
    /// Scene item lifecycle and ordering.
    pub const SCENE_ITEMS: u32 = 1 << 7;
    /// Media input playback state.
    pub const MEDIA_INPUTS: u32 = 1 << 8;
    /// Vendor-specific events.
    pub const VENDORS: u32 = 1 << 9;
    /// UI state events.
    pub const UI: u32 = 1 << 10;
    /// Every non-high-volume category.
    pub const ALL: u32 = GENERAL
        | CONFIG
        | SCENES
        | INPUTS
        | TRANSITIONS
        | FILTERS
        | OUTPUTS
        | SCENE_ITEMS
        | MEDIA_INPUTS
        | VENDORS
        | UI;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_event() {
        let raw = r#"{
            "eventType": "CurrentProgramSceneChanged",
            "eventIntent": 4,
            "eventData": {"sceneName": "Live"}
        }"#;
        let event: Event = serde_json::from_str(raw).unwrap();
        assert_eq!(event.event_type, "CurrentProgramSceneChanged");
        assert_eq!(event.event_intent, subscription::SCENES);
        assert_eq!(event.event_data.unwrap()["sceneName"], "Live");
    }

    #[test]
    fn wire_format_event_without_data() {
        let raw = r#"{"eventType": "ExitStarted", "eventIntent": 1}"#;
        let event: Event = serde_json::from_str(raw).unwrap();
        assert!(event.event_data.is_none());
    }

    #[test]
    fn all_covers_each_category() {
        for bit in [
            subscription::GENERAL,
            subscription::SCENES,
            subscription::INPUTS,
            subscription::TRANSITIONS,
            subscription::MEDIA_INPUTS,
            subscription::UI,
        ] {
            assert_eq!(subscription::ALL & bit, bit);
        }
        assert_eq!(subscription::ALL & subscription::NONE, 0);
    }
}
