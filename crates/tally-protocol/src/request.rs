//! Request and response payloads (opcodes 6 and 7).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A client-issued request (opcode 6).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Request type name (e.g. `CreateScene`).
    pub request_type: String,
    /// Correlation identifier, echoed back in the response.
    pub request_id: String,
    /// Optional request parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_data: Option<Value>,
}

/// The endpoint's response to a request (opcode 7).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestResponse {
    /// Echoed request type.
    pub request_type: String,
    /// Echoed correlation identifier.
    pub request_id: String,
    /// Whether and how the request was handled.
    pub request_status: RequestStatus,
    /// Result payload (present on success for requests that return data).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_data: Option<Value>,
}

/// Outcome of a request as reported by the endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestStatus {
    /// `true` when the request succeeded.
    pub result: bool,
    /// Machine-readable status code, see [`crate::status::request_status`].
    pub code: u16,
    /// Optional human-readable explanation for failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl RequestResponse {
    /// Whether the endpoint reported success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.request_status.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::request_status;
    use serde_json::json;

    #[test]
    fn request_without_data_omits_field() {
        let req = Request {
            request_type: "GetVersion".into(),
            request_id: "r1".into(),
            request_data: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("requestData"));
        assert!(json.contains("requestType"));
    }

    #[test]
    fn wire_format_success_response() {
        let raw = r#"{
            "requestType": "CreateScene",
            "requestId": "r2",
            "requestStatus": {"result": true, "code": 100}
        }"#;
        let resp: RequestResponse = serde_json::from_str(raw).unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.request_status.code, request_status::SUCCESS);
        assert!(resp.response_data.is_none());
        assert!(resp.request_status.comment.is_none());
    }

    #[test]
    fn wire_format_failure_response() {
        let raw = r#"{
            "requestType": "CreateScene",
            "requestId": "r3",
            "requestStatus": {
                "result": false,
                "code": 601,
                "comment": "A scene with that name already exists."
            }
        }"#;
        let resp: RequestResponse = serde_json::from_str(raw).unwrap();
        assert!(!resp.is_success());
        assert_eq!(
            resp.request_status.code,
            request_status::RESOURCE_ALREADY_EXISTS
        );
        assert!(
            resp.request_status
                .comment
                .as_deref()
                .unwrap()
                .contains("already exists")
        );
    }

    #[test]
    fn wire_format_response_with_data() {
        let raw = r#"{
            "requestType": "GetSceneList",
            "requestId": "r4",
            "requestStatus": {"result": true, "code": 100},
            "responseData": {"scenes": [{"sceneName": "Main"}]}
        }"#;
        let resp: RequestResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.response_data.unwrap()["scenes"][0]["sceneName"], "Main");
    }

    #[test]
    fn request_serializes_camel_case() {
        let req = Request {
            request_type: "SetCurrentProgramScene".into(),
            request_id: "r5".into(),
            request_data: Some(json!({"sceneName": "Live"})),
        };
        let v = serde_json::to_value(&req).unwrap();
        assert!(v.get("requestType").is_some());
        assert!(v.get("request_type").is_none());
    }
}
