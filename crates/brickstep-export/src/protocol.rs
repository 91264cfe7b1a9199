//! Request/response messages exchanged with a background worker.
//!
//! The wire shape is JSON with a `type` tag:
//!
//! ```json
//! { "type": "PROCESS_LDR", "text": "...", "layerEpsilon": 8 }
//! { "type": "SUCCESS", "payload": {
//!     "stepTexts": [...], "sortedFullText": "...", "bounds": null, "stepBricks": [...]
//! } }
//! { "type": "ERROR", "payload": "..." }
//! ```

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use brickstep_bom::BoundingBox;
use brickstep_core::{AssemblyError, BomEntry, WorkerError};
use brickstep_layer::MergeOptions;
use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::{process_model, StepResult};

/// A message sent to the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerRequest {
    #[serde(rename_all = "camelCase")]
    ProcessLdr {
        text: String,
        /// Overrides the default merge tolerance.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        layer_epsilon: Option<f64>,
    },
}

impl WorkerRequest {
    pub fn process(text: impl Into<String>) -> Self {
        Self::ProcessLdr {
            text: text.into(),
            layer_epsilon: None,
        }
    }

    pub fn with_layer_epsilon(self, epsilon: f64) -> Self {
        match self {
            Self::ProcessLdr { text, .. } => Self::ProcessLdr {
                text,
                layer_epsilon: Some(epsilon),
            },
        }
    }
}

/// The single reply to a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerResponse {
    Success(StepPayload),
    Error(String),
}

impl WorkerResponse {
    pub fn into_result(self) -> Result<StepPayload, String> {
        match self {
            Self::Success(payload) => Ok(payload),
            Self::Error(message) => Err(message),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Successful result in wire form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepPayload {
    pub step_texts: Vec<String>,
    pub sorted_full_text: String,
    pub bounds: Option<BoundsJs>,
    pub step_bricks: Vec<Vec<BomEntry>>,
}

impl From<StepResult> for StepPayload {
    fn from(result: StepResult) -> Self {
        let (step_texts, step_bricks, bounds) = result.into_parts();
        let sorted_full_text = step_texts.last().cloned().unwrap_or_default();
        Self {
            step_texts,
            sorted_full_text,
            bounds: bounds.map(BoundsJs::from),
            step_bricks,
        }
    }
}

/// Bounds representation for JavaScript.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundsJs {
    pub min: Point3Js,
    pub max: Point3Js,
}

impl From<BoundingBox> for BoundsJs {
    fn from(bounds: BoundingBox) -> Self {
        Self {
            min: bounds.min.into(),
            max: bounds.max.into(),
        }
    }
}

/// A point with named components, the shape `THREE.Vector3` serializes to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3Js {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<DVec3> for Point3Js {
    fn from(v: DVec3) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

/// Run a request to completion.
///
/// Panics inside the engine are caught and reported as an `Error` response;
/// there is never a partial result.
pub fn handle_request(request: WorkerRequest) -> WorkerResponse {
    match request {
        WorkerRequest::ProcessLdr { text, layer_epsilon } => {
            let options = match layer_epsilon {
                Some(epsilon) => MergeOptions::default().with_layer_epsilon(epsilon),
                None => MergeOptions::default(),
            };

            match catch_unwind(AssertUnwindSafe(|| process_model(&text, &options))) {
                Ok(Ok(result)) => WorkerResponse::Success(result.into()),
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "model processing failed");
                    WorkerResponse::Error(e.to_string())
                }
                Err(panic) => {
                    let e = AssemblyError::EngineFailure {
                        reason: panic_message(panic.as_ref()),
                    };
                    tracing::warn!(error = %e, "model processing panicked");
                    WorkerResponse::Error(e.to_string())
                }
            }
        }
    }
}

/// Decode a JSON request, run it, and encode the JSON response.
///
/// Undecodable requests produce an `Error` response rather than failing.
pub fn handle_message(message: &str) -> Result<String, WorkerError> {
    let response = match serde_json::from_str::<WorkerRequest>(message) {
        Ok(request) => handle_request(request),
        Err(e) => WorkerResponse::Error(
            WorkerError::InvalidMessage {
                reason: e.to_string(),
            }
            .to_string(),
        ),
    };
    serde_json::to_string(&response).map_err(|e| WorkerError::InvalidMessage {
        reason: e.to_string(),
    })
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_shape() {
        let request: WorkerRequest =
            serde_json::from_value(json!({ "type": "PROCESS_LDR", "text": "0 a" })).unwrap();
        assert_eq!(request, WorkerRequest::process("0 a"));

        let request = WorkerRequest::process("x").with_layer_epsilon(4.0);
        let value = serde_json::to_value(request).unwrap();
        assert_eq!(value, json!({ "type": "PROCESS_LDR", "text": "x", "layerEpsilon": 4.0 }));
    }

    #[test]
    fn test_success_wire_shape() {
        let response = handle_request(WorkerRequest::process(
            "1 4 10 -24 0 1 0 0 0 1 0 0 0 1 3001.dat",
        ));
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["type"], "SUCCESS");
        assert_eq!(value["payload"]["stepTexts"].as_array().unwrap().len(), 1);
        assert_eq!(value["payload"]["bounds"]["min"], json!({ "x": 10.0, "y": -24.0, "z": 0.0 }));
        assert_eq!(
            value["payload"]["stepBricks"][0][0],
            json!({ "partId": "3001", "colorToken": "4", "count": 1 })
        );
    }

    #[test]
    fn test_bounds_null_without_placements() {
        let response = handle_request(WorkerRequest::process("0 only a comment"));
        let value = serde_json::to_value(&response).unwrap();
        assert!(value["payload"]["bounds"].is_null());
    }

    #[test]
    fn test_invalid_epsilon_is_error_response() {
        let response = handle_request(WorkerRequest::process("0 a").with_layer_epsilon(-1.0));
        let message = response.into_result().unwrap_err();
        assert!(message.contains("epsilon"));
    }

    #[test]
    fn test_handle_message_bad_json() {
        let reply = handle_message("{not json").unwrap();
        let response: WorkerResponse = serde_json::from_str(&reply).unwrap();
        assert!(!response.is_success());
    }

    #[test]
    fn test_handle_message_round_trip() {
        let reply = handle_message(r#"{"type":"PROCESS_LDR","text":"0 a\n0 STEP\n0 b"}"#).unwrap();
        let payload = serde_json::from_str::<WorkerResponse>(&reply)
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(payload.sorted_full_text, "0 a\n0 b");
    }

    #[test]
    fn test_panic_message() {
        assert_eq!(panic_message(&"boom"), "boom");
        assert_eq!(panic_message(&String::from("bang")), "bang");
        assert_eq!(panic_message(&42u8), "unknown panic");
    }
}
