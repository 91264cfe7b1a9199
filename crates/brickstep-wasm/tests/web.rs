//! Browser-side tests. Run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]

use brickstep_export::{WorkerRequest, WorkerResponse};
use brickstep_wasm::{handle_message, StepEngine};
use serde::Serialize;
use wasm_bindgen::{JsError, JsValue};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const MODEL: &str = "0 car\n0 STEP\n\
                     1 4 0 0 0 1 0 0 0 1 0 0 0 1 3001.dat\n0 STEP\n\
                     1 4 0 -24 0 1 0 0 0 1 0 0 0 1 3001.dat";

fn ok<T>(result: Result<T, JsError>) -> T {
    result.map_err(JsValue::from).unwrap()
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap()
}

#[wasm_bindgen_test]
fn handle_message_answers_success() {
    let reply = ok(handle_message(to_js(&WorkerRequest::process(MODEL))));
    let response: WorkerResponse = serde_wasm_bindgen::from_value(reply).unwrap();

    let payload = response.into_result().unwrap();
    assert_eq!(payload.step_texts.len(), 2);
    assert!(payload.bounds.is_some());
}

#[wasm_bindgen_test]
fn handle_message_reports_bad_epsilon_as_error() {
    let request = WorkerRequest::process(MODEL).with_layer_epsilon(-1.0);
    let reply = ok(handle_message(to_js(&request)));
    let response: WorkerResponse = serde_wasm_bindgen::from_value(reply).unwrap();

    assert!(!response.is_success());
}

#[wasm_bindgen_test]
fn handle_message_rejects_unknown_shape() {
    let reply = ok(handle_message(JsValue::from_str("not a message")));
    let response: WorkerResponse = serde_wasm_bindgen::from_value(reply).unwrap();

    assert!(response.into_result().unwrap_err().contains("Invalid worker message"));
}

#[wasm_bindgen_test]
fn step_engine_processes_with_defaults() {
    let engine = ok(StepEngine::new(JsValue::UNDEFINED));
    assert_eq!(engine.layer_epsilon(), 8.0);

    let result = ok(engine.process(MODEL));
    assert!(result.is_object());
}

#[wasm_bindgen_test]
fn step_engine_rejects_negative_epsilon() {
    let options = to_js(&brickstep_wasm::StepOptionsJs {
        layer_epsilon: Some(-2.0),
    });
    assert!(StepEngine::new(options).is_err());
}
