//! WebAssembly bindings for the brickstep engine.
//!
//! Intended to be loaded inside a Web Worker so the main thread stays
//! responsive while large models are processed.
//!
//! ## Example
//!
//! ```js
//! // ldrWorker.js
//! import init, { handleMessage } from 'brickstep-wasm';
//!
//! await init();
//! self.onmessage = (e) => self.postMessage(handleMessage(e.data));
//!
//! // main thread
//! worker.postMessage({ type: 'PROCESS_LDR', text });
//! worker.onmessage = (e) => {
//!   if (e.data.type === 'SUCCESS') {
//!     const { stepTexts, sortedFullText, bounds, stepBricks } = e.data.payload;
//!   }
//! };
//! ```

use brickstep_export::{
    authored_step_texts, handle_request, process_model, MergeOptions, StepPayload, WorkerRequest,
    WorkerResponse,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

mod types;

pub use types::*;

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(debug_assertions)]
    console_error_panic_hook::set_once();
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    // json_compatible turns `None` into `null` and maps into plain objects
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Handle one worker message: `{ type: 'PROCESS_LDR', text, layerEpsilon? }`.
///
/// Always answers with a `SUCCESS` or `ERROR` message.
#[wasm_bindgen(js_name = handleMessage)]
pub fn handle_message(message: JsValue) -> Result<JsValue, JsError> {
    let response = match serde_wasm_bindgen::from_value::<WorkerRequest>(message) {
        Ok(request) => handle_request(request),
        Err(e) => WorkerResponse::Error(format!("Invalid worker message: {}", e)),
    };
    to_js(&response)
}

/// Step engine for direct (non-message) use.
#[wasm_bindgen]
pub struct StepEngine {
    options: MergeOptions,
}

#[wasm_bindgen]
impl StepEngine {
    /// Create an engine, optionally with `{ layerEpsilon }`.
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<StepEngine, JsError> {
        let options = if options.is_undefined() || options.is_null() {
            StepOptionsJs::default()
        } else {
            serde_wasm_bindgen::from_value(options)
                .map_err(|e| JsError::new(&format!("Invalid options: {}", e)))?
        };
        let options = options
            .into_core()
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Self { options })
    }

    /// Get the version of the engine.
    #[wasm_bindgen(js_name = version)]
    pub fn version() -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    #[wasm_bindgen(getter, js_name = layerEpsilon)]
    pub fn layer_epsilon(&self) -> f64 {
        self.options.layer_epsilon
    }

    /// Process model text into `{ stepTexts, sortedFullText, bounds, stepBricks }`.
    #[wasm_bindgen]
    pub fn process(&self, text: &str) -> Result<JsValue, JsError> {
        let result = process_model(text, &self.options).map_err(|e| JsError::new(&e.to_string()))?;
        to_js(&StepPayload::from(result))
    }

    /// Cumulative texts in authored order, split only at explicit markers.
    #[wasm_bindgen(js_name = authoredSteps)]
    pub fn authored_steps(&self, text: &str) -> Result<JsValue, JsError> {
        to_js(&authored_step_texts(text))
    }
}
