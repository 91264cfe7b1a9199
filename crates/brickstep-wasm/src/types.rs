//! TypeScript-friendly type definitions for WASM bindings.

use brickstep_core::LayerError;
use brickstep_export::MergeOptions;
use serde::{Deserialize, Serialize};

/// Step options from JavaScript.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOptionsJs {
    /// Height tolerance for merging layers, in LDraw units.
    #[serde(default)]
    pub layer_epsilon: Option<f64>,
}

impl StepOptionsJs {
    /// Fill in defaults and reject unusable tolerances.
    pub fn into_core(self) -> Result<MergeOptions, LayerError> {
        let mut opts = MergeOptions::default();
        if let Some(eps) = self.layer_epsilon {
            opts.layer_epsilon = eps;
        }
        opts.validate()?;
        Ok(opts)
    }
}
