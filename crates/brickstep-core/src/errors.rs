//! Error types for the brickstep engine.
//!
//! Only invocation-level failures are represented here. A single malformed
//! line is never an error; it is carried through as opaque content.

use thiserror::Error;

/// Top-level error type for the brickstep engine.
#[derive(Debug, Error)]
pub enum BrickstepError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Layer(#[from] LayerError),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),
}

/// Errors while reading model text.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Model text is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },
}

/// Errors from the layer clustering configuration.
#[derive(Debug, Error)]
pub enum LayerError {
    #[error("Layer epsilon must be finite and non-negative, got {value}")]
    InvalidEpsilon { value: f64 },
}

/// Internal invariant violations while assembling step results.
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("Assembled {texts} step texts for {steps} build steps")]
    StepCountMismatch { steps: usize, texts: usize },

    #[error("Assembled {bricks} step BOMs for {steps} build steps")]
    BomCountMismatch { steps: usize, bricks: usize },

    #[error("Engine failed: {reason}")]
    EngineFailure { reason: String },
}

/// Errors at the worker transport boundary.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Worker failed to start: {reason}")]
    SpawnFailed { reason: String },

    #[error("Worker channel disconnected")]
    Disconnected,

    #[error("Worker thread panicked: {reason}")]
    Panicked { reason: String },

    #[error("Invalid worker message: {reason}")]
    InvalidMessage { reason: String },
}
