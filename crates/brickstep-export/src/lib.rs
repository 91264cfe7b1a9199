//! Build-step output for brickstep models.
//!
//! Produces, for one model text:
//! - cumulative step texts (header plus steps `0..=i`) for progressive rendering
//! - the fully re-ordered model text
//! - per-step bills of materials
//! - the model's bounding box
//!
//! The computation is synchronous and pure. Hosts that must keep a UI or
//! request thread responsive run it through [`StepWorker`] or the message
//! functions in [`protocol`].

mod authored;
pub mod protocol;
mod steps;
mod worker;

pub use authored::authored_step_texts;
pub use brickstep_bom::BoundingBox;
pub use brickstep_layer::{MergeOptions, DEFAULT_LAYER_EPSILON};
pub use protocol::{
    handle_message, handle_request, BoundsJs, Point3Js, StepPayload, WorkerRequest, WorkerResponse,
};
pub use steps::StepResult;
pub use worker::{PendingResult, StepWorker};

use brickstep_bom::model_bounds;
use brickstep_core::{BrickstepError, BuildStep};
use brickstep_layer::cluster_segments;
use brickstep_parser::{parse_model, ParsedModel};

/// Split, order and merge a model into cumulative build steps.
///
/// Always yields at least one step: a model whose body is empty gets a
/// single step consisting of the header alone.
///
/// # Example
///
/// ```
/// use brickstep_export::{process_model, MergeOptions};
///
/// let source = "0 Tower\n\
///               0 STEP\n\
///               1 4 0 -24 0 1 0 0 0 1 0 0 0 1 3001.dat\n\
///               0 STEP\n\
///               1 4 0 0 0 1 0 0 0 1 0 0 0 1 3001.dat";
///
/// let result = process_model(source, &MergeOptions::default())?;
/// assert_eq!(result.step_count(), 2);
/// // the lower brick (larger y) comes first
/// assert!(result.step_texts()[0].ends_with("1 4 0 0 0 1 0 0 0 1 0 0 0 1 3001.dat"));
/// # Ok::<(), brickstep_core::BrickstepError>(())
/// ```
pub fn process_model(source: &str, options: &MergeOptions) -> Result<StepResult, BrickstepError> {
    options.validate()?;

    let model = parse_model(source);
    let bounds = model_bounds(model.lines());

    let ParsedModel {
        header,
        body,
        boundary_count,
        header_folded,
    } = model;
    tracing::debug!(boundary_count, header_folded, has_bounds = bounds.is_some(), "parsed model");

    let mut build_steps = cluster_segments(body, options)?;
    if build_steps.is_empty() {
        build_steps.push(BuildStep::default());
    }

    Ok(steps::assemble(header, build_steps, bounds)?)
}

/// [`process_model`] with the default merge tolerance.
pub fn process_model_default(source: &str) -> Result<StepResult, BrickstepError> {
    process_model(source, &MergeOptions::default())
}
