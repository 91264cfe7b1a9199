//! Bill of materials and bounds for brickstep models.
//!
//! Bounds are taken over every placement in the file and do not depend on
//! step order. Part counts are kept per build step; the whole-model BOM is
//! their running union after the last step.

mod bom;
mod bounds;

pub use bom::cumulative_boms;
pub use bounds::{model_bounds, BoundingBox};
