//! Layer clustering for brickstep models.
//!
//! This crate reorders segments into a bottom-up build order and folds
//! segments sitting at nearly the same height into a single build step.
//!
//! # Architecture
//!
//! 1. **Ordering**: segments are stably sorted by representative height,
//!    descending (LDraw's vertical axis points down), with geometry-free
//!    segments moved to the end
//! 2. **Merging**: adjacent segments within `layer_epsilon` of the current
//!    cluster's anchor height become one `BuildStep`
//!
//! # Example
//!
//! ```ignore
//! use brickstep_layer::{cluster_segments, MergeOptions};
//!
//! let model = brickstep_parser::parse_model(source);
//! let steps = cluster_segments(model.body, &MergeOptions::default())?;
//! ```

mod cluster;

pub use cluster::{
    build_order, cluster_segments, sort_segments, MergeOptions, DEFAULT_LAYER_EPSILON,
};
