//! Sorting and merging of segments into build steps.

use std::cmp::Ordering;

use brickstep_core::{BuildStep, LayerError, Segment};

/// Default merge tolerance, in LDraw units. One plate is 8 LDU tall.
pub const DEFAULT_LAYER_EPSILON: f64 = 8.0;

/// Options for clustering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeOptions {
    /// Segments whose heights differ from the cluster anchor by less than
    /// this are merged into one step.
    pub layer_epsilon: f64,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            layer_epsilon: DEFAULT_LAYER_EPSILON,
        }
    }
}

impl MergeOptions {
    pub fn with_layer_epsilon(mut self, layer_epsilon: f64) -> Self {
        self.layer_epsilon = layer_epsilon;
        self
    }

    /// Reject tolerances that are negative, NaN or infinite.
    pub fn validate(&self) -> Result<(), LayerError> {
        if self.layer_epsilon.is_finite() && self.layer_epsilon >= 0.0 {
            Ok(())
        } else {
            Err(LayerError::InvalidEpsilon {
                value: self.layer_epsilon,
            })
        }
    }
}

/// Build-order comparator: larger heights first, geometry-free segments last,
/// ties left for the stable sort to keep in source order.
pub fn build_order(a: &Segment, b: &Segment) -> Ordering {
    match (a.representative_height(), b.representative_height()) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(ha), Some(hb)) => hb.partial_cmp(&ha).unwrap_or(Ordering::Equal),
    }
}

/// Stable sort into build order.
pub fn sort_segments(segments: &mut [Segment]) {
    segments.sort_by(build_order);
}

fn same_layer(anchor: Option<f64>, height: Option<f64>, epsilon: f64) -> bool {
    match (anchor, height) {
        (Some(a), Some(h)) => (h - a).abs() < epsilon,
        (None, None) => true,
        _ => false,
    }
}

/// Order segments bottom-up and merge near-coincident layers.
///
/// The anchor of a cluster is its first member's height; later members are
/// compared against the anchor, never against the previous member, so a run
/// of slowly rising heights cannot drift into one step. Clusters with no
/// lines at all are dropped.
pub fn cluster_segments(
    mut segments: Vec<Segment>,
    options: &MergeOptions,
) -> Result<Vec<BuildStep>, LayerError> {
    options.validate()?;

    let input_count = segments.len();
    sort_segments(&mut segments);

    let mut steps = Vec::new();
    let mut cluster: Vec<Segment> = Vec::new();

    for segment in segments {
        if let Some(first) = cluster.first() {
            let anchor = first.representative_height();
            if !same_layer(anchor, segment.representative_height(), options.layer_epsilon) {
                push_step(&mut steps, std::mem::take(&mut cluster));
            }
        }
        cluster.push(segment);
    }
    push_step(&mut steps, cluster);

    tracing::debug!(
        segments = input_count,
        steps = steps.len(),
        epsilon = options.layer_epsilon,
        "clustered segments"
    );

    Ok(steps)
}

fn push_step(steps: &mut Vec<BuildStep>, cluster: Vec<Segment>) {
    let step = BuildStep::from_segments(cluster);
    if !step.is_empty() {
        steps.push(step);
    }
}
