//! Part counting across build steps.

use brickstep_core::{BuildStep, PartCounts};

/// Running union: entry `i` covers steps `0..=i`. The last entry is the
/// whole-model BOM.
pub fn cumulative_boms(steps: &[BuildStep]) -> Vec<PartCounts> {
    let mut running = PartCounts::new();
    steps
        .iter()
        .map(|step| {
            running.merge(step.part_counts());
            running.clone()
        })
        .collect()
}
