//! Assembly of cumulative step texts.

use brickstep_bom::{cumulative_boms, BoundingBox};
use brickstep_core::{AssemblyError, BomEntry, BuildStep, RawLine, Segment};

/// Everything produced by one invocation of the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    header: Segment,
    steps: Vec<BuildStep>,
    step_texts: Vec<String>,
    step_bricks: Vec<Vec<BomEntry>>,
    cumulative_bricks: Vec<Vec<BomEntry>>,
    bounds: Option<BoundingBox>,
}

impl StepResult {
    /// `step_texts()[i]` is the header followed by build steps `0..=i`.
    pub fn step_texts(&self) -> &[String] {
        &self.step_texts
    }

    /// The fully re-ordered model. Same as the last step text.
    pub fn sorted_full_text(&self) -> &str {
        self.step_texts.last().map(String::as_str).unwrap_or_default()
    }

    /// Per-step, non-cumulative bills of materials.
    pub fn step_bricks(&self) -> &[Vec<BomEntry>] {
        &self.step_bricks
    }

    pub fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    pub fn header(&self) -> &Segment {
        &self.header
    }

    pub fn steps(&self) -> &[BuildStep] {
        &self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Bill of materials for the whole model.
    pub fn model_bom(&self) -> &[BomEntry] {
        self.cumulative_bricks
            .last()
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Bill of materials for the model as of step `index`.
    pub fn cumulative_bom(&self, index: usize) -> Option<&[BomEntry]> {
        self.cumulative_bricks.get(index).map(Vec::as_slice)
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<Vec<BomEntry>>, Option<BoundingBox>) {
        (self.step_texts, self.step_bricks, self.bounds)
    }
}

/// Newline-joined text that can be extended line by line.
#[derive(Default)]
struct JoinedText {
    text: String,
    started: bool,
}

impl JoinedText {
    fn extend<'a>(&mut self, lines: impl IntoIterator<Item = &'a RawLine>) {
        for line in lines {
            if self.started {
                self.text.push('\n');
            }
            self.text.push_str(&line.text);
            self.started = true;
        }
    }
}

/// Build the cumulative texts and per-step BOMs. `steps` must not be empty.
pub(crate) fn assemble(
    header: Segment,
    steps: Vec<BuildStep>,
    bounds: Option<BoundingBox>,
) -> Result<StepResult, AssemblyError> {
    let mut acc = JoinedText::default();
    acc.extend(header.lines());

    let mut step_texts = Vec::with_capacity(steps.len());
    for step in &steps {
        acc.extend(step.lines());
        step_texts.push(acc.text.clone());
    }

    let step_bricks: Vec<Vec<BomEntry>> =
        steps.iter().map(|s| s.part_counts().entries()).collect();
    let cumulative_bricks: Vec<Vec<BomEntry>> = cumulative_boms(&steps)
        .iter()
        .map(|counts| counts.entries())
        .collect();

    if step_texts.len() != steps.len() || steps.is_empty() {
        return Err(AssemblyError::StepCountMismatch {
            steps: steps.len(),
            texts: step_texts.len(),
        });
    }
    if step_bricks.len() != steps.len() {
        return Err(AssemblyError::BomCountMismatch {
            steps: steps.len(),
            bricks: step_bricks.len(),
        });
    }

    tracing::debug!(
        steps = steps.len(),
        header_lines = header.lines().len(),
        full_text_bytes = acc.text.len(),
        "assembled step texts"
    );

    Ok(StepResult {
        header,
        steps,
        step_texts,
        step_bricks,
        cumulative_bricks,
        bounds,
    })
}
