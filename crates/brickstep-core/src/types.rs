//! Core value types for brickstep models.

use glam::DVec3;
use indexmap::IndexMap;

/// A parsed part placement (line type 1).
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Color token exactly as written in the source.
    pub color: String,
    /// Translation of the placed part.
    pub position: DVec3,
    /// File reference as written, may contain whitespace and a path prefix.
    pub reference: String,
}

impl Placement {
    /// The vertical coordinate. Larger values are lower in the model.
    pub fn height(&self) -> f64 {
        self.position.y
    }

    /// The BOM key for this placement.
    pub fn part_key(&self) -> PartKey {
        PartKey::new(canonical_part_id(&self.reference), self.color.clone())
    }
}

/// Classification of a single source line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    /// A well-formed placement record.
    Placement(Placement),
    /// Anything else: comments, meta commands, drawing primitives, malformed records.
    Opaque,
}

/// One line of model text, kept verbatim alongside its classification.
#[derive(Debug, Clone, PartialEq)]
pub struct RawLine {
    /// 1-based line number in the normalized source.
    pub number: usize,
    /// The line exactly as it appeared, minus the terminator.
    pub text: String,
    pub kind: LineKind,
}

impl RawLine {
    pub fn opaque(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
            kind: LineKind::Opaque,
        }
    }

    pub fn placement(number: usize, text: impl Into<String>, placement: Placement) -> Self {
        Self {
            number,
            text: text.into(),
            kind: LineKind::Placement(placement),
        }
    }

    /// The placement carried by this line, if any.
    pub fn as_placement(&self) -> Option<&Placement> {
        match &self.kind {
            LineKind::Placement(p) => Some(p),
            LineKind::Opaque => None,
        }
    }

    pub fn is_placement(&self) -> bool {
        matches!(self.kind, LineKind::Placement(_))
    }
}

/// Reduce a file reference to its canonical part identifier.
///
/// Path separators of either kind and any directory prefix are dropped, the
/// name is lower-cased and a trailing extension is removed:
/// `parts\3001.DAT` becomes `3001`.
pub fn canonical_part_id(reference: &str) -> String {
    let normalized = reference.trim().replace('\\', "/");
    let file_name = normalized.rsplit('/').next().unwrap_or_default();
    let stem = match file_name.rfind('.') {
        Some(dot) if dot > 0 => &file_name[..dot],
        _ => file_name,
    };
    stem.to_lowercase()
}

/// A bill-of-materials key: canonical part plus raw color token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PartKey {
    pub part_id: String,
    pub color: String,
}

impl PartKey {
    pub fn new(part_id: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            part_id: part_id.into(),
            color: color.into(),
        }
    }
}

/// One row of a bill of materials.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BomEntry {
    pub part_id: String,
    pub color_token: String,
    pub count: usize,
}

/// Multiset of (part, color) keys, in first-appearance order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartCounts {
    counts: IndexMap<PartKey, usize>,
}

impl PartCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more instance of `key`.
    pub fn add(&mut self, key: PartKey) {
        self.add_n(key, 1);
    }

    /// Count `n` more instances of `key`.
    pub fn add_n(&mut self, key: PartKey, n: usize) {
        *self.counts.entry(key).or_insert(0) += n;
    }

    /// Key-wise sum of `other` into `self`. New keys keep `other`'s order.
    pub fn merge(&mut self, other: &PartCounts) {
        for (key, &n) in &other.counts {
            self.add_n(key.clone(), n);
        }
    }

    pub fn get(&self, key: &PartKey) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of part instances.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PartKey, usize)> {
        self.counts.iter().map(|(k, &n)| (k, n))
    }

    /// Flatten into BOM rows.
    pub fn entries(&self) -> Vec<BomEntry> {
        self.counts
            .iter()
            .map(|(key, &count)| BomEntry {
                part_id: key.part_id.clone(),
                color_token: key.color.clone(),
                count,
            })
            .collect()
    }
}

impl FromIterator<PartKey> for PartCounts {
    fn from_iter<I: IntoIterator<Item = PartKey>>(iter: I) -> Self {
        let mut counts = PartCounts::new();
        for key in iter {
            counts.add(key);
        }
        counts
    }
}

/// A contiguous run of lines between two step boundaries.
///
/// Derived attributes are computed once at construction; segments are never
/// mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segment {
    lines: Vec<RawLine>,
    height: Option<f64>,
    part_counts: PartCounts,
    placements: usize,
}

impl Segment {
    pub fn new(lines: Vec<RawLine>) -> Self {
        // Running mean; a plain sum overflows for large finite coordinates.
        let mut mean = 0.0;
        let mut placements = 0usize;
        let mut part_counts = PartCounts::new();

        for placement in lines.iter().filter_map(RawLine::as_placement) {
            placements += 1;
            let n = placements as f64;
            mean += placement.height() / n - mean / n;
            part_counts.add(placement.part_key());
        }

        let height = (placements > 0).then_some(mean);

        Self {
            lines,
            height,
            part_counts,
            placements,
        }
    }

    /// A segment with no lines at all.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[RawLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<RawLine> {
        self.lines
    }

    /// Mean vertical coordinate of the placements, `None` when there are none.
    pub fn representative_height(&self) -> Option<f64> {
        self.height
    }

    pub fn part_counts(&self) -> &PartCounts {
        &self.part_counts
    }

    pub fn placement_count(&self) -> usize {
        self.placements
    }

    pub fn has_placements(&self) -> bool {
        self.placements > 0
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// One externally visible build step: one or more merged segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildStep {
    lines: Vec<RawLine>,
    part_counts: PartCounts,
    anchor_height: Option<f64>,
    segment_count: usize,
}

impl BuildStep {
    /// Concatenate segments in the given order. The anchor height is the
    /// first segment's representative height.
    pub fn from_segments(segments: impl IntoIterator<Item = Segment>) -> Self {
        let mut step = BuildStep::default();
        for (i, segment) in segments.into_iter().enumerate() {
            if i == 0 {
                step.anchor_height = segment.representative_height();
            }
            step.part_counts.merge(segment.part_counts());
            step.lines.extend(segment.into_lines());
            step.segment_count += 1;
        }
        step
    }

    pub fn lines(&self) -> &[RawLine] {
        &self.lines
    }

    pub fn part_counts(&self) -> &PartCounts {
        &self.part_counts
    }

    pub fn anchor_height(&self) -> Option<f64> {
        self.anchor_height
    }

    /// How many segments were folded into this step.
    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
