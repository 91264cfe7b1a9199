//! Splitting model text into segments at step boundaries.
//!
//! Lines are scanned once, in order. Boundary lines close the current segment
//! and are discarded; every other line is kept verbatim.

use std::borrow::Cow;

use brickstep_core::{RawLine, Segment};

use crate::lexer::{classify, looks_like_placement, LineClass};

/// The segmented form of a model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedModel {
    /// Leading non-geometric preamble, excluded from clustering. Empty when
    /// the first segment already placed parts.
    pub header: Segment,
    /// Remaining segments in source order.
    pub body: Vec<Segment>,
    /// Number of explicit step boundaries encountered.
    pub boundary_count: usize,
    /// True when the first segment contained placements and was moved into `body`.
    pub header_folded: bool,
}

impl ParsedModel {
    /// All kept lines in source order, header first.
    pub fn lines(&self) -> impl Iterator<Item = &RawLine> {
        self.header
            .lines()
            .iter()
            .chain(self.body.iter().flat_map(|s| s.lines().iter()))
    }
}

/// Convert `\r\n` terminators to `\n`. Lone `\r` is left alone.
pub fn normalize_line_endings(input: &str) -> Cow<'_, str> {
    if input.contains("\r\n") {
        Cow::Owned(input.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(input)
    }
}

/// Segment model text.
pub fn parse(input: &str) -> ParsedModel {
    let normalized = normalize_line_endings(input);
    let mut segmenter = Segmenter::new();
    for (i, line) in normalized.split('\n').enumerate() {
        segmenter.push(i + 1, line);
    }
    segmenter.finish()
}

/// Stateful scanner holding the segment under construction.
struct Segmenter {
    segments: Vec<Segment>,
    current: Vec<RawLine>,
    boundaries: usize,
    rejected: usize,
}

impl Segmenter {
    fn new() -> Self {
        Self {
            segments: Vec::new(),
            current: Vec::new(),
            boundaries: 0,
            rejected: 0,
        }
    }

    fn push(&mut self, number: usize, line: &str) {
        match classify(line) {
            LineClass::Boundary => {
                self.boundaries += 1;
                self.flush();
            }
            LineClass::Placement(placement) => {
                self.current.push(RawLine::placement(number, line, placement));
            }
            LineClass::Opaque => {
                if looks_like_placement(line) {
                    self.rejected += 1;
                    tracing::trace!(line = number, "malformed placement kept as opaque");
                }
                self.current.push(RawLine::opaque(number, line));
            }
        }
    }

    fn flush(&mut self) {
        let lines = std::mem::take(&mut self.current);
        self.segments.push(Segment::new(lines));
    }

    fn finish(mut self) -> ParsedModel {
        self.flush();

        let mut segments = self.segments.into_iter();
        // flush() always ran at least once
        let first = segments.next().unwrap_or_default();
        let mut body: Vec<Segment> = segments.collect();

        let header_folded = first.has_placements();
        let header = if header_folded {
            body.insert(0, first);
            Segment::empty()
        } else {
            first
        };

        tracing::debug!(
            boundaries = self.boundaries,
            segments = body.len(),
            header_lines = header.lines().len(),
            header_folded,
            rejected_placements = self.rejected,
            "segmented model"
        );

        ParsedModel {
            header,
            body,
            boundary_count: self.boundaries,
            header_folded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(segment: &Segment) -> Vec<&str> {
        segment.lines().iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn test_normalize_line_endings() {
        assert_eq!(normalize_line_endings("a\r\nb\r\n"), "a\nb\n");
        assert!(matches!(normalize_line_endings("a\nb"), Cow::Borrowed(_)));
        assert_eq!(normalize_line_endings("a\rb"), "a\rb");
    }

    #[test]
    fn test_no_markers_single_segment() {
        let input = "0 model\n1 4 0 -24 0 1 0 0 0 1 0 0 0 1 3001.dat\n";
        let model = parse(input);

        assert_eq!(model.boundary_count, 0);
        assert!(model.header_folded);
        assert!(model.header.is_empty());
        assert_eq!(model.body.len(), 1);
        assert_eq!(
            texts(&model.body[0]),
            vec!["0 model", "1 4 0 -24 0 1 0 0 0 1 0 0 0 1 3001.dat", ""]
        );
    }

    #[test]
    fn test_header_kept_when_non_geometric() {
        let input = "0 Title\n0 Name: x.ldr\n0 STEP\n\
                     1 4 0 0 0 1 0 0 0 1 0 0 0 1 3001.dat\n0 STEP\n\
                     1 1 0 -24 0 1 0 0 0 1 0 0 0 1 3001.dat";
        let model = parse(input);

        assert!(!model.header_folded);
        assert_eq!(texts(&model.header), vec!["0 Title", "0 Name: x.ldr"]);
        assert_eq!(model.body.len(), 2);
        assert_eq!(model.boundary_count, 2);
        assert_eq!(model.body[1].representative_height(), Some(-24.0));
    }

    #[test]
    fn test_boundary_lines_dropped() {
        let input = "0 a\r\n0 step\r\n0 b\r\n0 ROTSTEP 0 90 0 REL\r\n0 c";
        let model = parse(input);

        let all: Vec<_> = model.lines().map(|l| l.text.as_str()).collect();
        assert_eq!(all, vec!["0 a", "0 b", "0 c"]);
        assert_eq!(model.body.len(), 2);
    }

    #[test]
    fn test_adjacent_markers_make_empty_segment() {
        let model = parse("0 STEP\n0 STEP");
        assert!(model.header.is_empty());
        assert_eq!(model.body.len(), 2);
        assert!(model.body.iter().all(Segment::is_empty));
    }

    #[test]
    fn test_malformed_placement_is_opaque_and_kept() {
        let input = "1 4 0 zz 0 1 0 0 0 1 0 0 0 1 3001.dat\n0 STEP";
        let model = parse(input);

        assert!(!model.header_folded);
        assert_eq!(model.header.lines().len(), 1);
        assert!(!model.header.lines()[0].is_placement());
    }

    #[test]
    fn test_line_numbers_count_boundaries() {
        let model = parse("0 a\n0 STEP\n1 4 0 0 0 1 0 0 0 1 0 0 0 1 3001.dat");
        assert_eq!(model.body[0].lines()[0].number, 3);
    }

    #[test]
    fn test_empty_input() {
        let model = parse("");
        assert_eq!(texts(&model.header), vec![""]);
        assert!(model.body.is_empty());
    }
}
