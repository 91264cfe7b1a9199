//! Line classifier and step segmenter for LDraw model text.
//!
//! This crate turns raw model text into an ordered list of segments split at
//! `0 STEP` / `0 ROTSTEP` commands. Type 1 placement records are parsed with
//! `nom`; anything that does not match is carried through untouched.

mod lexer;
mod segmenter;

pub use lexer::{classify, placement, step_boundary, LineClass};
pub use segmenter::{normalize_line_endings, parse, ParsedModel};

use brickstep_core::ParseError;

/// Segment model text.
///
/// # Example
///
/// ```
/// use brickstep_parser::parse_model;
///
/// let model = parse_model("0 My car\n0 STEP\n1 4 0 -24 0 1 0 0 0 1 0 0 0 1 3001.dat");
/// assert_eq!(model.body.len(), 1);
/// assert_eq!(model.header.lines().len(), 1);
/// ```
pub fn parse_model(source: &str) -> ParsedModel {
    parse(source)
}

/// Segment model text supplied as bytes.
///
/// A leading UTF-8 byte order mark is skipped, matching how text is decoded
/// when fetched over HTTP.
pub fn parse_model_bytes(bytes: &[u8]) -> Result<ParsedModel, ParseError> {
    let source = std::str::from_utf8(bytes).map_err(|e| ParseError::InvalidUtf8 {
        valid_up_to: e.valid_up_to(),
    })?;
    Ok(parse(source.strip_prefix('\u{feff}').unwrap_or(source)))
}
