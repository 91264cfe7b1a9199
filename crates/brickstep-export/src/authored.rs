//! Step texts in authored order, without height sorting or merging.

use brickstep_parser::{classify, normalize_line_endings, LineClass};

/// Cumulative texts split only at explicit `STEP` / `ROTSTEP` markers.
///
/// A model without markers yields a single entry holding the input exactly as
/// given. Otherwise entry `i` joins every kept line up to the `i`-th marker,
/// and the final entry extends to the end of the file.
pub fn authored_step_texts(source: &str) -> Vec<String> {
    let normalized = normalize_line_endings(source);

    let mut segments: Vec<Vec<&str>> = vec![Vec::new()];
    for line in normalized.split('\n') {
        if classify(line) == LineClass::Boundary {
            segments.push(Vec::new());
        } else if let Some(current) = segments.last_mut() {
            current.push(line);
        }
    }

    if segments.len() == 1 {
        return vec![source.to_string()];
    }

    let mut acc: Vec<&str> = Vec::new();
    segments
        .into_iter()
        .map(|segment| {
            acc.extend(segment);
            acc.join("\n")
        })
        .collect()
}
