//! Line-level grammar for LDraw model text.
//!
//! Every function here operates on a single line with surrounding whitespace
//! already removed.

use brickstep_core::Placement;
use glam::DVec3;
use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while1},
    character::complete::{satisfy, space1},
    combinator::{map, map_res, not, rest, verify},
    multi::count,
    sequence::{preceded, terminated, tuple},
    IResult,
};

/// How a line takes part in segmentation.
#[derive(Debug, Clone, PartialEq)]
pub enum LineClass {
    /// `0 STEP` / `0 ROTSTEP`: ends the current segment and is dropped.
    Boundary,
    /// A well-formed type 1 record.
    Placement(Placement),
    /// Everything else, including type 1 records that failed to parse.
    Opaque,
}

/// Classify a raw line. Never fails: anything unrecognized is opaque.
pub fn classify(line: &str) -> LineClass {
    let trimmed = line.trim();
    if step_boundary(trimmed).is_ok() {
        return LineClass::Boundary;
    }
    match placement(trimmed) {
        Ok((_, placement)) => LineClass::Placement(placement),
        Err(_) => LineClass::Opaque,
    }
}

/// Whether the line opens with the type 1 line marker, valid or not.
pub fn looks_like_placement(line: &str) -> bool {
    terminated(tag::<_, _, nom::error::Error<&str>>("1"), space1)(line.trim()).is_ok()
}

/// A whitespace-delimited token.
pub fn token(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace())(input)
}

/// A finite decimal number token.
pub fn number(input: &str) -> IResult<&str, f64> {
    map_res(token, parse_finite)(input)
}

fn parse_finite(s: &str) -> Result<f64, &'static str> {
    match s.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err("not a finite number"),
    }
}

fn spaced_number(input: &str) -> IResult<&str, f64> {
    preceded(space1, number)(input)
}

/// Continues only if the keyword is not followed by another word character.
fn word_end(input: &str) -> IResult<&str, ()> {
    not(satisfy(|c: char| c.is_alphanumeric() || c == '_'))(input)
}

/// `0 STEP` or `0 ROTSTEP`, case-insensitive, with anything after the keyword.
pub fn step_boundary(input: &str) -> IResult<&str, &str> {
    preceded(
        terminated(tag("0"), space1),
        terminated(alt((tag_no_case("STEP"), tag_no_case("ROTSTEP"))), word_end),
    )(input)
}

/// `1 <colour> x y z a b c d e f g h i <file>`
///
/// The file reference is the remainder of the line and may contain spaces.
/// All twelve numeric fields must be finite numbers.
pub fn placement(input: &str) -> IResult<&str, Placement> {
    let (input, _) = terminated(tag("1"), space1)(input)?;
    let (input, color) = token(input)?;
    let (input, (x, y, z)) = tuple((spaced_number, spaced_number, spaced_number))(input)?;
    let (input, _orientation) = count(spaced_number, 9)(input)?;
    let (input, reference) = preceded(
        space1,
        verify(map(rest, str::trim), |r: &str| !r.is_empty()),
    )(input)?;

    Ok((
        input,
        Placement {
            color: color.to_string(),
            position: DVec3::new(x, y, z),
            reference: reference.to_string(),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BRICK: &str = "1 4 10 -24 30 1 0 0 0 1 0 0 0 1 3001.dat";

    #[test]
    fn test_number() {
        assert_eq!(number("-24.5 rest"), Ok((" rest", -24.5)));
        assert_eq!(number("1e2"), Ok(("", 100.0)));
        assert!(number("abc").is_err());
        assert!(number("NaN").is_err());
        assert!(number("inf").is_err());
    }

    #[test]
    fn test_step_boundary() {
        assert!(step_boundary("0 STEP").is_ok());
        assert!(step_boundary("0 step").is_ok());
        assert!(step_boundary("0\tROTSTEP 0 90 0 ABS").is_ok());
        assert!(step_boundary("0 ROTSTEP END").is_ok());
        assert!(step_boundary("0 STEPS").is_err());
        assert!(step_boundary("0 // STEP").is_err());
        assert!(step_boundary("0STEP").is_err());
        assert!(step_boundary("1 STEP").is_err());
    }

    #[test]
    fn test_placement() {
        let (_, p) = placement(BRICK).unwrap();
        assert_eq!(p.color, "4");
        assert_eq!(p.position, DVec3::new(10.0, -24.0, 30.0));
        assert_eq!(p.reference, "3001.dat");
    }

    #[test]
    fn test_placement_reference_with_spaces() {
        let (_, p) = placement("1 16 0 0 0 1 0 0 0 1 0 0 0 1 Car Body.ldr").unwrap();
        assert_eq!(p.reference, "Car Body.ldr");
    }

    #[test]
    fn test_placement_direct_color() {
        let (_, p) = placement("1 0x2FF0000 0 8 0 1 0 0 0 1 0 0 0 1 3024.dat").unwrap();
        assert_eq!(p.color, "0x2FF0000");
    }

    #[test]
    fn test_placement_rejects_malformed() {
        // missing reference
        assert!(placement("1 4 0 0 0 1 0 0 0 1 0 0 0 1").is_err());
        // too few fields
        assert!(placement("1 4 0 0 0 1 0 0 3001.dat").is_err());
        // non-numeric position
        assert!(placement("1 4 x 0 0 1 0 0 0 1 0 0 0 1 3001.dat").is_err());
        // non-numeric orientation
        assert!(placement("1 4 0 0 0 1 0 0 0 q 0 0 0 1 3001.dat").is_err());
        // line type 10 is not type 1
        assert!(placement("10 4 0 0 0 1 0 0 0 1 0 0 0 1 3001.dat").is_err());
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("  0 STEP  "), LineClass::Boundary);
        assert!(matches!(classify(BRICK), LineClass::Placement(_)));
        assert_eq!(classify("0 Name: car.ldr"), LineClass::Opaque);
        assert_eq!(classify("2 24 0 0 0 1 1 1"), LineClass::Opaque);
        assert_eq!(classify(""), LineClass::Opaque);
        assert_eq!(classify("1 4 oops"), LineClass::Opaque);
    }

    #[test]
    fn test_looks_like_placement() {
        assert!(looks_like_placement("1 4 oops"));
        assert!(!looks_like_placement("0 STEP"));
        assert!(!looks_like_placement("12 4"));
    }
}
