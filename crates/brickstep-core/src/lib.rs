//! Core types and utilities for the brickstep build-step engine.
//!
//! This crate provides the foundational types used across all other brickstep crates:
//! - Line records (`RawLine`, `LineKind`, `Placement`)
//! - Grouping types (`Segment`, `BuildStep`)
//! - Bill-of-materials keys and counts (`PartKey`, `PartCounts`, `BomEntry`)
//! - Error types

pub mod errors;
pub mod types;

pub use errors::*;
pub use types::*;
