//! Axis-aligned bounds over placement positions.

use brickstep_core::RawLine;
use glam::DVec3;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: DVec3,
    pub max: DVec3,
}

impl BoundingBox {
    /// A zero-size box at `point`.
    pub fn from_point(point: DVec3) -> Self {
        Self { min: point, max: point }
    }

    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Option<Self> {
        points.into_iter().fold(None, |bounds, p| match bounds {
            None => Some(Self::from_point(p)),
            Some(b) => Some(b.include(p)),
        })
    }

    /// Grow to contain `point`.
    pub fn include(self, point: DVec3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }
}

/// Bounds of every placement position, `None` when there are no placements.
pub fn model_bounds<'a>(lines: impl IntoIterator<Item = &'a RawLine>) -> Option<BoundingBox> {
    BoundingBox::from_points(
        lines
            .into_iter()
            .filter_map(RawLine::as_placement)
            .map(|p| p.position),
    )
}
