//! Axis-aligned bounding boxes in canvas space.
//!
//! Shapes on the topology canvas never rotate, so every box is a plain
//! min/max pair. All functions here are pure and total: degenerate input
//! produces a degenerate answer (zero area, zero ratio, `None` union),
//! never a panic.

use crate::coords::{CanvasPoint, CanvasSize};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box represented by minimum and maximum points
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// The minimum point (top-left)
    pub min: Vec2,
    /// The maximum point (bottom-right)
    pub max: Vec2,
}

impl Bounds {
    /// Creates a new bounds from minimum and maximum points
    ///
    /// Note: This doesn't validate that min is actually less than max.
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Creates bounds from a canvas position and size
    pub fn from_origin_size(origin: CanvasPoint, size: CanvasSize) -> Self {
        Self {
            min: origin.0,
            max: origin.0 + size.0,
        }
    }

    /// Shorthand for `x, y, width, height` boxes.
    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::from_origin_size(CanvasPoint::new(x, y), CanvasSize::new(width, height))
    }

    pub fn origin(&self) -> CanvasPoint {
        CanvasPoint(self.min)
    }

    pub fn size(&self) -> CanvasSize {
        CanvasSize(self.max - self.min)
    }

    pub fn center(&self) -> CanvasPoint {
        CanvasPoint((self.min + self.max) * 0.5)
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Finite coordinates and strictly positive width and height.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.width() > 0.0 && self.height() > 0.0
    }

    /// Tests if this bounds intersects with another
    ///
    /// Closed intervals: boxes that only touch along an edge or a corner
    /// still intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Computes the intersection of two bounds
    ///
    /// Returns None if the bounds don't intersect
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);

        if min.x <= max.x && min.y <= max.y {
            Some(Self { min, max })
        } else {
            None
        }
    }

    /// Area shared by both boxes, 0 when they are disjoint.
    pub fn overlap_area(&self, other: &Self) -> f32 {
        let x = (self.max.x.min(other.max.x) - self.min.x.max(other.min.x)).max(0.0);
        let y = (self.max.y.min(other.max.y) - self.min.y.max(other.min.y)).max(0.0);
        x * y
    }

    /// Fraction of this box covered by `other`.
    ///
    /// Returns 0 when this box has no area.
    pub fn overlap_ratio(&self, other: &Self) -> f32 {
        let area = self.area();
        if area <= 0.0 || !area.is_finite() {
            return 0.0;
        }
        self.overlap_area(other) / area
    }

    /// Computes the union of two bounds
    ///
    /// The union is the smallest bounds that contains both input bounds
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Union of every box in `boxes`, `None` for an empty input.
    pub fn union_all<I>(boxes: I) -> Option<Self>
    where
        I: IntoIterator<Item = Bounds>,
    {
        boxes.into_iter().reduce(|acc, b| acc.union(&b))
    }

    /// Tests if a point is contained within the bounds
    ///
    /// Points on the boundary are considered contained
    pub fn contains_point(&self, point: CanvasPoint) -> bool {
        point.x() >= self.min.x
            && point.x() <= self.max.x
            && point.y() >= self.min.y
            && point.y() <= self.max.y
    }

    /// Tests if another bounds is entirely contained within this bounds
    pub fn contains_bounds(&self, other: &Self) -> bool {
        other.min.x >= self.min.x
            && other.max.x <= self.max.x
            && other.min.y >= self.min.y
            && other.max.y <= self.max.y
    }

    /// Grows the box by `amount` on every side. Negative values shrink it.
    pub fn expand(&self, amount: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(amount),
            max: self.max + Vec2::splat(amount),
        }
    }

    /// Translates the bounds by a given offset
    pub fn translate(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::ZERO,
        }
    }
}
