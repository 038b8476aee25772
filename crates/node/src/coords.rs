//! Typed coordinates for the topology canvas.
//!
//! Every position a node reports lives in one absolute frame, the canvas,
//! no matter how deeply it is nested. Local offsets only exist at the edge
//! of the API, and [`to_global`] / [`to_local`] convert between the two.
//!
//! # Coordinate Spaces
//!
//! - **Canvas space**: absolute positions of every node
//! - **Local space**: offset relative to an immediate parent's origin

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Position in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasPoint(pub Vec2);

/// Position relative to a parent node's origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LocalPoint(pub Vec2);

/// Width and height in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasSize(pub Vec2);

/// Movement/offset in canvas space (not a position).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasDelta(pub Vec2);

/// `local + parent`.
pub fn to_global(local: LocalPoint, parent: CanvasPoint) -> CanvasPoint {
    CanvasPoint(local.0 + parent.0)
}

/// `global - parent`.
pub fn to_local(global: CanvasPoint, parent: CanvasPoint) -> LocalPoint {
    LocalPoint(global.0 - parent.0)
}

// === CanvasPoint ===

impl CanvasPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    pub fn x(&self) -> f32 {
        self.0.x
    }

    pub fn y(&self) -> f32 {
        self.0.y
    }

    /// Offset of this point from `parent`'s origin.
    pub fn to_local(&self, parent: CanvasPoint) -> LocalPoint {
        to_local(*self, parent)
    }
}

impl From<Vec2> for CanvasPoint {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

impl From<CanvasPoint> for Vec2 {
    fn from(p: CanvasPoint) -> Self {
        p.0
    }
}

impl Add<CanvasDelta> for CanvasPoint {
    type Output = CanvasPoint;

    fn add(self, delta: CanvasDelta) -> Self::Output {
        CanvasPoint(self.0 + delta.0)
    }
}

impl Sub<CanvasDelta> for CanvasPoint {
    type Output = CanvasPoint;

    fn sub(self, delta: CanvasDelta) -> Self::Output {
        CanvasPoint(self.0 - delta.0)
    }
}

impl Sub for CanvasPoint {
    type Output = CanvasDelta;

    /// Subtracting two points gives a delta.
    fn sub(self, other: CanvasPoint) -> Self::Output {
        CanvasDelta(self.0 - other.0)
    }
}

// === LocalPoint ===

impl LocalPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    pub fn x(&self) -> f32 {
        self.0.x
    }

    pub fn y(&self) -> f32 {
        self.0.y
    }

    /// Convert to canvas point given parent's canvas position.
    pub fn to_canvas(&self, parent: CanvasPoint) -> CanvasPoint {
        to_global(*self, parent)
    }
}

impl From<Vec2> for LocalPoint {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

// === CanvasSize ===

impl CanvasSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self(Vec2::new(width, height))
    }

    pub fn width(&self) -> f32 {
        self.0.x
    }

    pub fn height(&self) -> f32 {
        self.0.y
    }

    /// Component-wise maximum, used to floor a size at a minimum.
    pub fn max(&self, other: CanvasSize) -> CanvasSize {
        CanvasSize(self.0.max(other.0))
    }
}

impl From<Vec2> for CanvasSize {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

impl From<CanvasSize> for Vec2 {
    fn from(s: CanvasSize) -> Self {
        s.0
    }
}

// === CanvasDelta ===

impl CanvasDelta {
    pub fn new(dx: f32, dy: f32) -> Self {
        Self(Vec2::new(dx, dy))
    }

    pub fn dx(&self) -> f32 {
        self.0.x
    }

    pub fn dy(&self) -> f32 {
        self.0.y
    }

    pub fn is_zero(&self) -> bool {
        self.0 == Vec2::ZERO
    }
}

impl From<Vec2> for CanvasDelta {
    fn from(v: Vec2) -> Self {
        Self(v)
    }
}

impl Add for CanvasDelta {
    type Output = CanvasDelta;

    fn add(self, other: CanvasDelta) -> Self::Output {
        CanvasDelta(self.0 + other.0)
    }
}
