//! Geometry kernel: boxes, vectors, and affine transforms in page-global units.
//!
//! Everything here is a pure value type. Callers are expected to hand in
//! well-formed boxes (`x0 <= x1`, `y0 <= y1`); the kernel does not enforce it.

use serde::{Deserialize, Serialize};

/// Axis-aligned box in page-global coordinates.
///
/// `y` grows upward, so `y1` is the top edge and `y0` the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the box.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Top edge (largest `y`).
    pub fn top(&self) -> f64 {
        self.y1
    }

    /// Bottom edge (smallest `y`).
    pub fn bottom(&self) -> f64 {
        self.y0
    }

    /// Center point of the box.
    pub fn center(&self) -> Vec2 {
        Vec2 {
            x: (self.x0 + self.x1) / 2.0,
            y: (self.y0 + self.y1) / 2.0,
        }
    }

    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Grow this box in place so it also contains `other`.
    pub fn extend(&mut self, other: &Rect) {
        *self = self.union(other);
    }

    /// Whether the point lies inside the box (edges inclusive).
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x0 && point.x <= self.x1 && point.y >= self.y0 && point.y <= self.y1
    }

    /// Whether the two boxes overlap (edges inclusive).
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x0 <= other.x1 && other.x0 <= self.x1 && self.y0 <= other.y1 && other.y0 <= self.y1
    }
}

/// 2D point or displacement.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Affine transform `[a, b, c, d, e, f]`.
///
/// Only the linear part `(a, b, c, d)` participates in orientation
/// classification; `(e, f)` is the translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Matrix {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// The identity transform.
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Whether the linear part has any off-diagonal component
    /// (rotation or skew).
    pub fn is_rotated(&self) -> bool {
        self.b.abs() > 0.0 || self.c.abs() > 0.0
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

/// RGB color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorRgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Channel threshold above which a color counts as white.
const COLOR_MAX: f64 = 0.99;

impl ColorRgb {
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn white() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    /// Whether all channels are close enough to 1 to count as white.
    pub fn is_white(&self) -> bool {
        self.r > COLOR_MAX && self.g > COLOR_MAX && self.b > COLOR_MAX
    }
}

impl Default for ColorRgb {
    fn default() -> Self {
        Self::white()
    }
}
