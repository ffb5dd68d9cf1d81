//! Placement value types produced by an upstream content-stream interpreter.
//!
//! A placement is a single glyph run or painted straight segment already
//! resolved to page-global coordinates. Placements are immutable: they are
//! created once per page and only read by the composers.

use serde::{Deserialize, Serialize};

use crate::geom::{ColorRgb, Matrix, Rect, Vec2};

/// A positioned glyph run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPlacement {
    /// Decoded text of the run
    pub text: String,

    /// Text-space to page-space transform at placement time
    pub matrix: Matrix,

    /// Bounding box in text space
    pub local_box: Rect,

    /// Bounding box in page-global space
    pub global_box: Rect,

    /// Space-glyph width from font metrics, in text space
    pub space_width: f64,

    /// Space-glyph width with the transform applied (anisotropic)
    pub global_space_width: Vec2,

    /// Character attributes reported by the interpreter
    #[serde(default)]
    pub attrs: TextAttributes,
}

impl TextPlacement {
    /// Whether the run carries no visible text (empty or whitespace only).
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Character attributes attached to a text placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAttributes {
    /// Italic face
    pub italic: bool,

    /// Bold face
    pub bold: bool,

    /// Underlined (set by the interpreter or inferred from line geometry)
    pub underline: bool,

    /// Struck out
    pub strikeout: bool,

    /// Constant fill alpha in `[0, 1]`
    pub alpha: f64,
}

impl Default for TextAttributes {
    fn default() -> Self {
        Self {
            italic: false,
            bold: false,
            underline: false,
            strikeout: false,
            alpha: 1.0,
        }
    }
}

/// Alpha window inside which a run counts as translucent (watermark).
const ALPHA_MIN: f64 = 0.001;
const ALPHA_MAX: f64 = 0.999;

impl TextAttributes {
    /// Whether the alpha sits strictly between fully transparent and opaque.
    pub fn is_translucent(&self) -> bool {
        self.alpha > ALPHA_MIN && self.alpha < ALPHA_MAX
    }
}

/// A painted straight segment classified by the interpreter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePlacement {
    /// Vertical segment flag
    pub vertical: bool,

    /// Left end for horizontal lines, top end for vertical lines
    pub point_one: Vec2,

    /// Right end for horizontal lines, bottom end for vertical lines
    pub point_two: Vec2,

    /// Stroke width with the transform applied, per axis
    pub effective_width: Vec2,

    /// Stroke color
    #[serde(default)]
    pub color: ColorRgb,
}

impl LinePlacement {
    /// Horizontal extent of the segment.
    pub fn length(&self) -> f64 {
        if self.vertical {
            (self.point_one.y - self.point_two.y).abs()
        } else {
            (self.point_two.x - self.point_one.x).abs()
        }
    }

    /// Whether the segment has zero length or zero stroke width.
    pub fn is_degenerate(&self) -> bool {
        self.length() == 0.0 || (self.effective_width.x == 0.0 && self.effective_width.y == 0.0)
    }
}

/// All straight segments painted on one page, split by orientation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageLines {
    /// Horizontal segments in paint order
    pub horizontal: Vec<LinePlacement>,

    /// Vertical segments in paint order
    pub vertical: Vec<LinePlacement>,
}

impl PageLines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of segments on the page.
    pub fn len(&self) -> usize {
        self.horizontal.len() + self.vertical.len()
    }

    /// Whether the page has no painted segments.
    pub fn is_empty(&self) -> bool {
        self.horizontal.is_empty() && self.vertical.is_empty()
    }
}
