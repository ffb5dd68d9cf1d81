//! Per-page input bundle.

use serde::{Deserialize, Serialize};

use super::{PageLines, TextPlacement};
use crate::geom::Rect;

/// One page's worth of interpreter output: the media box, the glyph-run
/// placements in emission order, and the painted straight segments.
///
/// Pages are mutually independent; the composers never reach across a
/// `PageContent` boundary except for the single carry-over string used by
/// cross-page de-duplication.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    /// Page media box `(x0, y0, x1, y1)`
    pub media_box: Rect,

    /// Glyph-run placements in content-stream order
    #[serde(default)]
    pub texts: Vec<TextPlacement>,

    /// Painted straight segments
    #[serde(default)]
    pub lines: PageLines,
}

impl PageContent {
    /// Create an empty page with the given media box.
    pub fn new(media_box: Rect) -> Self {
        Self {
            media_box,
            texts: Vec::new(),
            lines: PageLines::new(),
        }
    }

    /// Page width in page units.
    pub fn width(&self) -> f64 {
        self.media_box.width()
    }

    /// Page height in page units.
    pub fn height(&self) -> f64 {
        self.media_box.height()
    }

    /// Whether the page has neither text nor painted lines.
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty() && self.lines.is_empty()
    }
}
