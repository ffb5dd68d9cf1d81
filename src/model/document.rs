//! Block-structured output document model.

use serde::{Deserialize, Serialize};

use crate::geom::ColorRgb;

/// Ordered sequence of reconstructed blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Blocks in reading order, across all pages
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Concatenated run text, blocks separated by a newline.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One paragraph-level block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Layout metadata for the block
    pub format: BlockFormat,

    /// Formatted runs in reading order
    pub runs: Vec<FormattedRun>,
}

impl Block {
    /// Concatenated text of all runs.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Whether the block has no runs or only whitespace.
    pub fn is_empty(&self) -> bool {
        self.plain_text().trim().is_empty()
    }
}

/// Layout metadata attached to a block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockFormat {
    /// Left-margin offset from the page's text origin, in page units
    pub left_margin: f64,

    /// Vertical gap to the previous block, in whole line heights
    pub top_margin: i32,

    /// Horizontal alignment
    pub alignment: Alignment,
}

/// Block alignment. Only right alignment is detected; everything else
/// reads as left-aligned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Right alignment
    Right,
}

/// A run of text with uniform character formatting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormattedRun {
    /// Run text
    pub text: String,

    /// Character formatting
    pub style: RunStyle,

    /// Background/highlight color
    pub background: ColorRgb,
}

impl FormattedRun {
    /// Create a plain run with default style and white background.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: RunStyle::default(),
            background: ColorRgb::white(),
        }
    }
}

/// Character formatting flags carried by a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikeout: bool,
}

impl RunStyle {
    /// Whether any flag is set.
    pub fn is_plain(&self) -> bool {
        !(self.bold || self.italic || self.underline || self.strikeout)
    }
}
