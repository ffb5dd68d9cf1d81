//! Composition options and page-range selection.

use serde::{Deserialize, Serialize};

/// Which inferred spacing the text composers emit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spacing {
    /// Inter-word spaces estimated from horizontal gaps
    pub horizontal: bool,

    /// Blank lines estimated from vertical gaps
    pub vertical: bool,
}

impl Spacing {
    /// No inferred spacing.
    pub const NONE: Spacing = Spacing {
        horizontal: false,
        vertical: false,
    };

    /// Horizontal inter-word spacing only.
    pub const HORIZONTAL: Spacing = Spacing {
        horizontal: true,
        vertical: false,
    };

    /// Vertical blank-line spacing only.
    pub const VERTICAL: Spacing = Spacing {
        horizontal: false,
        vertical: true,
    };

    /// Both spacing inferences.
    pub const BOTH: Spacing = Spacing {
        horizontal: true,
        vertical: true,
    };
}

/// Base direction for the visual-to-logical bidi pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BidiMode {
    /// No reordering
    #[default]
    Off,
    /// Left-to-right base direction
    LeftToRight,
    /// Right-to-left base direction
    RightToLeft,
}

impl BidiMode {
    /// Map the conventional integer flag: negative disables, 0 is LTR,
    /// anything else RTL.
    pub fn from_flag(flag: i32) -> Self {
        if flag < 0 {
            BidiMode::Off
        } else if flag == 0 {
            BidiMode::LeftToRight
        } else {
            BidiMode::RightToLeft
        }
    }
}

/// Options shared by the text, table, and document composition paths.
#[derive(Debug, Clone)]
pub struct ComposeOptions {
    /// Bidi reordering mode for composed lines
    pub bidi: BidiMode,

    /// Spacing inference flags
    pub spacing: Spacing,

    /// Cell delimiter used by the CSV exporter
    pub delimiter: String,

    /// Process pages on a thread pool (outputs are reassembled in page
    /// order; the cross-page carry-over stays sequential)
    pub parallel: bool,
}

impl ComposeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bidi mode.
    pub fn with_bidi(mut self, bidi: BidiMode) -> Self {
        self.bidi = bidi;
        self
    }

    /// Set the spacing flags.
    pub fn with_spacing(mut self, spacing: Spacing) -> Self {
        self.spacing = spacing;
        self
    }

    /// Set the CSV cell delimiter.
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Disable parallel page processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            bidi: BidiMode::Off,
            spacing: Spacing::BOTH,
            delimiter: ",".into(),
            parallel: true,
        }
    }
}

/// Inclusive page range with negative-from-end indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    /// First page; negative counts from the end
    pub start: i64,

    /// Last page, inclusive; negative counts from the end
    pub end: i64,
}

impl PageRange {
    /// The whole document.
    pub fn all() -> Self {
        Self { start: 0, end: -1 }
    }

    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Resolve against a concrete page count, clamping to document bounds.
    /// Returns `None` for an empty document.
    pub fn resolve(&self, page_count: usize) -> Option<(usize, usize)> {
        if page_count == 0 {
            return None;
        }
        let count = page_count as i64;
        let mut start = if self.start >= 0 {
            self.start
        } else {
            count + self.start
        };
        let mut end = if self.end >= 0 { self.end } else { count + self.end };

        end = end.clamp(0, count - 1);
        start = start.clamp(0, count - 1);
        if start > end {
            start = end;
        }
        Some((start as usize, end as usize))
    }
}

impl Default for PageRange {
    fn default() -> Self {
        Self::all()
    }
}
