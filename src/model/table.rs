//! Inferred table entities.

use serde::{Deserialize, Serialize};

use super::TextPlacement;
use crate::geom::Rect;

/// A table inferred from a rectangular lattice of painted lines.
///
/// Rows are ordered top to bottom, cells within a row left to right.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Overall grid bounds
    pub bounds: Rect,

    /// Cell grid, row-major
    pub rows: Vec<Vec<TableCell>>,
}

impl Table {
    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (from the first row).
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.len()).unwrap_or(0)
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(|r| r.len()).sum()
    }

    /// Cell at `(row, column)` if present.
    pub fn cell(&self, row: usize, column: usize) -> Option<&TableCell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Whether the table holds no cells.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One cell of an inferred table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell bounds within the grid
    pub bounds: Rect,

    /// Placements whose centroid fell inside this cell
    pub placements: Vec<TextPlacement>,

    /// Cell text, composed with the reading-order line rules restricted to
    /// this cell's placements
    pub text: String,
}

impl TableCell {
    /// Create an empty cell covering `bounds`.
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            placements: Vec::new(),
            text: String::new(),
        }
    }

    /// Whether no placement was assigned to the cell.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}
