//! Delimited-text export for inferred tables.

use crate::model::Table;

/// Blank lines between consecutive tables on one page.
const TABLE_SEPARATOR_LINES: usize = 2;

/// Blank lines between pages.
const PAGE_SEPARATOR_LINES: usize = 4;

/// Render one table: cells joined by `delimiter`, one row per line.
///
/// Every row is newline-terminated, so the output of consecutive tables can
/// be concatenated directly.
pub fn table_to_csv(table: &Table, delimiter: &str) -> String {
    let mut out = String::new();
    for row in &table.rows {
        let mut first = true;
        for cell in row {
            if !first {
                out.push_str(delimiter);
            }
            out.push_str(&cell.text);
            first = false;
        }
        out.push('\n');
    }
    out
}

/// Render all tables of all pages into one delimited-text stream.
///
/// Tables on a page are separated by [`TABLE_SEPARATOR_LINES`] blank lines,
/// pages by [`PAGE_SEPARATOR_LINES`].
pub fn pages_to_csv(pages: &[Vec<Table>], delimiter: &str) -> String {
    let mut out = String::new();
    for (page_index, tables) in pages.iter().enumerate() {
        if page_index > 0 {
            for _ in 0..PAGE_SEPARATOR_LINES {
                out.push('\n');
            }
        }
        for (table_index, table) in tables.iter().enumerate() {
            if table_index > 0 {
                for _ in 0..TABLE_SEPARATOR_LINES {
                    out.push('\n');
                }
            }
            out.push_str(&table_to_csv(table, delimiter));
        }
    }
    out
}
