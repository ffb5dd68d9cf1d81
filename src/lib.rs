//! # textloom
//!
//! Reading-order text, table, and rich-text reconstruction from flat page
//! placement geometry.
//!
//! The input is interpreter output: per-page streams of positioned glyph
//! runs and painted straight segments in page-global coordinates. From
//! those, textloom reconstructs plain reading-order text, tables inferred
//! from line lattices, and a block-structured document with margins,
//! alignment, and character formatting.
//!
//! ## Quick Start
//!
//! ```no_run
//! use textloom::{ComposeOptions, Extractor};
//!
//! fn main() -> textloom::Result<()> {
//!     let extraction = Extractor::new(ComposeOptions::default())
//!         .run_file("placements.json")?;
//!
//!     println!("{}", extraction.text());
//!     println!("{}", extraction.tables_csv());
//!
//!     let document = extraction.document();
//!     println!("{} blocks", document.block_count());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Reading order**: orientation-aware sorting, line grouping, inferred
//!   word and blank-line spacing
//! - **Tables**: grid inference from painted line lattices, centroid cell
//!   assignment, delimited-text export
//! - **Rich text**: paragraph detection from margin geometry, underline/
//!   strikeout/highlight inferred from nearby strokes
//! - **Bidi**: optional visual-to-logical reordering per composed line
//! - **Parallel processing**: pages compose on the Rayon pool, outputs stay
//!   in page order

pub mod compose;
pub mod error;
pub mod extract;
pub mod geom;
pub mod input;
pub mod model;
pub mod options;
pub mod render;

// Re-export commonly used types
pub use error::{Error, ExtractionWarning, Result, WarningKind};
pub use extract::{Extraction, Extractor};
pub use model::{
    Alignment, Block, BlockFormat, Document, FormattedRun, LinePlacement, PageContent, PageLines,
    RunStyle, Table, TableCell, TextAttributes, TextPlacement,
};
pub use options::{BidiMode, ComposeOptions, PageRange, Spacing};
pub use render::{DocumentBuilder, DocumentSink};

use std::path::Path;

/// Compose the plain reading-order text of a placement dump.
///
/// # Example
///
/// ```no_run
/// let text = textloom::extract_text("placements.json").unwrap();
/// println!("{text}");
/// ```
pub fn extract_text(path: impl AsRef<Path>) -> Result<String> {
    Ok(Extractor::new(ComposeOptions::default())
        .run_file(path)?
        .text())
}

/// Compose all inferred tables of a placement dump as delimited text.
pub fn extract_tables_csv(path: impl AsRef<Path>) -> Result<String> {
    Ok(Extractor::new(ComposeOptions::default())
        .run_file(path)?
        .tables_csv())
}

/// Compose the block-structured document of a placement dump.
pub fn extract_document(path: impl AsRef<Path>) -> Result<Document> {
    Ok(Extractor::new(ComposeOptions::default())
        .run_file(path)?
        .document())
}
