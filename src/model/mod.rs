//! Value types shared across the pipeline.
//!
//! Placements and page bundles are the input side (produced by an upstream
//! content-stream interpreter); tables and the block document are the output
//! side. All types are plain data with serde derives.

mod document;
mod page;
mod placement;
mod table;

pub use document::{Alignment, Block, BlockFormat, Document, FormattedRun, RunStyle};
pub use page::PageContent;
pub use placement::{LinePlacement, PageLines, TextAttributes, TextPlacement};
pub use table::{Table, TableCell};
