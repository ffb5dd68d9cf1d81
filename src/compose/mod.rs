//! Composition passes: reading order, page metrics, formatting inference,
//! and the text/table/document composers built on them.

pub mod document;
pub mod format;
pub mod metrics;
pub mod orientation;
pub mod table;
pub mod text;

pub use document::DocumentComposer;
pub use metrics::PageMetrics;
pub use table::{compose_tables, TableOutcome};
pub use text::TextComposer;
