//! Output adapters: plain text, delimited tables, and the block/run sink.

pub mod bidi;
pub mod csv;
pub mod sink;
pub mod text;

pub use sink::{DocumentBuilder, DocumentSink};
