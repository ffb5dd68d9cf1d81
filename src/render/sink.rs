//! Block/run sink for document composition.
//!
//! The document composer emits structure events rather than building the
//! output model directly, so alternative backends (rich-text widgets,
//! markup writers) can consume the same stream. [`DocumentBuilder`] is the
//! in-memory backend producing a [`Document`].

use crate::model::{Block, BlockFormat, Document, FormattedRun};

/// Receiver for document-composition events.
///
/// Events arrive in reading order: a `begin_block` opens a block, runs are
/// inserted into the open block, and `set_block_format` attaches the layout
/// of the block once its extent is known.
pub trait DocumentSink {
    /// Open a new block; subsequent runs belong to it.
    fn begin_block(&mut self);

    /// Attach layout metadata to the currently open block.
    fn set_block_format(&mut self, format: BlockFormat);

    /// Append a formatted run to the currently open block.
    fn insert_run(&mut self, run: FormattedRun);

    /// Remove the last `count` characters from the block preceding the open
    /// one. Used by cross-page de-duplication when a page's first line
    /// repeats the text already flushed for the previous page.
    fn trim_previous_block(&mut self, count: usize);
}

/// In-memory sink building a [`Document`].
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    blocks: Vec<Block>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finish building, dropping a trailing block that never received text.
    pub fn finish(mut self) -> Document {
        if self.blocks.last().is_some_and(|b| b.runs.is_empty()) {
            self.blocks.pop();
        }
        Document {
            blocks: self.blocks,
        }
    }
}

impl DocumentSink for DocumentBuilder {
    fn begin_block(&mut self) {
        self.blocks.push(Block::default());
    }

    fn set_block_format(&mut self, format: BlockFormat) {
        if let Some(block) = self.blocks.last_mut() {
            block.format = format;
        }
    }

    fn insert_run(&mut self, run: FormattedRun) {
        if self.blocks.is_empty() {
            self.blocks.push(Block::default());
        }
        if let Some(block) = self.blocks.last_mut() {
            block.runs.push(run);
        }
    }

    fn trim_previous_block(&mut self, count: usize) {
        let len = self.blocks.len();
        if len < 2 || count == 0 {
            return;
        }
        let block = &mut self.blocks[len - 2];

        let mut remaining = count;
        while remaining > 0 {
            let Some(run) = block.runs.last_mut() else {
                break;
            };
            let run_len = run.text.chars().count();
            if run_len <= remaining {
                remaining -= run_len;
                block.runs.pop();
            } else {
                let keep = run_len - remaining;
                run.text = run.text.chars().take(keep).collect();
                remaining = 0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_blocks_and_runs() {
        let mut builder = DocumentBuilder::new();
        builder.begin_block();
        builder.insert_run(FormattedRun::plain("first "));
        builder.insert_run(FormattedRun::plain("line"));
        builder.begin_block();
        builder.insert_run(FormattedRun::plain("second"));

        let doc = builder.finish();
        assert_eq!(doc.block_count(), 2);
        assert_eq!(doc.blocks[0].plain_text(), "first line");
        assert_eq!(doc.blocks[1].plain_text(), "second");
    }

    #[test]
    fn test_trailing_empty_block_dropped() {
        let mut builder = DocumentBuilder::new();
        builder.begin_block();
        builder.insert_run(FormattedRun::plain("text"));
        builder.begin_block();

        let doc = builder.finish();
        assert_eq!(doc.block_count(), 1);
    }

    #[test]
    fn test_trim_previous_block_within_run() {
        let mut builder = DocumentBuilder::new();
        builder.begin_block();
        builder.insert_run(FormattedRun::plain("Page one tail "));
        builder.begin_block();
        builder.insert_run(FormattedRun::plain("tail repeated"));

        builder.trim_previous_block(5);
        let doc = builder.finish();
        assert_eq!(doc.blocks[0].plain_text(), "Page one ");
    }

    #[test]
    fn test_trim_previous_block_across_runs() {
        let mut builder = DocumentBuilder::new();
        builder.begin_block();
        builder.insert_run(FormattedRun::plain("keep "));
        builder.insert_run(FormattedRun::plain("ab"));
        builder.insert_run(FormattedRun::plain("cd"));
        builder.begin_block();
        builder.insert_run(FormattedRun::plain("next page"));

        builder.trim_previous_block(3);
        let doc = builder.finish();
        assert_eq!(doc.blocks[0].plain_text(), "keep a");
        assert_eq!(doc.blocks[0].runs.len(), 2);
    }

    #[test]
    fn test_trim_with_single_block_is_noop() {
        let mut builder = DocumentBuilder::new();
        builder.begin_block();
        builder.insert_run(FormattedRun::plain("only"));
        builder.trim_previous_block(2);
        assert_eq!(builder.finish().blocks[0].plain_text(), "only");
    }
}
