//! Extraction pipeline: page selection, per-page composition, and output
//! assembly.
//!
//! Text and table composition are page-local and run on the rayon pool when
//! enabled; results are collected back in page order, so the output is
//! identical either way. Document composition carries one string across
//! pages and therefore always runs sequentially.

use rayon::prelude::*;

use crate::compose::{compose_tables, DocumentComposer, TableOutcome, TextComposer};
use crate::error::{ExtractionWarning, Result, WarningKind};
use crate::model::{Document, PageContent, Table};
use crate::options::{BidiMode, ComposeOptions, PageRange};
use crate::render::{self, DocumentBuilder, DocumentSink};

/// Configured entry point. Build one, point it at interpreter output.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    options: ComposeOptions,
    range: PageRange,
}

impl Extractor {
    pub fn new(options: ComposeOptions) -> Self {
        Self {
            options,
            range: PageRange::all(),
        }
    }

    /// Restrict extraction to a page range.
    pub fn with_range(mut self, range: PageRange) -> Self {
        self.range = range;
        self
    }

    /// Run composition over pages from any source. The input is consumed;
    /// pages arrive in document order.
    pub fn run<I>(&self, pages: I) -> Result<Extraction>
    where
        I: IntoIterator<Item = PageContent>,
    {
        let pages: Vec<PageContent> = pages.into_iter().collect();
        let Some((start, end)) = self.range.resolve(pages.len()) else {
            return Ok(Extraction {
                options: self.options.clone(),
                first_page: 0,
                pages: Vec::new(),
                page_texts: Vec::new(),
                tables: Vec::new(),
                warnings: Vec::new(),
            });
        };

        let selected: Vec<PageContent> = pages
            .into_iter()
            .skip(start)
            .take(end - start + 1)
            .collect();
        log::debug!(
            "composing pages {start}..={end} ({} selected)",
            selected.len()
        );

        let compose_one = |page: &PageContent| -> (String, usize, TableOutcome) {
            let mut composer = TextComposer::new(self.options.bidi, self.options.spacing);
            composer.compose_page(&page.texts);
            let unresolved = composer.unresolved_bidi_lines();
            let outcome = compose_tables(page, self.options.bidi, self.options.spacing);
            (composer.into_text(), unresolved, outcome)
        };

        let results: Vec<(String, usize, TableOutcome)> = if self.options.parallel {
            selected.par_iter().map(compose_one).collect()
        } else {
            selected.iter().map(compose_one).collect()
        };

        let mut page_texts = Vec::with_capacity(results.len());
        let mut tables = Vec::with_capacity(results.len());
        let mut warnings = Vec::new();
        for (offset, (text, unresolved, outcome)) in results.into_iter().enumerate() {
            let page_index = start + offset;
            if unresolved > 0 {
                warnings.push(ExtractionWarning::new(
                    page_index,
                    WarningKind::UnresolvedBidi,
                    format!("{unresolved} line(s) carried explicit directional controls"),
                ));
            }
            for (kind, message) in outcome.notes {
                warnings.push(ExtractionWarning::new(page_index, kind, message));
            }
            page_texts.push(text);
            tables.push(outcome.tables);
        }

        Ok(Extraction {
            options: self.options.clone(),
            first_page: start,
            pages: selected,
            page_texts,
            tables,
            warnings,
        })
    }

    /// Load a placement dump and run composition over it.
    pub fn run_file(&self, path: impl AsRef<std::path::Path>) -> Result<Extraction> {
        self.run(crate::input::from_path(path)?)
    }
}

/// Composed results for one document.
#[derive(Debug)]
pub struct Extraction {
    options: ComposeOptions,
    first_page: usize,
    pages: Vec<PageContent>,
    page_texts: Vec<String>,
    tables: Vec<Vec<Table>>,
    warnings: Vec<ExtractionWarning>,
}

impl Extraction {
    /// Number of pages composed.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Document index of the first composed page.
    pub fn first_page(&self) -> usize {
        self.first_page
    }

    /// Plain reading-order text across all composed pages, NFC-normalized.
    pub fn text(&self) -> String {
        render::text::join_pages(&self.page_texts)
    }

    /// Append host-supplied text to the plain-text stream, after everything
    /// composed so far. It bypasses composition and normalization until
    /// [`text`](Self::text) renders the whole stream.
    pub fn append_text(&mut self, text: impl Into<String>) {
        self.page_texts.push(text.into());
    }

    /// Composed text of one page (index relative to the selection).
    pub fn page_text(&self, index: usize) -> Option<&str> {
        self.page_texts.get(index).map(String::as_str)
    }

    /// Inferred tables, one list per composed page.
    pub fn tables(&self) -> &[Vec<Table>] {
        &self.tables
    }

    /// All tables rendered as one delimited-text stream.
    pub fn tables_csv(&self) -> String {
        render::csv::pages_to_csv(&self.tables, &self.options.delimiter)
    }

    /// Render a single table with the configured delimiter.
    pub fn table_csv(&self, table: &Table) -> String {
        render::csv::table_to_csv(table, &self.options.delimiter)
    }

    /// Compose the block-structured document into `sink`. Pages are walked
    /// sequentially so the cross-page de-duplication string carries over.
    pub fn compose_document(&self, sink: &mut dyn DocumentSink) {
        let mut composer = DocumentComposer::new(self.options.spacing);
        for page in &self.pages {
            composer.compose_page(page, sink);
        }
    }

    /// Compose the block-structured document into the in-memory model.
    pub fn document(&self) -> Document {
        let mut builder = DocumentBuilder::new();
        self.compose_document(&mut builder);
        builder.finish()
    }

    /// Non-fatal anomalies observed during composition, in page order.
    pub fn warnings(&self) -> &[ExtractionWarning] {
        &self.warnings
    }

    /// Whether any line anywhere needed a bidi pass it could not honor.
    pub fn has_unresolved_bidi(&self) -> bool {
        self.options.bidi != BidiMode::Off
            && self
                .warnings
                .iter()
                .any(|w| w.kind == WarningKind::UnresolvedBidi)
    }
}
