//! Reading-order plain-text composition.
//!
//! Sorts a page's placements into reading order, folds same-line runs into
//! line buffers with inferred inter-word spaces, and flushes each line with
//! inferred vertical blank lines and an optional bidi pass.

use crate::compose::orientation::{are_same_line, horizontal_spacing, reading_order};
use crate::geom::Rect;
use crate::model::TextPlacement;
use crate::options::{BidiMode, Spacing};
use crate::render::bidi;

/// Accumulating plain-text composer.
///
/// One composer instance can consume several pages in sequence; the buffer
/// grows across [`compose_page`](Self::compose_page) calls and arbitrary
/// text can be interleaved with [`append_text`](Self::append_text).
#[derive(Debug)]
pub struct TextComposer {
    bidi: BidiMode,
    spacing: Spacing,
    buffer: String,
    unresolved_bidi_lines: usize,
}

impl TextComposer {
    pub fn new(bidi: BidiMode, spacing: Spacing) -> Self {
        Self {
            bidi,
            spacing,
            buffer: String::new(),
            unresolved_bidi_lines: 0,
        }
    }

    /// Compose one page's placements into the buffer.
    pub fn compose_page(&mut self, texts: &[TextPlacement]) {
        let mut sorted: Vec<&TextPlacement> = texts.iter().collect();
        sorted.sort_by(|a, b| reading_order(a, b));

        let Some((first, rest)) = sorted.split_first() else {
            return;
        };

        let mut line_text = first.text.clone();
        let mut line_box = first.global_box;
        let mut previous_line: Option<Rect> = None;
        let mut latest = *first;

        for &item in rest {
            if are_same_line(latest, item) {
                if self.spacing.horizontal {
                    for _ in 0..horizontal_spacing(latest, item) {
                        line_text.push(' ');
                    }
                }
                line_box.extend(&item.global_box);
            } else {
                self.flush_line(&line_text, &line_box, previous_line.as_ref());
                previous_line = Some(line_box);
                line_text.clear();
                line_box = item.global_box;
            }
            line_text.push_str(&item.text);
            latest = item;
        }

        self.flush_line(&line_text, &line_box, previous_line.as_ref());
    }

    /// Append raw text verbatim, bypassing composition.
    pub fn append_text(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Composed text so far.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Consume the composer, yielding the composed text.
    pub fn into_text(self) -> String {
        self.buffer
    }

    /// Lines seen so far that carried explicit bidi controls while a bidi
    /// pass was active.
    pub fn unresolved_bidi_lines(&self) -> usize {
        self.unresolved_bidi_lines
    }

    fn flush_line(&mut self, text: &str, line_box: &Rect, previous_line: Option<&Rect>) {
        if self.spacing.vertical {
            if let Some(prev) = previous_line {
                if line_box.top() < prev.bottom() && prev.height() > 0.0 {
                    let blanks =
                        ((prev.bottom() - line_box.top()) / prev.height()).floor() as usize;
                    for _ in 0..blanks {
                        self.buffer.push('\n');
                    }
                }
            }
        }

        if self.bidi != BidiMode::Off && bidi::has_directional_controls(text) {
            self.unresolved_bidi_lines += 1;
        }
        self.buffer.push_str(&bidi::visual_to_logical(text, self.bidi));
        self.buffer.push('\n');
    }
}
