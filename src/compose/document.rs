//! Block-structured document composition.
//!
//! Walks one page's placements in reading order, folding runs into line
//! buffers and lines into paragraphs. Lines made of bare numbering tokens
//! are dropped, leading "12." clause numbers are subtracted from the line
//! box, and a paragraph break is decided from margin geometry every time a
//! line completes. The composer holds the last flushed line across pages so
//! a repeated first line on the next page can be de-duplicated.

use crate::compose::format::infer_run;
use crate::compose::metrics::{is_dot_or_colon, is_number, is_number_and_dot, PageMetrics, RIGHT_PART};
use crate::compose::orientation::{are_same_line, horizontal_spacing, reading_order};
use crate::geom::Rect;
use crate::model::{Alignment, BlockFormat, FormattedRun, PageContent, TextPlacement};
use crate::options::Spacing;
use crate::render::DocumentSink;

/// Stateful document composer. Feed pages in order; the only state carried
/// between pages is the de-duplication string.
#[derive(Debug, Default)]
pub struct DocumentComposer {
    spacing: Spacing,
    last_written_text: String,
}

/// Paragraph accumulator: the union box plus every member line box.
#[derive(Debug, Default)]
struct ParagraphBox {
    bounds: Rect,
    lines: Vec<Rect>,
}

impl ParagraphBox {
    /// Grow left/right to cover the line; the bottom edge always follows
    /// the latest line, the top edge stays at the first one.
    fn add_line(&mut self, line: &Rect) {
        if self.lines.is_empty() {
            self.bounds = *line;
        } else {
            self.bounds.y0 = line.y0;
            self.bounds.x0 = self.bounds.x0.min(line.x0);
            self.bounds.x1 = self.bounds.x1.max(line.x1);
        }
        self.lines.push(*line);
    }

    fn clear(&mut self) {
        self.bounds = Rect::default();
        self.lines.clear();
    }
}

impl DocumentComposer {
    pub fn new(spacing: Spacing) -> Self {
        Self {
            spacing,
            last_written_text: String::new(),
        }
    }

    /// Compose one page into the sink.
    pub fn compose_page(&mut self, page: &PageContent, sink: &mut dyn DocumentSink) {
        let mut sorted = page.texts.clone();
        sorted.sort_by(reading_order);
        if sorted.is_empty() {
            return;
        }

        let metrics = PageMetrics::compute(&sorted, page.media_box, &page.lines);

        let mut first_line_on_page = true;
        let mut previous_paragraph_bottom = page.media_box.y1;
        let mut paragraph = ParagraphBox::default();
        sink.begin_block();

        // numbering flags seed from the raw first placement, before the
        // body-text skip
        let mut starts_with_number = is_number(&sorted[0].text);
        let mut subtract_number = is_number_and_dot(&sorted[0].text);

        let mut i = 0;
        while i < sorted.len() && !metrics.is_body_text(&sorted[i]) {
            i += 1;
        }
        if i == sorted.len() {
            return;
        }

        let mut latest = sorted[i].clone();
        let mut line_box = sorted[i].global_box;
        let mut line_runs: Vec<FormattedRun> = Vec::new();

        let first_run = infer_run(&sorted[i], &page.lines);
        let mut latest_style = first_run.style;
        let mut latest_background = first_run.background;
        line_runs.push(first_run);

        i += 1;
        while i < sorted.len() {
            if !metrics.is_body_text(&sorted[i]) {
                i += 1;
                continue;
            }

            if !are_same_line(&latest, &sorted[i]) {
                // stray whitespace runs drift past line boundaries; keep the
                // ones that still belong to the current line, drop the rest
                while i < sorted.len() && sorted[i].is_blank() {
                    if are_same_line(&latest, &sorted[i]) {
                        line_runs.push(FormattedRun::plain(" "));
                    }
                    i += 1;
                }
                if i == sorted.len() {
                    break;
                }
                if !metrics.is_body_text(&sorted[i]) {
                    i += 1;
                    continue;
                }
            }

            let item = &sorted[i];
            if are_same_line(&latest, item) {
                if self.spacing.horizontal && horizontal_spacing(&latest, item) != 0 {
                    line_runs.push(FormattedRun::plain(" "));
                }

                if subtract_number {
                    // restart the line box past the clause number
                    line_box = item.global_box;
                    if latest.global_box.x0 < metrics.min_left_margin {
                        // a scene number in the margin; its separator space
                        // is often unreadable, add one back
                        line_runs.push(FormattedRun::plain(" "));
                    } else {
                        line_runs.clear();
                    }
                    subtract_number = false;
                    starts_with_number = false;
                } else if !item.is_blank() {
                    line_box.extend(&item.global_box);
                }

                if starts_with_number {
                    if is_dot_or_colon(&item.text) {
                        subtract_number = true;
                    } else if !is_number(&item.text) {
                        starts_with_number = false;
                    }
                }
            } else {
                let previous_line_text = runs_text(&line_runs);
                if is_number_and_dot(&previous_line_text) || is_number(&previous_line_text) {
                    // the whole line was a bare number
                    line_runs.clear();
                } else {
                    // trailing space inherits the latest run's formatting so
                    // multi-line styling is not split
                    line_runs.push(FormattedRun {
                        text: " ".into(),
                        style: latest_style,
                        background: latest_background,
                    });

                    if first_line_on_page {
                        first_line_on_page = false;
                        if !self.last_written_text.is_empty()
                            && runs_text(&line_runs).contains(&self.last_written_text)
                        {
                            sink.trim_previous_block(self.last_written_text.chars().count());
                        }
                    }

                    self.last_written_text = flush_runs(&mut line_runs, sink);
                    paragraph.add_line(&line_box);

                    let new_line = peek_line_box(&sorted, i);
                    if is_new_paragraph(&line_box, &new_line, &metrics) {
                        sink.set_block_format(block_format(
                            &paragraph,
                            &metrics,
                            previous_paragraph_bottom,
                        ));
                        previous_paragraph_bottom = paragraph.bounds.y0;
                        paragraph.clear();
                        sink.begin_block();
                    }
                }
                starts_with_number = is_number(&item.text);
                subtract_number = is_number_and_dot(&item.text);
                line_box = item.global_box;
            }

            let run = infer_run(item, &page.lines);
            latest_style = run.style;
            latest_background = run.background;
            line_runs.push(run);
            if !item.is_blank() {
                latest = item.clone();
            }
            i += 1;
        }

        let previous_line_text = runs_text(&line_runs);
        if !is_number_and_dot(&previous_line_text) && !is_number(&previous_line_text) {
            line_runs.push(FormattedRun::plain(" "));
            self.last_written_text = flush_runs(&mut line_runs, sink);
        }
        paragraph.add_line(&line_box);
        sink.set_block_format(block_format(&paragraph, &metrics, previous_paragraph_bottom));
    }
}

fn runs_text(runs: &[FormattedRun]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}

/// Move the buffered runs into the sink, returning their concatenated text.
fn flush_runs(runs: &mut Vec<FormattedRun>, sink: &mut dyn DocumentSink) -> String {
    let mut text = String::new();
    for run in runs.drain(..) {
        text.push_str(&run.text);
        sink.insert_run(run);
    }
    text
}

/// Union box of the line starting at `start`, skipping blank members.
fn peek_line_box(sorted: &[TextPlacement], start: usize) -> Rect {
    let mut bounds = sorted[start].global_box;
    for item in &sorted[start + 1..] {
        if !are_same_line(&sorted[start], item) {
            break;
        }
        if !item.is_blank() {
            bounds.extend(&item.global_box);
        }
    }
    bounds
}

/// Paragraph-break decision between a completed line and the next one.
fn is_new_paragraph(prev: &Rect, new: &Rect, metrics: &PageMetrics) -> bool {
    let text_height = new.height();
    let max_text_width = metrics.min_right_margin - metrics.min_left_margin;
    let gap = prev.y0 - new.y1;
    let diff_left = prev.x0 - new.x0;
    let diff_right = prev.x1 - new.x1;
    let prev_left_margin = prev.x0 - metrics.min_left_margin;
    let prev_right_margin = metrics.min_right_margin - prev.x1;
    let new_left_margin = new.x0 - metrics.min_left_margin;
    let both_on_right_side = new.x1 > metrics.media_box.x1 * RIGHT_PART
        && prev.x1 > metrics.media_box.x1 * RIGHT_PART;

    // a full-margin line that stops well short of the right border ends its
    // paragraph even when the next line starts flush left
    let previous_ends_paragraph = new_left_margin < 1.0
        && prev_left_margin < 1.0
        && prev_right_margin > max_text_width / 3.0;

    let continues_paragraph = (diff_left.abs() < 10.0 && gap * 1.5 < text_height)
        || (diff_right.abs() < 1.0 && gap < text_height && both_on_right_side);

    previous_ends_paragraph || !continues_paragraph
}

/// Layout of the finished paragraph, relative to the measured text origin.
fn block_format(paragraph: &ParagraphBox, metrics: &PageMetrics, previous_bottom: f64) -> BlockFormat {
    let Some(first_line) = paragraph.lines.first() else {
        return BlockFormat::default();
    };

    let line_height = first_line.height();
    let top_margin = if line_height > 0.0 {
        ((previous_bottom - paragraph.bounds.y1) / line_height) as i32
    } else {
        0
    };

    let aligned_right = if first_line.x1 > metrics.media_box.x1 * RIGHT_PART {
        if paragraph.lines.len() > 1 {
            paragraph
                .lines
                .iter()
                .all(|line| (line.x1 - first_line.x1).abs() <= 1.0)
        } else {
            metrics.min_right_margin - first_line.x1 <= 1.0
        }
    } else {
        false
    };

    BlockFormat {
        left_margin: paragraph.bounds.x0 - metrics.min_left_margin,
        top_margin,
        alignment: if aligned_right {
            Alignment::Right
        } else {
            Alignment::Left
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{Matrix, Vec2};
    use crate::model::TextAttributes;
    use crate::render::DocumentBuilder;

    fn run_at(text: &str, global_box: Rect) -> TextPlacement {
        TextPlacement {
            text: text.into(),
            matrix: Matrix::identity(),
            local_box: global_box,
            global_box,
            space_width: 5.0,
            global_space_width: Vec2::new(5.0, 0.0),
            attrs: TextAttributes::default(),
        }
    }

    fn page(texts: Vec<TextPlacement>) -> PageContent {
        let mut page = PageContent::new(Rect::new(0.0, 0.0, 612.0, 792.0));
        page.texts = texts;
        page
    }

    fn compose(pages: &[PageContent]) -> crate::model::Document {
        let mut composer = DocumentComposer::new(Spacing::HORIZONTAL);
        let mut builder = DocumentBuilder::new();
        for p in pages {
            composer.compose_page(p, &mut builder);
        }
        builder.finish()
    }

    #[test]
    fn test_empty_page_yields_nothing() {
        let doc = compose(&[page(vec![])]);
        assert_eq!(doc.block_count(), 0);
    }

    #[test]
    fn test_single_line_block() {
        let doc = compose(&[page(vec![
            run_at("Hello", Rect::new(50.0, 700.0, 100.0, 712.0)),
            run_at("world", Rect::new(110.0, 700.0, 160.0, 712.0)),
        ])]);
        assert_eq!(doc.block_count(), 1);
        assert_eq!(doc.blocks[0].plain_text(), "Hello world ");
    }

    #[test]
    fn test_wrapped_lines_stay_in_one_block() {
        // consecutive flush-left lines one line-height apart
        let doc = compose(&[page(vec![
            run_at("first line of the wrapped", Rect::new(50.0, 700.0, 500.0, 712.0)),
            run_at("paragraph body keeps going on", Rect::new(50.0, 685.0, 520.0, 697.0)),
            run_at("and on here", Rect::new(50.0, 670.0, 450.0, 682.0)),
        ])]);
        assert_eq!(doc.block_count(), 1);
        assert!(doc.blocks[0]
            .plain_text()
            .starts_with("first line of the wrapped paragraph"));
    }

    #[test]
    fn test_indent_starts_new_block() {
        let doc = compose(&[page(vec![
            run_at("paragraph one text that runs", Rect::new(50.0, 700.0, 520.0, 712.0)),
            run_at("Indented dialogue", Rect::new(200.0, 685.0, 400.0, 697.0)),
        ])]);
        assert_eq!(doc.block_count(), 2);
        assert_eq!(doc.blocks[1].plain_text(), "Indented dialogue ");
        // indent measured from the smallest observed line start
        assert_eq!(doc.blocks[1].format.left_margin, 150.0);
    }

    #[test]
    fn test_large_gap_starts_new_block() {
        let doc = compose(&[page(vec![
            run_at("above the gap stretches here", Rect::new(50.0, 700.0, 500.0, 712.0)),
            run_at("below the gap it continues on", Rect::new(50.0, 640.0, 510.0, 652.0)),
        ])]);
        assert_eq!(doc.block_count(), 2);
        // four line-heights of drop land in the second block's top margin
        assert_eq!(doc.blocks[1].format.top_margin, 4);
    }

    #[test]
    fn test_number_only_line_dropped() {
        let doc = compose(&[page(vec![
            run_at("42", Rect::new(50.0, 700.0, 70.0, 712.0)),
            run_at("actual content of the page here", Rect::new(50.0, 685.0, 520.0, 697.0)),
        ])]);
        assert_eq!(doc.block_count(), 1);
        assert_eq!(
            doc.blocks[0].plain_text(),
            "actual content of the page here "
        );
    }

    #[test]
    fn test_clause_number_dropped_from_line() {
        // "7." sits inside the text body (another line starts further
        // left), so it reads as a clause number and is dropped along with
        // its contribution to the line box
        let doc = compose(&[page(vec![
            run_at("intro line of text up here", Rect::new(50.0, 730.0, 500.0, 742.0)),
            run_at("7", Rect::new(50.0, 700.0, 58.0, 712.0)),
            run_at(".", Rect::new(58.0, 700.0, 61.0, 712.0)),
            run_at("clause body text goes here", Rect::new(100.0, 700.0, 500.0, 712.0)),
            run_at("second line of clause body", Rect::new(100.0, 685.0, 495.0, 697.0)),
        ])]);
        assert_eq!(doc.block_count(), 2);
        let text = doc.blocks[1].plain_text();
        assert!(text.contains("clause body text goes here"));
        assert!(!text.contains('7'));
        // both clause lines share the block
        assert!(text.contains("second line of clause body"));
    }

    #[test]
    fn test_margin_scene_number_kept() {
        // the same "7." left of every body line is a margin annotation;
        // its text stays, separated by a recovered space
        let doc = compose(&[page(vec![
            run_at("7", Rect::new(20.0, 700.0, 28.0, 712.0)),
            run_at(".", Rect::new(28.0, 700.0, 31.0, 712.0)),
            run_at("body text starts over here", Rect::new(100.0, 700.0, 500.0, 712.0)),
            run_at("and wraps onto a second line", Rect::new(100.0, 685.0, 510.0, 697.0)),
        ])]);
        let text = doc.plain_text();
        assert!(text.contains("7."));
        assert!(text.contains("body text starts over here"));
    }

    #[test]
    fn test_cross_page_deduplication() {
        let page_one = page(vec![
            run_at("unique upper line of page one", Rect::new(50.0, 700.0, 500.0, 712.0)),
            run_at("carried over", Rect::new(50.0, 100.0, 200.0, 112.0)),
        ]);
        let page_two = page(vec![
            run_at("carried over", Rect::new(50.0, 700.0, 200.0, 712.0)),
            run_at("fresh text of page two here", Rect::new(50.0, 685.0, 500.0, 697.0)),
        ]);
        let doc = compose(&[page_one, page_two]);
        let full = doc.plain_text();
        assert_eq!(full.matches("carried over").count(), 1);
    }

    #[test]
    fn test_right_aligned_single_line() {
        // a lone line hugging the right border
        let doc = compose(&[page(vec![
            run_at("body text begins over here", Rect::new(50.0, 700.0, 560.0, 712.0)),
            run_at("signature", Rect::new(480.0, 640.0, 560.0, 652.0)),
        ])]);
        assert_eq!(doc.block_count(), 2);
        assert_eq!(doc.blocks[1].format.alignment, Alignment::Right);
    }

    #[test]
    fn test_rotated_run_excluded() {
        let mut watermark = run_at("DRAFT", Rect::new(200.0, 400.0, 400.0, 430.0));
        watermark.matrix = Matrix::new(0.7, 0.7, -0.7, 0.7, 0.0, 0.0);
        let doc = compose(&[page(vec![
            watermark,
            run_at("kept body line of text here", Rect::new(50.0, 700.0, 500.0, 712.0)),
        ])]);
        assert!(!doc.plain_text().contains("DRAFT"));
    }
}
