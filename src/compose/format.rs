//! Character-formatting inference from nearby line geometry.
//!
//! Underline, strikeout, and highlight are rarely encoded as text
//! attributes; they are painted as lines. A thin dark line hugging a run's
//! baseline reads as an underline, one crossing its middle as a strikeout,
//! and a stroke wider than the text itself as a highlight bar.

use crate::model::{FormattedRun, PageLines, RunStyle, TextPlacement};

/// Build the formatted run for a placement, folding in whatever the page's
/// horizontal lines imply about underline/strikeout/highlight.
pub fn infer_run(item: &TextPlacement, page_lines: &PageLines) -> FormattedRun {
    let mut run = FormattedRun {
        text: item.text.clone(),
        style: RunStyle {
            bold: item.attrs.bold,
            italic: item.attrs.italic,
            underline: item.attrs.underline,
            strikeout: item.attrs.strikeout,
        },
        ..Default::default()
    };

    let gbox = &item.global_box;
    let text_height = gbox.height();

    // shrink the probe horizontally so adjacent cell borders are not
    // counted; zero-width runs instead get the probe widened to the right
    let left_edge = gbox.x0 + text_height / 10.0;
    let right_edge = if gbox.width() > text_height / 10.0 {
        gbox.x1 - text_height / 10.0
    } else {
        gbox.x1 + text_height / 3.0
    };

    for line in &page_lines.horizontal {
        if line.color.is_white() {
            continue;
        }

        let at_text_height = line.point_one.y >= gbox.y0 && line.point_one.y <= gbox.y1;
        let spans_text = line.point_one.x <= left_edge && line.point_two.x >= right_edge;
        let is_wide =
            line.effective_width.x > text_height && line.effective_width.y > text_height;
        let is_thin = line.effective_width.x < text_height / 4.0
            && line.effective_width.y < text_height / 4.0;
        let at_text_bottom = line.point_one.y - gbox.y0 < text_height / 4.0;
        let under_text = line.point_one.y < gbox.y0
            && line.point_one.y > gbox.y0 - text_height / 5.0;

        if is_wide && at_text_height && spans_text {
            run.background = line.color;
        } else if is_thin && (at_text_height || under_text) && spans_text {
            if at_text_bottom || under_text {
                run.style.underline = true;
            } else {
                run.style.strikeout = true;
            }
        }
    }

    run
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{ColorRgb, Matrix, Rect, Vec2};
    use crate::model::{LinePlacement, TextAttributes};

    fn placement(global_box: Rect) -> TextPlacement {
        TextPlacement {
            text: "sample".into(),
            matrix: Matrix::identity(),
            local_box: global_box,
            global_box,
            space_width: 2.0,
            global_space_width: Vec2::new(2.0, 0.0),
            attrs: TextAttributes::default(),
        }
    }

    fn black_line(y: f64, x0: f64, x1: f64, width: f64) -> LinePlacement {
        LinePlacement {
            vertical: false,
            point_one: Vec2::new(x0, y),
            point_two: Vec2::new(x1, y),
            effective_width: Vec2::new(width, width),
            color: ColorRgb::new(0.0, 0.0, 0.0),
        }
    }

    #[test]
    fn test_underline_below_text() {
        let item = placement(Rect::new(10.0, 5.0, 90.0, 15.0));
        let mut lines = PageLines::new();
        lines.horizontal.push(black_line(4.0, 0.0, 95.0, 1.0));

        let run = infer_run(&item, &lines);
        assert!(run.style.underline);
        assert!(!run.style.strikeout);
    }

    #[test]
    fn test_underline_at_baseline() {
        let item = placement(Rect::new(10.0, 5.0, 90.0, 15.0));
        let mut lines = PageLines::new();
        // inside the box but within the bottom quarter
        lines.horizontal.push(black_line(6.0, 0.0, 95.0, 1.0));

        let run = infer_run(&item, &lines);
        assert!(run.style.underline);
    }

    #[test]
    fn test_strikeout_through_middle() {
        let item = placement(Rect::new(10.0, 5.0, 90.0, 15.0));
        let mut lines = PageLines::new();
        lines.horizontal.push(black_line(10.0, 0.0, 95.0, 1.0));

        let run = infer_run(&item, &lines);
        assert!(run.style.strikeout);
        assert!(!run.style.underline);
    }

    #[test]
    fn test_highlight_from_wide_stroke() {
        let item = placement(Rect::new(10.0, 5.0, 90.0, 15.0));
        let mut lines = PageLines::new();
        let mut bar = black_line(10.0, 0.0, 95.0, 12.0);
        bar.color = ColorRgb::new(1.0, 1.0, 0.0);
        lines.horizontal.push(bar);

        let run = infer_run(&item, &lines);
        assert_eq!(run.background, ColorRgb::new(1.0, 1.0, 0.0));
        assert!(run.style.is_plain());
    }

    #[test]
    fn test_white_line_ignored() {
        let item = placement(Rect::new(10.0, 5.0, 90.0, 15.0));
        let mut lines = PageLines::new();
        let mut line = black_line(6.0, 0.0, 95.0, 1.0);
        line.color = ColorRgb::white();
        lines.horizontal.push(line);

        let run = infer_run(&item, &lines);
        assert!(run.style.is_plain());
    }

    #[test]
    fn test_short_line_does_not_span() {
        let item = placement(Rect::new(10.0, 5.0, 90.0, 15.0));
        let mut lines = PageLines::new();
        lines.horizontal.push(black_line(6.0, 30.0, 60.0, 1.0));

        let run = infer_run(&item, &lines);
        assert!(run.style.is_plain());
    }

    #[test]
    fn test_zero_width_run_fixup() {
        // zero-width glyph boxes still pick up an underline when the line
        // passes just beyond their right edge
        let item = placement(Rect::new(40.0, 5.0, 40.0, 15.0));
        let mut lines = PageLines::new();
        lines.horizontal.push(black_line(6.0, 30.0, 50.0, 1.0));

        let run = infer_run(&item, &lines);
        assert!(run.style.underline);
    }
}
