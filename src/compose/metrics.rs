//! Page-level metrics derived from sorted placements and painted lines.
//!
//! Margins are measured while absorbing scene/clause numbering tokens so a
//! leading "12." or a trailing scene number does not bias the text body
//! bounds. Header/footer positions come from long thin separator lines near
//! the page edges, and the modal glyph size separates body text from
//! decorations.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use super::orientation::are_same_line;
use crate::geom::Rect;
use crate::model::{LinePlacement, PageLines, TextPlacement};

/// Fraction of the page height above which text sits in the header band.
pub(crate) const TOP_BAND: f64 = 9.0 / 10.0;
/// Fraction of the page height below which text sits in the footer band.
pub(crate) const BOTTOM_BAND: f64 = 1.0 / 10.0;
/// Default left-margin seed, as a fraction of the page width.
const LEFT_PART: f64 = 1.0 / 5.0;
/// Fraction of the page width past which a line counts as right-side.
pub(crate) const RIGHT_PART: f64 = 4.0 / 5.0;

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\s*$").unwrap())
}

fn number_and_dot_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\s*$").unwrap())
}

/// Whether the text is a bare integer, optionally followed by whitespace.
pub fn is_number(text: &str) -> bool {
    number_re().is_match(text)
}

/// Whether the text is an integer followed by a single dot, optionally
/// followed by whitespace.
pub fn is_number_and_dot(text: &str) -> bool {
    number_and_dot_re().is_match(text)
}

/// Whether the text is exactly a dot or a colon.
pub fn is_dot_or_colon(text: &str) -> bool {
    text == "." || text == ":"
}

/// Derived, page-scoped layout parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PageMetrics {
    /// Page media box
    pub media_box: Rect,

    /// Smallest observed line-start x, numbering absorbed
    pub min_left_margin: f64,

    /// Largest observed line-end x, measured from page left
    pub min_right_margin: f64,

    /// Bottom edge of the header band (page top if no separator qualifies)
    pub header_line_position: f64,

    /// Top edge of the footer band (0 if no separator qualifies)
    pub footer_line_position: f64,

    /// Modal glyph height on the page
    pub general_text_size: f64,
}

impl PageMetrics {
    /// Compute metrics for one page. `sorted_texts` must already be in
    /// reading order.
    pub fn compute(sorted_texts: &[TextPlacement], media_box: Rect, lines: &PageLines) -> Self {
        let metrics = Self {
            media_box,
            min_left_margin: min_left_margin(sorted_texts, &media_box),
            min_right_margin: min_right_margin(sorted_texts),
            header_line_position: header_line_position(&media_box, lines),
            footer_line_position: footer_line_position(&media_box, lines),
            general_text_size: general_text_size(sorted_texts),
        };
        log::debug!(
            "page metrics: left={:.2} right={:.2} header={:.2} footer={:.2} text_size={:.2}",
            metrics.min_left_margin,
            metrics.min_right_margin,
            metrics.header_line_position,
            metrics.footer_line_position,
            metrics.general_text_size
        );
        metrics
    }

    /// Whether the placement starts past the measured right text border.
    pub fn is_beyond_right_border(&self, item: &TextPlacement) -> bool {
        item.global_box.x1 > self.min_right_margin
    }

    /// Whether the placement sits in the header/footer band, or is
    /// smaller-than-body text hugging the outer 10% of the page.
    pub fn is_header_or_footer_text(&self, item: &TextPlacement) -> bool {
        let beyond_bands = item.global_box.y0 > self.header_line_position
            || item.global_box.y1 < self.footer_line_position;

        let small_text_on_edge = item.global_box.height() < self.general_text_size
            && (item.global_box.y0 > self.media_box.y1 * TOP_BAND
                || item.global_box.y1 < self.media_box.y1 * BOTTOM_BAND);

        beyond_bands || small_text_on_edge
    }

    /// Whether the placement participates in document composition.
    ///
    /// Scene numbers past the right border, header/footer text, rotated
    /// runs, and translucent (watermark) runs are all excluded.
    pub fn is_body_text(&self, item: &TextPlacement) -> bool {
        !self.is_beyond_right_border(item)
            && !self.is_header_or_footer_text(item)
            && !item.matrix.is_rotated()
            && !is_watermark(item)
    }
}

/// Translucent, non-blank text reads as a watermark.
fn is_watermark(item: &TextPlacement) -> bool {
    !item.is_blank() && item.attrs.is_translucent()
}

/// Smallest line-start x across the page, skipping blank runs and absorbing
/// leading "number" / "number + dot or colon" tokens.
fn min_left_margin(sorted_texts: &[TextPlacement], media_box: &Rect) -> f64 {
    // seed with the widest allowed margin, for pages holding only
    // centered text
    let mut min_left = media_box.x1 * LEFT_PART;

    let mut iter = sorted_texts.iter();
    let Some(first) = iter.next() else {
        return min_left;
    };

    let mut line_start = first.global_box.x0;
    let mut starts_with_number = is_number(&first.text);
    let mut subtract_number = is_number_and_dot(&first.text);
    let mut latest = first;

    for item in iter {
        if item.is_blank() {
            continue;
        }

        if are_same_line(latest, item) {
            // a leading "12." pair: restart the line at the token after it
            if subtract_number {
                line_start = item.global_box.x0;
                subtract_number = false;
                starts_with_number = false;
            }

            if starts_with_number {
                if is_dot_or_colon(&item.text) {
                    subtract_number = true;
                } else if !is_number(&item.text) {
                    starts_with_number = false;
                }
            }
        } else {
            if line_start < min_left || min_left < 0.0 {
                min_left = line_start;
            }
            line_start = item.global_box.x0;
            starts_with_number = is_number(&item.text);
            subtract_number = is_number_and_dot(&item.text);
        }
        latest = item;
    }

    if line_start < min_left || min_left < 0.0 {
        min_left = line_start;
    }

    min_left
}

/// Largest line-end x across the page (measured from page left), skipping
/// blank runs and absorbing trailing "dot/colon + number" tokens.
fn min_right_margin(sorted_texts: &[TextPlacement]) -> f64 {
    let mut min_right = -1.0f64;

    let mut iter = sorted_texts.iter().rev();
    let Some(first) = iter.next() else {
        return min_right;
    };

    let mut line_end = first.global_box.x1;
    let mut ends_with_dot = is_dot_or_colon(&first.text);
    let mut ends_with_number_and_dot = is_number_and_dot(&first.text);
    let mut latest = first;

    for item in iter {
        if item.is_blank() {
            continue;
        }

        if are_same_line(latest, item) {
            if ends_with_number_and_dot && !is_number(&item.text) {
                line_end = item.global_box.x1;
                ends_with_dot = false;
                ends_with_number_and_dot = false;
            }

            if ends_with_dot {
                if is_number(&item.text) {
                    ends_with_number_and_dot = true;
                } else {
                    ends_with_dot = false;
                }
            }
        } else {
            if line_end > min_right || min_right < 0.0 {
                min_right = line_end;
            }
            line_end = item.global_box.x1;
            ends_with_dot = is_dot_or_colon(&item.text);
            ends_with_number_and_dot = is_number_and_dot(&item.text);
        }
        latest = item;
    }

    if line_end > min_right || min_right < 0.0 {
        min_right = line_end;
    }

    min_right
}

/// Whether a painted segment looks like a header/footer separator: long,
/// thin, horizontal, with an isotropic stroke.
fn is_separator_line(media_box: &Rect, line: &LinePlacement) -> bool {
    let line_length = (line.point_two.x - line.point_one.x).abs();
    !line.vertical
        && line_length > media_box.width() * 3.0 / 4.0
        && line.effective_width.x == line.effective_width.y
        && line.effective_width.x < media_box.height() / 100.0
}

/// Lowest qualifying separator in the top 10% band; page top if none.
fn header_line_position(media_box: &Rect, lines: &PageLines) -> f64 {
    let mut header = media_box.y1;
    for line in &lines.horizontal {
        if is_separator_line(media_box, line)
            && line.point_one.y > media_box.y1 * TOP_BAND
            && line.point_one.y < header
        {
            header = line.point_one.y;
        }
    }
    header
}

/// Highest qualifying separator in the bottom 10% band; 0 if none.
fn footer_line_position(media_box: &Rect, lines: &PageLines) -> f64 {
    let mut footer = 0.0;
    for line in &lines.horizontal {
        if is_separator_line(media_box, line)
            && line.point_one.y < media_box.y1 * BOTTOM_BAND
            && line.point_one.y > footer
        {
            footer = line.point_one.y;
        }
    }
    footer
}

/// Modal glyph height: heights bucketed to 2 decimals, weighted by summed
/// glyph widths. Falls back to member count when every accumulated width is
/// zero (pages where each run is a single zero-width glyph).
fn general_text_size(texts: &[TextPlacement]) -> f64 {
    #[derive(Default)]
    struct Bucket {
        length: f64,
        count: u32,
    }

    let mut buckets: BTreeMap<i64, Bucket> = BTreeMap::new();
    for item in texts {
        if item.is_blank() || item.matrix.is_rotated() || is_watermark(item) {
            continue;
        }
        let key = (item.global_box.height() * 100.0).trunc() as i64;
        let bucket = buckets.entry(key).or_default();
        bucket.length += item.global_box.width();
        bucket.count += 1;
    }

    if buckets.is_empty() {
        return 0.0;
    }

    let all_zero_width = buckets.values().all(|b| b.length == 0.0);
    let best = if all_zero_width {
        buckets.iter().max_by_key(|(_, b)| b.count)
    } else {
        buckets
            .iter()
            .max_by(|(_, x), (_, y)| x.length.total_cmp(&y.length))
    };

    best.map(|(key, _)| *key as f64 / 100.0).unwrap_or(0.0)
}
