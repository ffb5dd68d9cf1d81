//! Orientation classification, same-line grouping, and reading order.
//!
//! Orientation is a coarse 4-way bucket taken from the sign pattern of a
//! placement's linear transform, not a true rotation decomposition. It is
//! stable for the placement's whole lifetime, so every predicate here is a
//! pure function over placement pairs.

use std::cmp::Ordering;

use crate::geom::Matrix;
use crate::model::TextPlacement;

/// Tolerance, in page units, for grouping placements onto one visual line.
pub const LINE_TOLERANCE: f64 = 5.0;

/// Coarse reading-direction bucket of a transform's linear part.
///
/// - `0`: upright (`a > 0` and `d > 0`)
/// - `1`: rotated 90° one way (`b > 0` and `c < 0`)
/// - `2`: upside-down (`a < 0` and `d < 0`)
/// - `3`: rotated the other way, or skewed (catch-all)
pub fn orientation_code(matrix: &Matrix) -> u8 {
    if matrix.a > 0.0 && matrix.d > 0.0 {
        0
    } else if matrix.b > 0.0 && matrix.c < 0.0 {
        1
    } else if matrix.a < 0.0 && matrix.d < 0.0 {
        2
    } else {
        3
    }
}

/// Whether two placements visually sit on the same line.
///
/// Placements with different orientation codes never share a line. For
/// horizontal reading (codes 0/2) both the bottom and top edges must agree
/// within [`LINE_TOLERANCE`]; for vertical reading (codes 1/3) the left edge
/// must.
pub fn are_same_line(a: &TextPlacement, b: &TextPlacement) -> bool {
    let code_a = orientation_code(&a.matrix);
    let code_b = orientation_code(&b.matrix);
    if code_a != code_b {
        return false;
    }

    if code_a == 0 || code_a == 2 {
        (a.global_box.y0 - b.global_box.y0).abs() <= LINE_TOLERANCE
            && (a.global_box.y1 - b.global_box.y1).abs() <= LINE_TOLERANCE
    } else {
        (a.global_box.x0 - b.global_box.x0).abs() <= LINE_TOLERANCE
    }
}

/// Total reading-order comparison. Lower orientation codes sort first;
/// within a code, the primary key uses the [`LINE_TOLERANCE`] tie window
/// before falling to the secondary key.
pub fn reading_order(a: &TextPlacement, b: &TextPlacement) -> Ordering {
    let code_a = orientation_code(&a.matrix);
    let code_b = orientation_code(&b.matrix);
    if code_a != code_b {
        return code_a.cmp(&code_b);
    }

    let (abox, bbox) = (&a.global_box, &b.global_box);
    match code_a {
        // top-to-bottom, then left-to-right
        0 => {
            if (abox.y0 - bbox.y0).abs() > LINE_TOLERANCE {
                bbox.y0.total_cmp(&abox.y0)
            } else {
                abox.x0.total_cmp(&bbox.x0)
            }
        }
        // left-to-right columns, top of column first
        1 => {
            if (abox.x0 - bbox.x0).abs() > LINE_TOLERANCE {
                abox.x0.total_cmp(&bbox.x0)
            } else {
                abox.y0.total_cmp(&bbox.y0)
            }
        }
        // upside-down: bottom-to-top, then right-to-left
        2 => {
            if (abox.y0 - bbox.y0).abs() > LINE_TOLERANCE {
                abox.y0.total_cmp(&bbox.y0)
            } else {
                bbox.x0.total_cmp(&abox.x0)
            }
        }
        // right-to-left columns
        _ => {
            if (abox.x0 - bbox.x0).abs() > LINE_TOLERANCE {
                bbox.x0.total_cmp(&abox.x0)
            } else {
                bbox.y0.total_cmp(&abox.y0)
            }
        }
    }
}

/// Estimate how many space glyphs fit in the gap between two placements on
/// the same line.
///
/// Returns 0 when the boxes overlap. When the left placement reports no
/// space-glyph width, the average glyph width of its text stands in; if that
/// is also zero the estimate stays 0 to avoid dividing by zero.
pub fn horizontal_spacing(left: &TextPlacement, right: &TextPlacement) -> usize {
    let left_edge = left.global_box.x1;
    let right_edge = right.global_box.x0;

    if left_edge > right_edge {
        return 0; // left text overflows into the right one
    }

    let distance = right_edge - left_edge;
    let mut space_width = left.global_space_width.x;

    if space_width == 0.0 && left.global_box.width() > 0.0 {
        let glyph_count = left.text.chars().count();
        if glyph_count > 0 {
            space_width = left.global_box.width() / glyph_count as f64;
        }
    }

    if space_width == 0.0 {
        return 0;
    }

    (distance / space_width).floor() as usize
}
