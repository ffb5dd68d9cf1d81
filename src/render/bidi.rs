//! Visual-to-logical bidi reordering for composed lines.
//!
//! Interpreters hand glyph runs over in visual order (the order they are
//! painted), so right-to-left text arrives reversed. The Unicode bidi
//! algorithm maps logical text to visual order; running it on the visual
//! line and inverting the resulting permutation recovers the logical order.

use unicode_bidi::{BidiInfo, Level};

use crate::options::BidiMode;

/// Reorder one visually-ordered line into logical order.
///
/// `BidiMode::Off` returns the line unchanged. The reordering is a
/// character-level permutation, so the output always holds exactly the
/// input's characters.
pub fn visual_to_logical(line: &str, mode: BidiMode) -> String {
    let base_level = match mode {
        BidiMode::Off => return line.to_owned(),
        BidiMode::LeftToRight => Level::ltr(),
        BidiMode::RightToLeft => Level::rtl(),
    };

    if line.is_empty() {
        return String::new();
    }

    let info = BidiInfo::new(line, Some(base_level));
    let para = match info.paragraphs.first() {
        Some(para) => para,
        None => return line.to_owned(),
    };

    let levels = info.reordered_levels_per_char(para, para.range.clone());
    let visual_map = BidiInfo::reorder_visual(&levels);

    let chars: Vec<char> = line.chars().collect();
    if visual_map.len() != chars.len() {
        // embedded paragraph separator; leave the line alone
        return line.to_owned();
    }

    // visual_map sends logical positions to visual ones for logical input;
    // our input is visual, so invert it
    let mut logical = vec!['\u{0}'; chars.len()];
    for (visual_idx, &logical_idx) in visual_map.iter().enumerate() {
        logical[logical_idx] = chars[visual_idx];
    }
    logical.into_iter().collect()
}

/// Whether the line carries explicit directional controls.
///
/// Embeddings and isolates encode an author intent the permutation trick
/// cannot honor reliably, so their presence is surfaced as a warning.
pub fn has_directional_controls(line: &str) -> bool {
    line.chars().any(|c| {
        matches!(c,
            '\u{200E}' | '\u{200F}' | '\u{061C}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2066}'..='\u{2069}')
    })
}
