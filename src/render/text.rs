//! Plain-text output assembly.

use unicode_normalization::UnicodeNormalization;

/// Join per-page composed text into the final output.
///
/// Page texts are newline-terminated by the composer, so pages concatenate
/// directly. The result is NFC-normalized; interpreters frequently emit
/// decomposed accents that downstream consumers do not expect.
pub fn join_pages<S: AsRef<str>>(page_texts: &[S]) -> String {
    let mut out = String::new();
    for page in page_texts {
        out.push_str(page.as_ref());
    }
    out.nfc().collect()
}
