//! Placement-dump input.
//!
//! The composers consume interpreter output, not the container format
//! itself. A dump is a JSON document with one entry per page, carrying the
//! media box, the glyph-run placements in emission order, and the painted
//! segments.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::PageContent;

/// On-disk form of interpreter output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementDump {
    /// Pages in document order
    pub pages: Vec<PageContent>,
}

/// Load and validate a placement dump from a file.
pub fn from_path(path: impl AsRef<Path>) -> Result<Vec<PageContent>> {
    let path = path.as_ref();
    let data = fs::read_to_string(path).map_err(|source| Error::FileNotReadable {
        path: path.to_owned(),
        source,
    })?;
    from_str(&data)
}

/// Parse and validate a placement dump from JSON text.
pub fn from_str(data: &str) -> Result<Vec<PageContent>> {
    let dump: PlacementDump = serde_json::from_str(data)?;
    validate(dump.pages)
}

/// Reject pages whose media box cannot host placements.
fn validate(pages: Vec<PageContent>) -> Result<Vec<PageContent>> {
    for (index, page) in pages.iter().enumerate() {
        if page.width() <= 0.0 || page.height() <= 0.0 {
            return Err(Error::PageExtraction {
                page: index,
                reason: format!(
                    "media box {:.2}x{:.2} is empty or inverted",
                    page.width(),
                    page.height()
                ),
            });
        }
    }
    log::debug!("loaded placement dump with {} page(s)", pages.len());
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"{
        "pages": [{
            "media_box": { "x0": 0.0, "y0": 0.0, "x1": 612.0, "y1": 792.0 }
        }]
    }"#;

    #[test]
    fn test_minimal_dump() {
        let pages = from_str(MINIMAL).unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_empty());
    }

    #[test]
    fn test_malformed_json_is_parse_failure() {
        let err = from_str("{ not json").unwrap_err();
        assert!(matches!(err, Error::ParseFailure(_)));
    }

    #[test]
    fn test_inverted_media_box_is_page_error() {
        let data = r#"{
            "pages": [
                { "media_box": { "x0": 0.0, "y0": 0.0, "x1": 612.0, "y1": 792.0 } },
                { "media_box": { "x0": 612.0, "y0": 0.0, "x1": 0.0, "y1": 792.0 } }
            ]
        }"#;
        let err = from_str(data).unwrap_err();
        match err {
            Error::PageExtraction { page, .. } => assert_eq!(page, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_file_is_not_readable() {
        let err = from_path("/nonexistent/dump.json").unwrap_err();
        assert!(matches!(err, Error::FileNotReadable { .. }));
    }

    #[test]
    fn test_from_path_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();
        let pages = from_path(file.path()).unwrap();
        assert_eq!(pages.len(), 1);
    }
}
