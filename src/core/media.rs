use serde::{Deserialize, Serialize};
use std::path::Path;

pub const TEXT_PLAIN: &str = "text/plain";
pub const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// The four handling paths a selected file can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    PlainText,
    WordDocument,
    Spreadsheet,
    Other,
}

impl MediaKind {
    /// Classify a declared media type. Case and `;` parameters are ignored.
    pub fn classify(media_type: &str) -> Self {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim();

        if essence.eq_ignore_ascii_case(TEXT_PLAIN) {
            MediaKind::PlainText
        } else if essence.eq_ignore_ascii_case(DOCX) {
            MediaKind::WordDocument
        } else if essence.eq_ignore_ascii_case(XLSX) {
            MediaKind::Spreadsheet
        } else {
            MediaKind::Other
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            MediaKind::PlainText => "Failed to load text file.",
            MediaKind::WordDocument => "Failed to load DOCX file.",
            MediaKind::Spreadsheet => "Failed to load XLSX file.",
            MediaKind::Other => "Failed to prepare file for viewing.",
        }
    }
}

/// Media type a browser would report for `path`, or `""` when unknown.
pub fn guess_media_type<P: AsRef<Path>>(path: P) -> String {
    mime_guess::from_path(path.as_ref())
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_default()
}
