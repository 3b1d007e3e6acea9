use std::path::PathBuf;

use thiserror::Error;

use crate::core::media::MediaKind;

/// Crate-level failures that abort an operation outright.
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to render preview: {0}")]
    Render(#[from] quick_xml::Error),

    #[error("document viewer failed: {0}")]
    Viewer(#[source] anyhow::Error),
}

/// A single file of a batch that could not be turned into a preview.
///
/// Never aborts the batch: the dispatcher folds it into the error slot.
#[derive(Debug, Error)]
#[error("{kind:?} file {file_name:?}: {source}")]
pub struct FileFailure {
    pub file_name: String,
    pub kind: MediaKind,
    #[source]
    pub source: anyhow::Error,
}

impl FileFailure {
    pub fn new(file_name: impl Into<String>, kind: MediaKind, source: anyhow::Error) -> Self {
        Self {
            file_name: file_name.into(),
            kind,
            source,
        }
    }

    /// The fixed, user-facing message for this failure kind.
    pub fn user_message(&self) -> &'static str {
        self.kind.failure_message()
    }
}

pub type Result<T> = std::result::Result<T, PreviewError>;
