pub mod core {
    pub mod dispatcher;
    pub mod locator;
    pub mod media;
    pub mod parser;
    pub mod render;
    pub mod session;
    pub mod sheet;
    pub mod state;
}

pub mod utils {
    pub mod mmap_reader;
}

pub mod config;
pub mod error;

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use crate::config::PreviewConfig;
pub use crate::core::session::PreviewSession;
pub use crate::core::state::ViewState;
pub use crate::error::{PreviewError, Result};

/// Where the bytes of a selected file live.
#[derive(Debug, Clone)]
pub enum FileSource {
    Memory(Arc<[u8]>),
    Disk(PathBuf),
}

/// One file handle from a selection event.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    /// Declared media type; the sole dispatch key. Empty when unknown.
    pub media_type: String,
    pub source: FileSource,
}

/// Ordered files of one selection event.
pub type SelectedFileSet = Vec<SelectedFile>;

impl SelectedFile {
    pub fn from_bytes(
        name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            source: FileSource::Memory(bytes.into()),
        }
    }

    /// A file on disk, with its media type guessed from the extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            name,
            media_type: crate::core::media::guess_media_type(path),
            source: FileSource::Disk(path.to_path_buf()),
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = media_type.into();
        self
    }

    pub async fn read_bytes(&self, mmap_threshold: u64) -> std::io::Result<Arc<[u8]>> {
        match &self.source {
            FileSource::Memory(bytes) => Ok(Arc::clone(bytes)),
            FileSource::Disk(path) => utils::mmap_reader::read_all(path, mmap_threshold).await,
        }
    }
}
