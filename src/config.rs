use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PreviewError, Result};

/// Files at least this large are memory-mapped instead of read through tokio.
pub const DEFAULT_MMAP_THRESHOLD: u64 = 10 * 1024 * 1024;
pub const DEFAULT_MAX_INLINE_BYTES: u64 = 20 * 1024 * 1024;
pub const DEFAULT_PAGE_TITLE: &str = "Upload and View Files";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub mmap_threshold_bytes: u64,
    /// Embed viewer documents as `data:` URIs instead of referencing their locators.
    pub inline_documents: bool,
    pub max_inline_bytes: u64,
    pub page_title: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            mmap_threshold_bytes: DEFAULT_MMAP_THRESHOLD,
            inline_documents: true,
            max_inline_bytes: DEFAULT_MAX_INLINE_BYTES,
            page_title: DEFAULT_PAGE_TITLE.to_string(),
        }
    }
}

impl PreviewConfig {
    /// Load a TOML config file; missing keys fall back to defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| PreviewError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&raw).map_err(|source| PreviewError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
