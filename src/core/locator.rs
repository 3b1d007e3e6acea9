//! Transient resource locators for files handed to the generic viewer.
//!
//! Every locator is owned by the batch that created it. Releasing a batch drops
//! its bytes, so superseded selections do not keep their files alive.

use dashmap::DashMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

const SCHEME_PREFIX: &str = "blob:file-preview/";

/// Opaque handle addressing the raw bytes of one selected file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    fn generate() -> Self {
        Locator(format!("{}{}", SCHEME_PREFIX, Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Resource {
    pub batch: Uuid,
    pub media_type: String,
    pub bytes: Arc<[u8]>,
}

/// Owning registry of locators, keyed by locator and tagged by batch id.
#[derive(Debug, Default)]
pub struct LocatorRegistry {
    entries: DashMap<Locator, Resource>,
}

impl LocatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a locator for `bytes` on behalf of `batch`.
    pub fn create(&self, batch: Uuid, media_type: &str, bytes: Arc<[u8]>) -> Locator {
        let locator = Locator::generate();
        self.entries.insert(
            locator.clone(),
            Resource {
                batch,
                media_type: media_type.to_string(),
                bytes,
            },
        );
        locator
    }

    pub fn resolve(&self, locator: &Locator) -> Option<Resource> {
        self.entries.get(locator).map(|entry| entry.value().clone())
    }

    /// Release every locator owned by `batch`; returns how many were dropped.
    pub fn release_batch(&self, batch: Uuid) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, resource| resource.batch != batch);
        let released = before.saturating_sub(self.entries.len());
        if released > 0 {
            debug!("Released {} locators of batch {}", released, batch);
        }
        released
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
