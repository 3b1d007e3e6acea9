use anyhow::{anyhow, Context};
use futures::future::join_all;
use log::{debug, info, warn};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::PreviewConfig;
use crate::core::locator::LocatorRegistry;
use crate::core::media::MediaKind;
use crate::core::parser::{DocxExtractor, TextExtractor};
use crate::core::sheet::{CalamineDecoder, SheetDecoder};
use crate::core::state::{DocumentEntry, FileError, FileOutcome};
use crate::error::FileFailure;
use crate::SelectedFile;

/// Routes every file of a batch to its handling path by declared media type.
pub struct Dispatcher {
    extractor: Arc<dyn TextExtractor>,
    decoder: Arc<dyn SheetDecoder>,
    registry: Arc<LocatorRegistry>,
    config: PreviewConfig,
}

impl Dispatcher {
    pub fn new(registry: Arc<LocatorRegistry>, config: PreviewConfig) -> Self {
        Self {
            extractor: Arc::new(DocxExtractor),
            decoder: Arc::new(CalamineDecoder),
            registry,
            config,
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_decoder(mut self, decoder: Arc<dyn SheetDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    /// Resolve the whole batch. Files run concurrently; outcomes come back in
    /// selection order, one per file.
    pub async fn dispatch(&self, batch: Uuid, files: &[SelectedFile]) -> Vec<FileOutcome> {
        info!("Dispatching batch {} with {} files", batch, files.len());

        let outcomes = join_all(files.iter().map(|file| self.handle(batch, file))).await;

        outcomes
            .into_iter()
            .map(|result| match result {
                Ok(outcome) => outcome,
                Err(failure) => {
                    warn!("{}", failure);
                    FileOutcome::Failed(FileError {
                        file_name: failure.file_name.clone(),
                        message: failure.user_message().to_string(),
                    })
                }
            })
            .collect()
    }

    async fn handle(&self, batch: Uuid, file: &SelectedFile) -> Result<FileOutcome, FileFailure> {
        let kind = MediaKind::classify(&file.media_type);
        debug!("{} ({:?}) -> {:?}", file.name, file.media_type, kind);

        self.route(batch, file, kind)
            .await
            .map_err(|source| FileFailure::new(file.name.clone(), kind, source))
    }

    async fn route(
        &self,
        batch: Uuid,
        file: &SelectedFile,
        kind: MediaKind,
    ) -> anyhow::Result<FileOutcome> {
        let bytes = file
            .read_bytes(self.config.mmap_threshold_bytes)
            .await
            .context("failed to read file")?;

        match kind {
            MediaKind::PlainText => Ok(FileOutcome::Text(decode_text(&bytes))),
            MediaKind::WordDocument => {
                let extractor = Arc::clone(&self.extractor);
                let text = tokio::task::spawn_blocking(move || extractor.extract_raw_text(&bytes))
                    .await
                    .map_err(|e| anyhow!("extraction task failed: {}", e))??;
                Ok(FileOutcome::Text(text))
            }
            MediaKind::Spreadsheet => {
                let decoder = Arc::clone(&self.decoder);
                let workbook = tokio::task::spawn_blocking(move || decoder.decode(&bytes))
                    .await
                    .map_err(|e| anyhow!("decode task failed: {}", e))??;
                let sheet = workbook
                    .first_sheet()
                    .ok_or_else(|| anyhow!("workbook has no sheets"))?;
                debug!("Using sheet {:?} of {:?}", sheet.name, workbook.sheet_names());
                Ok(FileOutcome::Table(sheet.to_rows()))
            }
            MediaKind::Other => {
                let locator = self.registry.create(batch, &file.media_type, bytes);
                Ok(FileOutcome::Document(DocumentEntry {
                    locator,
                    media_type: file.media_type.clone(),
                    name: file.name.clone(),
                }))
            }
        }
    }
}

/// Full text content, lossy UTF-8 with a leading byte-order mark dropped.
fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}
