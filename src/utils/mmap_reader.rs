use log::debug;
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Memory-mapped view of a selected file on disk.
pub struct MmapFileReader {
    _file: File,
    mmap: Mmap,
}

impl MmapFileReader {
    pub fn new<P: AsRef<Path>>(file_path: P) -> std::io::Result<Self> {
        let file = File::open(file_path.as_ref())?;
        // The mapping is only read while `_file` is held open; selected files are not
        // expected to be truncated underneath a preview.
        let mmap = unsafe { Mmap::map(&file)? };

        Ok(MmapFileReader { _file: file, mmap })
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.mmap
    }

    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }
}

/// Read the whole file, mapping it when it is at least `mmap_threshold` bytes long.
///
/// Runs on the blocking pool; small files go through `tokio::fs`.
pub async fn read_all<P: AsRef<Path>>(path: P, mmap_threshold: u64) -> std::io::Result<Arc<[u8]>> {
    let path = path.as_ref().to_path_buf();
    let file_size = tokio::fs::metadata(&path).await?.len();

    if file_size >= mmap_threshold {
        debug!("Mapping {} ({} bytes)", path.display(), file_size);
        tokio::task::spawn_blocking(move || {
            let reader = MmapFileReader::new(&path)?;
            Ok::<_, std::io::Error>(Arc::<[u8]>::from(reader.as_slice()))
        })
        .await
        .map_err(std::io::Error::other)?
    } else {
        Ok(Arc::from(tokio::fs::read(&path).await?))
    }
}
