use crate::models::CandidateFile;
use anyhow::{Context, Result, anyhow};
use bytes::Bytes;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use uuid::Uuid;

/// Trait for preview handle backends. A handle is a locally resolvable URL
/// pointing at the bytes of one staged file.
pub trait PreviewStore: Send + Sync {
    /// Create a preview for the file and return its URL
    fn create(&self, file: &CandidateFile) -> Result<String>;

    /// Release a previously created preview. Unknown URLs are ignored.
    fn release(&self, url: &str);

    /// Number of previews created and not yet released
    fn live_count(&self) -> usize;
}

/// Owning wrapper around a preview URL. The preview is released exactly once,
/// when the handle is dropped.
pub struct PreviewHandle {
    store: Arc<dyn PreviewStore>,
    url: String,
}

impl PreviewHandle {
    pub fn acquire(store: &Arc<dyn PreviewStore>, file: &CandidateFile) -> Result<Self> {
        let url = store.create(file)?;
        Ok(Self {
            store: Arc::clone(store),
            url,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        tracing::trace!("Releasing preview {}", self.url);
        self.store.release(&self.url);
    }
}

impl std::fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewHandle").field("url", &self.url).finish()
    }
}

/// In-memory store handing out `blob:` URLs
#[derive(Debug, Default)]
pub struct MemoryPreviewStore {
    blobs: DashMap<String, Bytes>,
    created: AtomicUsize,
    released: AtomicUsize,
}

impl MemoryPreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes behind a live URL
    pub fn resolve(&self, url: &str) -> Option<Bytes> {
        self.blobs.get(url).map(|entry| entry.value().clone())
    }

    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn released_count(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

impl PreviewStore for MemoryPreviewStore {
    fn create(&self, file: &CandidateFile) -> Result<String> {
        let url = format!("blob:intake/{}", Uuid::new_v4());
        self.blobs.insert(url.clone(), file.bytes.clone());
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(url)
    }

    fn release(&self, url: &str) {
        if self.blobs.remove(url).is_some() {
            self.released.fetch_add(1, Ordering::SeqCst);
        } else {
            tracing::warn!("Release of unknown preview {}", url);
        }
    }

    fn live_count(&self) -> usize {
        self.blobs.len()
    }
}

/// Disk-backed store: one file per preview inside a private temp directory,
/// handed out as `file://` URLs. Removed files are deleted on release and the
/// directory goes away with the store.
#[derive(Debug)]
pub struct DiskPreviewStore {
    dir: TempDir,
    files: DashMap<String, PathBuf>,
}

impl DiskPreviewStore {
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("intake-previews-")
            .tempdir()?;
        Ok(Self {
            dir,
            files: DashMap::new(),
        })
    }

    pub fn in_dir(parent: impl AsRef<Path>) -> std::io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("intake-previews-")
            .tempdir_in(parent)?;
        Ok(Self {
            dir,
            files: DashMap::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Local path behind a live URL
    pub fn resolve(&self, url: &str) -> Option<PathBuf> {
        self.files.get(url).map(|entry| entry.value().clone())
    }
}

fn extension_for(declared_type: &str) -> &'static str {
    match crate::utils::validation::normalize_mime_type(declared_type).as_str() {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        _ => "bin",
    }
}

impl PreviewStore for DiskPreviewStore {
    fn create(&self, file: &CandidateFile) -> Result<String> {
        let path = self.dir.path().join(format!(
            "{}.{}",
            Uuid::new_v4(),
            extension_for(&file.declared_type)
        ));
        std::fs::write(&path, &file.bytes)
            .with_context(|| format!("Failed to write preview for {}", file.name))?;

        let url = format!("file://{}", path.display());
        self.files.insert(url.clone(), path);
        Ok(url)
    }

    fn release(&self, url: &str) {
        match self.files.remove(url) {
            Some((_, path)) => {
                if let Err(e) = std::fs::remove_file(&path) {
                    tracing::error!("Failed to delete preview {}: {}", path.display(), e);
                }
            }
            None => tracing::warn!("Release of unknown preview {}", url),
        }
    }

    fn live_count(&self) -> usize {
        self.files.len()
    }
}

/// Factory function to create a preview store based on config
pub fn create_preview_store(store_type: &str) -> Result<Arc<dyn PreviewStore>> {
    match store_type.to_lowercase().as_str() {
        "memory" | "blob" => Ok(Arc::new(MemoryPreviewStore::new())),
        "disk" | "file" => {
            let store = DiskPreviewStore::new()
                .map_err(|e| anyhow!("Failed to create preview directory: {}", e))?;
            Ok(Arc::new(store))
        }
        _ => {
            tracing::warn!(
                "Unknown preview store type '{}', using MemoryPreviewStore",
                store_type
            );
            Ok(Arc::new(MemoryPreviewStore::new()))
        }
    }
}
