use crate::config::IntakeConfig;
use crate::models::{CandidateFile, ImageSummary, StagedImage};
use crate::services::flow::FlowState;
use crate::services::preview::{PreviewHandle, PreviewStore};
use crate::utils::format::format_file_size;
use crate::utils::validation::{ValidationError, validate_candidate};
use std::sync::Arc;
use uuid::Uuid;

/// Ordered collection of staged images. Not `Clone`: every entry owns a
/// preview handle, so the collection is moved through transitions rather
/// than copied.
#[derive(Debug, Default)]
pub struct ImageCollection {
    images: Vec<StagedImage>,
}

impl ImageCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn as_slice(&self) -> &[StagedImage] {
        &self.images
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StagedImage> {
        self.images.iter()
    }

    pub fn get(&self, id: Uuid) -> Option<&StagedImage> {
        self.images.iter().find(|img| img.id == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> Vec<Uuid> {
        self.images.iter().map(|img| img.id).collect()
    }

    pub fn summaries(&self) -> Vec<ImageSummary> {
        self.images.iter().map(StagedImage::summary).collect()
    }

    pub fn flow_state(&self, min_images: usize) -> FlowState {
        FlowState::from_count(self.len(), min_images)
    }

    /// Removes the entry with `id`, releasing its preview. Returns whether
    /// anything was removed.
    pub fn remove(&mut self, id: Uuid) -> bool {
        match self.images.iter().position(|img| img.id == id) {
            Some(index) => {
                let removed = self.images.remove(index);
                tracing::debug!("Removed staged image {} ({})", removed.id, removed.display_name);
                true
            }
            None => false,
        }
    }

    /// Releases every preview and empties the collection. Returns how many
    /// entries were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.images.len();
        self.images.clear();
        count
    }
}

impl<'a> IntoIterator for &'a ImageCollection {
    type Item = &'a StagedImage;
    type IntoIter = std::slice::Iter<'a, StagedImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}

/// A file dropped from a batch, with the reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub name: String,
    pub reason: ValidationError,
}

/// Result of one `accept_files` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptOutcome {
    /// Ids appended to the collection, in batch order
    pub accepted: Vec<Uuid>,
    /// Files that failed validation or preview creation
    pub rejected: Vec<Rejection>,
    /// Valid files dropped because the collection was full
    pub overflow: usize,
}

impl AcceptOutcome {
    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    /// Every file of the batch that did not make it into the collection
    pub fn rejected_count(&self) -> usize {
        self.rejected.len() + self.overflow
    }
}

/// Turns candidate batches into staged images under an intake config
#[derive(Clone)]
pub struct ImageStager {
    config: IntakeConfig,
    store: Arc<dyn PreviewStore>,
}

impl std::fmt::Debug for ImageStager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageStager")
            .field("config", &self.config)
            .field("live_previews", &self.store.live_count())
            .finish()
    }
}

impl ImageStager {
    pub fn new(config: IntakeConfig, store: Arc<dyn PreviewStore>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &IntakeConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn PreviewStore> {
        &self.store
    }

    /// Validates the batch and appends accepted files to the end of
    /// `collection`, in batch order. Invalid files are dropped and reported.
    /// Once `max_images` is reached, the remaining valid files are counted as
    /// overflow and no preview is created for them.
    pub fn accept_files<I>(
        &self,
        batch: I,
        mut collection: ImageCollection,
    ) -> (ImageCollection, AcceptOutcome)
    where
        I: IntoIterator<Item = CandidateFile>,
    {
        let mut outcome = AcceptOutcome::default();
        let mut remaining = self.config.max_images.saturating_sub(collection.len());

        for file in batch {
            if let Err(reason) =
                validate_candidate(&file.declared_type, file.size_bytes, &file.bytes, &self.config)
            {
                tracing::debug!("Rejected {}: {}", file.name, reason);
                outcome.rejected.push(Rejection {
                    name: file.name,
                    reason,
                });
                continue;
            }

            if remaining == 0 {
                outcome.overflow += 1;
                continue;
            }

            let handle = match PreviewHandle::acquire(&self.store, &file) {
                Ok(handle) => handle,
                Err(e) => {
                    tracing::warn!("Preview creation failed for {}: {}", file.name, e);
                    outcome.rejected.push(Rejection {
                        name: file.name,
                        reason: ValidationError::PreviewUnavailable(e.to_string()),
                    });
                    continue;
                }
            };

            let image = StagedImage {
                id: Uuid::new_v4(),
                size_label: format_file_size(file.size_bytes),
                display_name: file.name,
                handle,
            };
            outcome.accepted.push(image.id);
            collection.images.push(image);
            remaining -= 1;
        }

        if outcome.overflow > 0 {
            tracing::warn!(
                "Collection full at {} images, dropped {} newest files",
                self.config.max_images,
                outcome.overflow
            );
        }
        tracing::info!(
            "Staged {} images ({} rejected), collection now {}",
            outcome.accepted_count(),
            outcome.rejected_count(),
            collection.len()
        );

        (collection, outcome)
    }
}

/// Removes the image with `id`, releasing its preview. Absent ids leave the
/// collection unchanged.
pub fn remove_image(mut collection: ImageCollection, id: Uuid) -> ImageCollection {
    collection.remove(id);
    collection
}

/// Releases every preview in the collection and returns an empty one
pub fn clear_all(mut collection: ImageCollection) -> ImageCollection {
    let released = collection.clear();
    tracing::debug!("Cleared {} staged images", released);
    collection
}
