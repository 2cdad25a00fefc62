use crate::error::{AppError, Result};
use crate::models::{CandidateFile, Comparison};
use crate::services::flow::FlowState;
use crate::services::pagination::{PageView, clamp_page, total_pages};
use crate::services::session::IntakeSession;
use crate::services::staging::{AcceptOutcome, ImageCollection, ImageStager, clear_all, remove_image};
use chrono::Utc;
use uuid::Uuid;

/// Dashboard-level state: the active image set, every comparison created so
/// far (newest first) and the one currently selected.
#[derive(Debug)]
pub struct CompareWorkspace {
    stager: ImageStager,
    images: ImageCollection,
    comparisons: Vec<Comparison>,
    current: Option<Uuid>,
}

impl CompareWorkspace {
    pub fn new(stager: ImageStager) -> Self {
        Self {
            stager,
            images: ImageCollection::new(),
            comparisons: Vec::new(),
            current: None,
        }
    }

    /// Opens a fresh dialog session sharing this workspace's stager
    pub fn new_session(&self) -> IntakeSession {
        IntakeSession::new(self.stager.clone())
    }

    /// Turns a ready session into a comparison. The previously active images
    /// are released and replaced by the session's images; the session is reset.
    pub fn create_comparison(&mut self, session: &mut IntakeSession) -> Result<&Comparison> {
        let name = session.name().trim().to_string();
        if name.is_empty() {
            return Err(AppError::NameRequired);
        }

        let min_images = self.stager.config().min_images;
        if session.images().len() < min_images {
            return Err(AppError::NotEnoughImages {
                have: session.images().len(),
                need: min_images,
            });
        }

        let description = Some(session.description().trim().to_string()).filter(|d| !d.is_empty());

        self.images = clear_all(std::mem::take(&mut self.images));
        self.images = session.take_images();
        session.reset();

        let comparison = Comparison {
            id: Uuid::new_v4(),
            name,
            description,
            images: self.images.summaries(),
            created_at: Utc::now(),
        };
        tracing::info!(
            "Created comparison '{}' ({}) with {} images",
            comparison.name,
            comparison.id,
            comparison.images.len()
        );

        self.current = Some(comparison.id);
        self.comparisons.insert(0, comparison);
        Ok(&self.comparisons[0])
    }

    /// Appends more files to the active image set
    pub fn add_images(&mut self, batch: Vec<CandidateFile>) -> AcceptOutcome {
        let (images, outcome) = self
            .stager
            .accept_files(batch, std::mem::take(&mut self.images));
        self.images = images;
        outcome
    }

    pub fn remove_image(&mut self, id: Uuid) {
        self.images = remove_image(std::mem::take(&mut self.images), id);
    }

    pub fn clear_images(&mut self) {
        self.images = clear_all(std::mem::take(&mut self.images));
    }

    pub fn images(&self) -> &ImageCollection {
        &self.images
    }

    pub fn comparisons(&self) -> &[Comparison] {
        &self.comparisons
    }

    pub fn current_comparison(&self) -> Option<&Comparison> {
        let id = self.current?;
        self.comparisons.iter().find(|c| c.id == id)
    }

    pub fn set_current(&mut self, id: Option<Uuid>) -> Result<()> {
        if let Some(id) = id {
            if !self.comparisons.iter().any(|c| c.id == id) {
                return Err(AppError::NotFound(format!("comparison {}", id)));
            }
        }
        self.current = id;
        Ok(())
    }

    pub fn flow_state(&self) -> FlowState {
        self.images.flow_state(self.stager.config().min_images)
    }

    /// Page of the active images; out-of-range requests are clamped
    pub fn page(&self, page_number: usize) -> PageView {
        let page_size = self.stager.config().images_per_page;
        let page_number = clamp_page(page_number, total_pages(self.images.len(), page_size));
        PageView::build(self.images.as_slice(), page_size, page_number)
    }
}
