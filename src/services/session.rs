use crate::models::CandidateFile;
use crate::services::flow::{FlowState, images_needed};
use crate::services::pagination::{PageView, clamp_page, total_pages};
use crate::services::staging::{AcceptOutcome, ImageCollection, ImageStager, clear_all, remove_image};
use uuid::Uuid;

/// Input events of the new-comparison dialog
#[derive(Debug, Clone)]
pub enum IntakeEvent {
    DragOver,
    DragLeave,
    /// Files dropped onto the drop zone
    Drop(Vec<CandidateFile>),
    /// Files chosen through the file picker
    Select(Vec<CandidateFile>),
    Remove(Uuid),
    ClearAll,
    /// Dialog dismissed: discards everything staged so far
    Cancel,
}

/// State of one new-comparison dialog: name, description, drop-zone
/// highlight and the locally staged images.
#[derive(Debug)]
pub struct IntakeSession {
    stager: ImageStager,
    name: String,
    description: String,
    dragging: bool,
    images: ImageCollection,
}

impl IntakeSession {
    pub fn new(stager: ImageStager) -> Self {
        Self {
            stager,
            name: String::new(),
            description: String::new(),
            dragging: false,
            images: ImageCollection::new(),
        }
    }

    pub fn update(&mut self, event: IntakeEvent) -> Option<AcceptOutcome> {
        match event {
            IntakeEvent::DragOver => {
                self.dragging = true;
                None
            }
            IntakeEvent::DragLeave => {
                self.dragging = false;
                None
            }
            IntakeEvent::Drop(batch) => {
                self.dragging = false;
                Some(self.accept(batch))
            }
            IntakeEvent::Select(batch) => Some(self.accept(batch)),
            IntakeEvent::Remove(id) => {
                self.images = remove_image(std::mem::take(&mut self.images), id);
                None
            }
            IntakeEvent::ClearAll => {
                self.images = clear_all(std::mem::take(&mut self.images));
                None
            }
            IntakeEvent::Cancel => {
                self.reset();
                None
            }
        }
    }

    fn accept(&mut self, batch: Vec<CandidateFile>) -> AcceptOutcome {
        let (images, outcome) = self
            .stager
            .accept_files(batch, std::mem::take(&mut self.images));
        self.images = images;
        outcome
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn images(&self) -> &ImageCollection {
        &self.images
    }

    pub fn stager(&self) -> &ImageStager {
        &self.stager
    }

    pub fn flow_state(&self) -> FlowState {
        self.images.flow_state(self.stager.config().min_images)
    }

    pub fn images_needed(&self) -> usize {
        images_needed(self.images.len(), self.stager.config().min_images)
    }

    pub fn can_create(&self) -> bool {
        !self.name.trim().is_empty() && self.flow_state().can_proceed()
    }

    /// Page of the staged images; out-of-range requests are clamped
    pub fn page(&self, page_number: usize) -> PageView {
        let page_size = self.stager.config().images_per_page;
        let page_number = clamp_page(page_number, total_pages(self.images.len(), page_size));
        PageView::build(self.images.as_slice(), page_size, page_number)
    }

    /// Hands the staged images over, leaving the session empty
    pub fn take_images(&mut self) -> ImageCollection {
        std::mem::take(&mut self.images)
    }

    /// Clears the form and releases every staged preview
    pub fn reset(&mut self) {
        self.name.clear();
        self.description.clear();
        self.dragging = false;
        self.images = clear_all(std::mem::take(&mut self.images));
    }
}
