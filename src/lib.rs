pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

pub use config::IntakeConfig;
pub use error::AppError;
pub use models::{CandidateFile, Comparison, ImageSummary, StagedImage};
pub use services::flow::FlowState;
pub use services::pagination::{PageView, paginate};
pub use services::preview::{PreviewHandle, PreviewStore};
pub use services::session::{IntakeEvent, IntakeSession};
pub use services::staging::{AcceptOutcome, ImageCollection, ImageStager, clear_all, remove_image};
pub use services::workspace::CompareWorkspace;
