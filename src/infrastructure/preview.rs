use crate::config::IntakeConfig;
use crate::error::{AppError, Result};
use crate::services::preview::{PreviewStore, create_preview_store};
use crate::services::staging::ImageStager;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub fn setup_preview_store(config: &IntakeConfig) -> Result<Arc<dyn PreviewStore>> {
    let store = create_preview_store(&config.preview_store_type)
        .map_err(|e| AppError::Preview(e.to_string()))?;
    info!("🖼️  Preview store: {}", config.preview_store_type);
    Ok(store)
}

/// Validates the config and wires a stager to its preview store
pub fn setup_stager(config: IntakeConfig) -> Result<ImageStager> {
    config.validate()?;
    let store = setup_preview_store(&config)?;
    info!(
        "🛡️  Intake Config: Max Size={}MB, Images={}..={}, Page Size={}, Verify Content={}",
        config.max_file_size / 1024 / 1024,
        config.min_images,
        config.max_images,
        config.images_per_page,
        config.verify_content
    );
    Ok(ImageStager::new(config, store))
}
