use crate::utils::validation::MAX_FILE_SIZE;
use std::env;
use validator::Validate;

/// Allowed image types for staging (PNG, JPEG, WEBP)
pub const DEFAULT_ALLOWED_MIME_TYPES: &[&str] = &["image/png", "image/jpeg", "image/webp"];

/// Intake configuration for the image staging flow
#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "validate_bounds"))]
pub struct IntakeConfig {
    /// Minimum images before a comparison can start (default: 3)
    #[validate(range(min = 1, message = "At least one image must be required"))]
    pub min_images: usize,

    /// Maximum staged images per collection (default: 100)
    pub max_images: usize,

    /// Maximum file size in bytes (default: 10 MiB)
    #[validate(range(min = 1, message = "File size limit must be positive"))]
    pub max_file_size: u64,

    /// Accepted declared media types
    #[validate(length(min = 1, message = "At least one media type must be allowed"))]
    pub allowed_mime_types: Vec<String>,

    /// Grid page size (default: 10)
    #[validate(range(min = 1, message = "Page size must be positive"))]
    pub images_per_page: usize,

    /// Preview store backend: "memory" or "disk" (default: "memory")
    pub preview_store_type: String,

    /// Sniff file content and reject declared/actual type mismatches (default: false)
    pub verify_content: bool,
}

fn validate_bounds(config: &IntakeConfig) -> Result<(), validator::ValidationError> {
    if config.max_images < config.min_images {
        let mut err = validator::ValidationError::new("max_below_min");
        err.message = Some("max_images must be at least min_images".into());
        return Err(err);
    }
    Ok(())
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            min_images: 3,
            max_images: 100,
            max_file_size: MAX_FILE_SIZE,
            allowed_mime_types: DEFAULT_ALLOWED_MIME_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            images_per_page: 10,
            preview_store_type: "memory".to_string(),
            verify_content: false,
        }
    }
}

impl IntakeConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup, falling back to
    /// defaults for missing or unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        Self {
            min_images: lookup("MIN_IMAGES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.min_images),

            max_images: lookup("MAX_IMAGES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_images),

            max_file_size: lookup("MAX_FILE_SIZE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_file_size),

            allowed_mime_types: lookup("ALLOWED_MIME_TYPES")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_lowercase())
                        .filter(|s| !s.is_empty())
                        .collect::<Vec<_>>()
                })
                .filter(|list| !list.is_empty())
                .unwrap_or(default.allowed_mime_types),

            images_per_page: lookup("IMAGES_PER_PAGE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.images_per_page),

            preview_store_type: lookup("PREVIEW_STORE").unwrap_or(default.preview_store_type),

            verify_content: lookup("VERIFY_CONTENT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(default.verify_content),
        }
    }

    /// Config for the "My Images" dashboard grid (10 per page)
    pub fn dashboard() -> Self {
        Self::default().with_preset("dashboard")
    }

    /// Config for the new-comparison dialog preview grid (6 per page)
    pub fn modal() -> Self {
        Self::default().with_preset("modal")
    }

    /// Applies a named grid preset on top of this config. Only the page size
    /// changes; unknown names leave the config as it is.
    pub fn with_preset(mut self, preset: &str) -> Self {
        match preset {
            "dashboard" => self.images_per_page = 10,
            "modal" => self.images_per_page = 6,
            _ => {}
        }
        self
    }
}
