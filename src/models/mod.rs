use crate::services::preview::PreviewHandle;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One file offered by a picker or a drop event, before validation
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub name: String,
    pub declared_type: String,
    pub size_bytes: u64,
    pub bytes: Bytes,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            size_bytes: bytes.len() as u64,
            bytes,
        }
    }

    /// Candidate whose declared size differs from the bytes carried (drop events
    /// report sizes before contents are read).
    pub fn with_declared_size(
        name: impl Into<String>,
        declared_type: impl Into<String>,
        size_bytes: u64,
    ) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            size_bytes,
            bytes: Bytes::new(),
        }
    }
}

/// An accepted file pending comparison. Owns its preview handle; dropping the
/// image releases the handle.
#[derive(Debug)]
pub struct StagedImage {
    pub id: Uuid,
    pub display_name: String,
    pub size_label: String,
    pub handle: PreviewHandle,
}

impl StagedImage {
    pub fn preview_url(&self) -> &str {
        self.handle.url()
    }

    pub fn summary(&self) -> ImageSummary {
        ImageSummary {
            id: self.id,
            name: self.display_name.clone(),
            size: self.size_label.clone(),
            url: self.handle.url().to_string(),
        }
    }
}

/// Serializable view of a staged image for the host view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSummary {
    pub id: Uuid,
    pub name: String,
    pub size: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparison {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub images: Vec<ImageSummary>,
    pub created_at: DateTime<Utc>,
}
