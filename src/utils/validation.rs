use crate::config::IntakeConfig;
use thiserror::Error;

/// Maximum file size: 10 MiB
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Why a candidate file was dropped from a batch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("INVALID_MIME_TYPE: '{0}' is not an accepted image type")]
    InvalidMimeType(String),

    #[error("FILE_TOO_LARGE: {size} bytes exceeds maximum allowed {max} bytes")]
    FileTooLarge { size: u64, max: u64 },

    #[error("EMPTY_FILE: file appears to be empty")]
    EmptyFile,

    #[error("EXECUTABLE_CONTENT: file contains executable content")]
    ExecutableContent,

    #[error("CONTENT_MISMATCH: declared '{declared}' but content looks like '{detected}'")]
    ContentMismatch { declared: String, detected: String },

    #[error("PREVIEW_UNAVAILABLE: {0}")]
    PreviewUnavailable(String),
}

impl ValidationError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidMimeType(_) => "INVALID_MIME_TYPE",
            ValidationError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            ValidationError::EmptyFile => "EMPTY_FILE",
            ValidationError::ExecutableContent => "EXECUTABLE_CONTENT",
            ValidationError::ContentMismatch { .. } => "CONTENT_MISMATCH",
            ValidationError::PreviewUnavailable(_) => "PREVIEW_UNAVAILABLE",
        }
    }
}

/// Lowercased media type with parameters stripped, e.g. `image/PNG; q=1` -> `image/png`.
/// Falls back to manual splitting when the declared value is not a valid media type.
pub fn normalize_mime_type(content_type: &str) -> String {
    match content_type.trim().parse::<mime::Mime>() {
        Ok(parsed) => parsed.essence_str().to_lowercase(),
        Err(_) => content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_lowercase(),
    }
}

/// Validates file size against maximum limit (inclusive)
pub fn validate_file_size(size: u64, max_size: u64) -> Result<(), ValidationError> {
    if size > max_size {
        return Err(ValidationError::FileTooLarge {
            size,
            max: max_size,
        });
    }
    Ok(())
}

/// Validates a declared MIME type against an allowlist
pub fn validate_mime_type<S: AsRef<str>>(
    content_type: &str,
    allowed: &[S],
) -> Result<(), ValidationError> {
    let normalized = normalize_mime_type(content_type);

    if allowed
        .iter()
        .any(|allowed| allowed.as_ref().eq_ignore_ascii_case(&normalized))
    {
        return Ok(());
    }

    Err(ValidationError::InvalidMimeType(content_type.to_string()))
}

/// Checks if file content appears to be executable
pub fn is_executable_content(header: &[u8]) -> bool {
    if header.len() < 4 {
        return false;
    }

    // ELF binary (Linux)
    if header.starts_with(&[0x7F, 0x45, 0x4C, 0x46]) {
        return true;
    }

    // PE/COFF (Windows .exe, .dll)
    if header.starts_with(&[0x4D, 0x5A]) {
        return true;
    }

    // Shebang (shell scripts)
    if header.starts_with(b"#!") {
        return true;
    }

    // Mach-O, wasm, dex and friends
    infer::is_app(header)
}

/// Sniffs the content and checks it agrees with the declared type
pub fn verify_content(bytes: &[u8], declared_mime: &str) -> Result<(), ValidationError> {
    if bytes.is_empty() {
        return Err(ValidationError::EmptyFile);
    }

    if is_executable_content(bytes) {
        return Err(ValidationError::ExecutableContent);
    }

    let declared = normalize_mime_type(declared_mime);
    match infer::get(bytes) {
        Some(kind) if kind.mime_type() == declared => Ok(()),
        Some(kind) => Err(ValidationError::ContentMismatch {
            declared,
            detected: kind.mime_type().to_string(),
        }),
        None => Err(ValidationError::ContentMismatch {
            declared,
            detected: "unknown".to_string(),
        }),
    }
}

/// Full validation pipeline for one candidate: type, size, then content when enabled
pub fn validate_candidate(
    declared_type: &str,
    size: u64,
    bytes: &[u8],
    config: &IntakeConfig,
) -> Result<(), ValidationError> {
    validate_mime_type(declared_type, &config.allowed_mime_types)?;
    validate_file_size(size, config.max_file_size)?;

    if config.verify_content {
        verify_content(bytes, declared_type)?;
    }

    Ok(())
}
