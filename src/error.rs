use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Comparison name is required")]
    NameRequired,

    #[error("Not enough images: have {have}, need at least {need}")]
    NotEnoughImages { have: usize, need: usize },

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Preview Error: {0}")]
    Preview(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] validator::ValidationErrors),
}

pub type Result<T> = std::result::Result<T, AppError>;
