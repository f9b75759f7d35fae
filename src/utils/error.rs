use thiserror::Error;

/// Errors raised by a text-recognition capability.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RecognitionError {
    /// The capability could not be invoked at all (platform module missing).
    #[error("Text recognition unavailable: {0}")]
    Unavailable(String),
    /// The capability ran but rejected the image or crashed.
    #[error("Text recognition failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum PassportError {
    #[error("Passport extraction failed: {0}")]
    RecognitionFailed(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(String),
    /// A recorded region file that does not parse as a region list.
    #[error("Invalid recorded regions: {0}")]
    InvalidRegions(String),
}
