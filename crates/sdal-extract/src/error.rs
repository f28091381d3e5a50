use thiserror::Error;

use sdal_types::SdalError;

/// Extractor-specific failure context, converted into [`SdalError`] at the
/// crate boundary.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to read PBF source {path}: {source}")]
    PbfRead { path: String, #[source] source: osmpbf::Error },

    #[error("projection failed: {0}")]
    Projection(String),

    #[error("image writer failed: {0}")]
    ImageWriter(String),
}

impl From<ExtractError> for SdalError {
    fn from(e: ExtractError) -> Self {
        SdalError::ExtractorError(e.to_string())
    }
}
