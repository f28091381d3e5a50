use thiserror::Error;

/// Error kinds raised by the SDAL encoding core.
#[derive(Debug, Error)]
pub enum SdalError {
    #[error("required input is missing or truncated: {0}")]
    InputNotAvailable(String),

    #[error("encoded parcel payload of {size} bytes exceeds the 65,000-byte ceiling")]
    ParcelTooLarge { size: usize },

    #[error("value {value} is out of range for {what}")]
    OverflowError { what: &'static str, value: i64 },

    #[error("SZIP codec invariant violated: {0}")]
    CodecError(String),

    #[error("geo-extractor failed: {0}")]
    ExtractorError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SdalResult<T> = Result<T, SdalError>;
