use thiserror::Error;

/// Errors surfaced by editor operations that touch external resources.
///
/// Precondition failures (erasing without an image, clamping a missing object)
/// are not errors: those operations simply report that nothing happened.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("Failed to encode image: {0}")]
    ImageEncode(String),

    #[error("Invalid image source: {0}")]
    InvalidSource(String),

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Could not allocate a {width}x{height} raster buffer")]
    RasterAllocation { width: u32, height: u32 },

    #[error("Snapshot serialization failed: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Result type for editor operations
pub type EditorResult<T> = Result<T, EditorError>;
