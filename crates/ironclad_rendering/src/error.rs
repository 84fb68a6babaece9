//! # Texture Error Types
//!
//! Texture fetches are the only fallible operation in the renderer, and
//! even these never reach the frame: a failed fetch just leaves the flag
//! overlay off.

use thiserror::Error;

/// Errors delivered to [`crate::TextureCache::on_loaded`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextureError {
    /// Transport failure or non-success status.
    #[error("texture request failed: {0}")]
    Network(String),

    /// Payload was not a decodable image.
    #[error("texture decode failed: {0}")]
    Decode(String),

    /// Key contains characters that cannot form a URL path segment.
    #[error("invalid texture key: {0:?}")]
    InvalidKey(String),

    /// The source has no texture for this key.
    #[error("no texture for key: {0}")]
    NotFound(String),
}

/// Result type for texture loading.
pub type TextureResult<T> = Result<T, TextureError>;
