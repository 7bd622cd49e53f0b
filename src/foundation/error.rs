/// Convenience result type used across pfpkit.
pub type PfpResult<T> = Result<T, PfpError>;

/// Message shown when an export is attempted before a photo was chosen.
pub const MISSING_PHOTO_MESSAGE: &str = "Please upload a photo first!";

/// Generic message shown for any other export failure.
pub const EXPORT_FAILED_MESSAGE: &str = "An error occurred during image finalization.";

/// Top-level error taxonomy used by the library APIs.
#[derive(thiserror::Error, Debug)]
pub enum PfpError {
    /// Invalid user-provided document, catalog or asset path data.
    #[error("validation error: {0}")]
    Validation(String),

    /// An image (photo, background or accessory) could not be read or decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Export was requested without a photo in the composition.
    #[error("export rejected: no photo has been set")]
    MissingPhoto,

    /// Another export is already running on the same exporter.
    #[error("export rejected: an export is already in progress")]
    ExportInFlight,

    /// Any other failure inside the staged export pipeline.
    #[error("export error: {0}")]
    Export(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PfpError {
    /// Build a [`PfpError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PfpError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`PfpError::Export`] value.
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`PfpError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Text suitable for showing to the person using the tool.
    ///
    /// Missing input gets a specific prompt; everything else collapses into one generic failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingPhoto => MISSING_PHOTO_MESSAGE,
            _ => EXPORT_FAILED_MESSAGE,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
