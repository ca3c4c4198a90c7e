use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the edit session and the pipeline it drives.
///
/// Parameter and crop errors leave the session untouched; file errors are
/// handed back to the GUI for display.
#[derive(Debug, Error)]
pub enum EditError {
    #[error("invalid value for {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("invalid crop region: {0}")]
    InvalidCropRegion(String),

    #[error("cannot read image {}", path.display())]
    UnreadableImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cannot write image to {}", path.display())]
    UnwritableDestination {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("no image loaded")]
    NoImage,
}

impl EditError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// True for errors caused by a rejected edit rather than by file I/O.
    pub fn is_recoverable_edit(&self) -> bool {
        matches!(
            self,
            Self::InvalidParameter { .. } | Self::InvalidCropRegion(_)
        )
    }
}
