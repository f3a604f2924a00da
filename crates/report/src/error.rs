//! Error types for drift-report.

use std::path::PathBuf;

/// Error type for all fallible operations in the drift-report crate.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Returned when an output file or directory cannot be written.
    #[error("cannot write {}: {source}", path.display())]
    Io {
        /// Path being written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Returned when the run summary cannot be serialized.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serializer failure.
        reason: String,
    },

    /// Returned when the plotting backend fails.
    #[error("plot {} failed: {reason}", path.display())]
    Plot {
        /// Plot being drawn.
        path: PathBuf,
        /// Description of the backend failure.
        reason: String,
    },
}

impl ReportError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| ReportError::Io { path, source }
    }
}
