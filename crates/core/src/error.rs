//! Error types for the RTSP-to-HLS bridge.

use std::path::PathBuf;

/// Errors that can occur while preparing a transcoder invocation.
///
/// Building the argument list never fails; only the filesystem work done by
/// [`spawn`](crate::spawn::spawn) can:
///
/// - **Output directory**: [`EmptyOutputDir`](Self::EmptyOutputDir),
///   [`CreateOutputDir`](Self::CreateOutputDir).
/// - **Other I/O**: [`Io`](Self::Io).
#[derive(Debug, thiserror::Error)]
pub enum HlsError {
    /// Underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The session output directory could not be created.
    #[error("failed to create output directory {}: {source}", path.display())]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An empty path was given as the session output directory.
    #[error("output directory path is empty")]
    EmptyOutputDir,
}

/// Convenience alias for `Result<T, HlsError>`.
pub type Result<T> = std::result::Result<T, HlsError>;
