//! Streaming session configuration.
//!
//! A [`StreamConfig`] is built once and shared read-only by every session
//! spawned from it, either by reference or behind an `Arc`. Nothing in here
//! is mutated after construction.

use std::path::{Path, PathBuf};

use crate::command::{CommandSpec, build_command};

/// What happens to HLS segments once they fall out of the live playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RetentionMode {
    /// Every segment stays on disk.
    KeepAll,
    /// Segments that left the playlist window are deleted by the muxer.
    #[default]
    DeleteConsumed,
}

impl RetentionMode {
    /// Map a "keep files" switch onto a retention mode.
    pub fn from_keep_files(keep_files: bool) -> Self {
        if keep_files {
            Self::KeepAll
        } else {
            Self::DeleteConsumed
        }
    }

    /// Value passed to the muxer's `-hls_flags` option.
    pub fn hls_flags(self) -> &'static str {
        match self {
            Self::KeepAll => "append_list",
            Self::DeleteConsumed => "delete_segments+append_list",
        }
    }
}

/// Rotation settings for the transcoder's log output.
///
/// Command construction ignores these; they are read by whatever attaches a
/// rotating sink to the spawned process's stdout/stderr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingPolicy {
    /// Whether transcoder output should be captured at all.
    pub enabled: bool,
    /// Directory the log files are written to.
    pub directory: PathBuf,
    /// Size in megabytes at which the active file is rotated.
    pub max_size_mb: u32,
    /// Number of rotated files to keep.
    pub max_backups: u32,
    /// Age in days after which a rotated file is removed.
    pub max_age_days: u32,
    /// Compress rotated files.
    pub compress: bool,
}

impl Default for LoggingPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            directory: PathBuf::from("logs"),
            max_size_mb: 100,
            max_backups: 3,
            max_age_days: 28,
            compress: false,
        }
    }
}

/// Immutable per-deployment settings for RTSP-to-HLS sessions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamConfig {
    pub retention: RetentionMode,
    /// Pass the source audio through. When `false` the transcoder is told to
    /// drop audio.
    pub audio: bool,
    pub logging: LoggingPolicy,
}

impl StreamConfig {
    pub fn new(retention: RetentionMode, audio: bool, logging: LoggingPolicy) -> Self {
        Self {
            retention,
            audio,
            logging,
        }
    }

    pub fn with_retention(mut self, retention: RetentionMode) -> Self {
        self.retention = retention;
        self
    }

    pub fn with_audio(mut self, audio: bool) -> Self {
        self.audio = audio;
        self
    }

    pub fn with_logging(mut self, logging: LoggingPolicy) -> Self {
        self.logging = logging;
        self
    }

    /// Build the transcoder arguments for one session under this config.
    pub fn command(&self, output_dir: &Path, uri: &str) -> CommandSpec {
        build_command(self.retention, self.audio, output_dir, uri)
    }
}
