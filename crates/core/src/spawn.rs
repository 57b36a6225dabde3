//! Preparing transcoder processes for a supervisor.
//!
//! [`ProcessSpawner`] makes sure a session's output directory exists, builds
//! its argument list and hands back a [`ProcessHandle`]: program, arguments
//! and output directory, nothing started. Starting, wiring stdio, watching
//! and killing the process belong to whoever receives the handle.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use crate::command::{CommandSpec, playlist_path};
use crate::config::StreamConfig;
use crate::error::{HlsError, Result};

/// Transcoder binary looked up on `PATH` when no other program is given.
pub const DEFAULT_TRANSCODER: &str = "ffmpeg";

/// An unstarted transcoder invocation bound to one session directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessHandle {
    program: OsString,
    spec: CommandSpec,
    output_dir: PathBuf,
}

impl ProcessHandle {
    pub fn program(&self) -> &OsString {
        &self.program
    }

    pub fn command_spec(&self) -> &CommandSpec {
        &self.spec
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Where the transcoder writes the live playlist.
    pub fn playlist_path(&self) -> PathBuf {
        playlist_path(&self.output_dir)
    }

    /// An unstarted [`Command`] for this invocation.
    ///
    /// Only program and arguments are set. The child inherits the caller's
    /// working directory, which is what a relative output directory in the
    /// arguments is resolved against.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.spec.args());
        cmd
    }
}

/// Produces [`ProcessHandle`]s for streaming sessions.
///
/// Supervisors hold this as `Arc<dyn Spawn>` so the transcoder can be swapped
/// out in tests.
pub trait Spawn: Send + Sync {
    /// Prepare `output_dir` and return an unstarted handle that transcodes
    /// `uri` into it.
    fn spawn(&self, output_dir: &Path, uri: &str) -> Result<ProcessHandle>;
}

/// [`Spawn`] implementation backed by an external ffmpeg binary.
#[derive(Debug, Clone)]
pub struct ProcessSpawner {
    config: Arc<StreamConfig>,
    program: OsString,
}

impl ProcessSpawner {
    pub fn new(config: Arc<StreamConfig>) -> Self {
        Self {
            config,
            program: OsString::from(DEFAULT_TRANSCODER),
        }
    }

    /// Use a specific transcoder binary instead of `ffmpeg` from `PATH`.
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn program(&self) -> &OsString {
        &self.program
    }
}

impl Spawn for ProcessSpawner {
    fn spawn(&self, output_dir: &Path, uri: &str) -> Result<ProcessHandle> {
        spawn_with_program(&self.program, &self.config, output_dir, uri)
    }
}

/// Prepare a session with the default transcoder binary.
///
/// Creates `output_dir` and any missing parents (an existing directory is
/// fine), then returns the unstarted handle.
pub fn spawn(config: &StreamConfig, output_dir: &Path, uri: &str) -> Result<ProcessHandle> {
    spawn_with_program(DEFAULT_TRANSCODER.as_ref(), config, output_dir, uri)
}

fn spawn_with_program(
    program: &std::ffi::OsStr,
    config: &StreamConfig,
    output_dir: &Path,
    uri: &str,
) -> Result<ProcessHandle> {
    if output_dir.as_os_str().is_empty() {
        return Err(HlsError::EmptyOutputDir);
    }

    ensure_output_dir(output_dir)?;

    let spec = config.command(output_dir, uri);
    tracing::debug!(
        output_dir = %output_dir.display(),
        program = %program.to_string_lossy(),
        command = %spec,
        "transcoder prepared"
    );

    Ok(ProcessHandle {
        program: program.to_os_string(),
        spec,
        output_dir: output_dir.to_path_buf(),
    })
}

fn ensure_output_dir(output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir).map_err(|source| {
        tracing::warn!(output_dir = %output_dir.display(), error = %source, "cannot create output directory");
        HlsError::CreateOutputDir {
            path: output_dir.to_path_buf(),
            source,
        }
    })?;
    tracing::debug!(output_dir = %output_dir.display(), "output directory ready");
    Ok(())
}
