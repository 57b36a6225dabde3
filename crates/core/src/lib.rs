//! Low-latency RTSP-to-HLS bridging through an external ffmpeg process.
//!
//! The crate covers the deterministic part of the bridge: turning a
//! [`StreamConfig`], a session output directory and an RTSP source URI into
//! an exact ffmpeg argument list, and preparing the directory that list
//! writes into. Running the process is left to the caller.
//!
//! ```no_run
//! use std::path::Path;
//! use rtsp_hls::{RetentionMode, StreamConfig};
//!
//! let config = StreamConfig::default().with_retention(RetentionMode::KeepAll);
//! let handle = rtsp_hls::spawn(&config, Path::new("/tmp/hls/cam1"), "rtsp://camera/stream")?;
//! let child = handle.command().spawn()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod spawn;

pub use command::{CommandSpec, build_command};
pub use config::{LoggingPolicy, RetentionMode, StreamConfig};
pub use error::{HlsError, Result};
pub use spawn::{ProcessHandle, ProcessSpawner, Spawn, spawn};
