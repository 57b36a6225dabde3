use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use rtsp_hls::{LoggingPolicy, ProcessSpawner, RetentionMode, Spawn, StreamConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rtsp-hls",
    about = "Bridge an RTSP camera feed to low-latency HLS via ffmpeg"
)]
struct Args {
    /// RTSP source URI
    #[arg(long, short)]
    uri: String,

    /// Directory for the playlist and segments
    #[arg(long, short, default_value = "hls")]
    output_dir: PathBuf,

    /// Keep every segment instead of deleting ones that left the playlist
    #[arg(long)]
    keep_files: bool,

    /// Pass audio through (dropped by default)
    #[arg(long)]
    audio: bool,

    /// Transcoder binary
    #[arg(long, default_value = rtsp_hls::spawn::DEFAULT_TRANSCODER)]
    ffmpeg: PathBuf,

    /// Print the transcoder command and exit without running it
    #[arg(long)]
    print: bool,

    /// Capture transcoder output in rotating log files
    #[arg(long)]
    log: bool,

    /// Directory for the transcoder log files
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Rotate after this many megabytes
    #[arg(long, default_value_t = 100)]
    log_max_size: u32,

    /// Number of rotated log files to keep
    #[arg(long, default_value_t = 3)]
    log_max_backups: u32,

    /// Days to keep rotated files
    #[arg(long, default_value_t = 28)]
    log_max_age: u32,

    /// Compress rotated log files
    #[arg(long)]
    log_compress: bool,
}

impl Args {
    fn stream_config(&self) -> StreamConfig {
        StreamConfig::new(
            RetentionMode::from_keep_files(self.keep_files),
            self.audio,
            LoggingPolicy {
                enabled: self.log,
                directory: self.log_dir.clone(),
                max_size_mb: self.log_max_size,
                max_backups: self.log_max_backups,
                max_age_days: self.log_max_age,
                compress: self.log_compress,
            },
        )
    }

    /// Full transcoder command line for `--print`. Touches no files.
    fn command_line(&self, config: &StreamConfig) -> String {
        let spec = config.command(&self.output_dir, &self.uri);
        format!("{} {}", self.ffmpeg.display(), spec.args().join(" "))
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = Arc::new(args.stream_config());

    if config.logging.enabled {
        tracing::warn!(
            log_dir = %config.logging.directory.display(),
            "log rotation is handled by an external sink; transcoder output goes to this terminal"
        );
    }

    if args.print {
        println!("{}", args.command_line(&config));
        return ExitCode::SUCCESS;
    }

    let spawner = ProcessSpawner::new(config).with_program(&args.ffmpeg);
    let handle = match spawner.spawn(&args.output_dir, &args.uri) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Failed to prepare session: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut child = match handle.command().spawn() {
        Ok(child) => child,
        Err(e) => {
            eprintln!("Failed to start {}: {}", args.ffmpeg.display(), e);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "Writing {} — press Enter to stop",
        handle.playlist_path().display()
    );
    let mut input = String::new();
    if let Err(e) = io::stdin().read_line(&mut input) {
        tracing::warn!(error = %e, "stdin closed");
    }

    if let Err(e) = child.kill() {
        tracing::debug!(error = %e, "transcoder already exited");
    }
    match child.wait() {
        Ok(status) => tracing::info!(%status, "transcoder stopped"),
        Err(e) => tracing::warn!(error = %e, "failed to reap transcoder"),
    }

    ExitCode::SUCCESS
}
