//! Transcoder argument construction.
//!
//! Turns a retention mode, an audio switch, an output directory and an RTSP
//! source URI into the exact ffmpeg argument list for one live session.
//!
//! ## Argument layout
//!
//! ffmpeg applies options to the next input or output that follows them, so
//! the order below is part of the contract:
//!
//! | Block | Arguments |
//! |-------|-----------|
//! | Input | `-y -fflags nobuffer -rtsp_transport tcp -i <uri>` |
//! | Encode | `-vsync 0 -c:v libx264 -crf 30 -preset fast -pix_fmt yuv420p -flags +cgop -g 50` |
//! | Fragmenting | `-movflags frag_keyframe+empty_moov` |
//! | Audio | `-an` (only when audio is disabled) |
//! | HLS muxer | `-hls_flags <retention> -f hls -segment_list_flags live -hls_time 1 -hls_list_size 5 -hls_delete_threshold 5 -hls_wrap 5` |
//! | Output | `-hls_segment_filename <dir>/%d.ts <dir>/index.m3u8` |
//!
//! The arguments are handed to the process directly, never through a shell,
//! so paths and URIs are not quoted or escaped.

use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::RetentionMode;

/// Segment file name pattern; `%d` is replaced with the segment index.
pub const SEGMENT_PATTERN: &str = "%d.ts";

/// Playlist file name inside the session output directory.
pub const PLAYLIST_NAME: &str = "index.m3u8";

/// Option that tells the transcoder to drop audio streams.
pub const DISABLE_AUDIO: &str = "-an";

const INPUT_PREAMBLE: [&str; 6] = [
    "-y",
    "-fflags",
    "nobuffer",
    "-rtsp_transport",
    "tcp",
    "-i",
];

const ENCODE_PARAMS: [&str; 16] = [
    "-vsync",
    "0",
    "-c:v",
    "libx264",
    "-crf",
    "30",
    "-preset",
    "fast",
    "-pix_fmt",
    "yuv420p",
    "-flags",
    "+cgop",
    "-g",
    "50",
    "-movflags",
    "frag_keyframe+empty_moov",
];

const MUXER_PARAMS: [&str; 13] = [
    "-f",
    "hls",
    "-segment_list_flags",
    "live",
    "-hls_time",
    "1",
    "-hls_list_size",
    "5",
    "-hls_delete_threshold",
    "5",
    "-hls_wrap",
    "5",
    "-hls_segment_filename",
];

/// Ordered argument list for one transcoder invocation.
///
/// Order is significant: ffmpeg binds options to the input or output they
/// precede. The list is never modified once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandSpec {
    args: Vec<String>,
}

impl CommandSpec {
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn into_args(self) -> Vec<String> {
        self.args
    }
}

impl<'a> IntoIterator for &'a CommandSpec {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.args.iter()
    }
}

/// Space-joined form for log lines, with URI credentials masked. Not
/// suitable for a shell.
impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&redact_userinfo(arg))?;
        }
        Ok(())
    }
}

/// Mask the `user:pass@` part of a URI for logging.
///
/// Strings without a `scheme://` prefix or without userinfo come back as is.
pub fn redact_userinfo(uri: &str) -> Cow<'_, str> {
    let Some(scheme_end) = uri.find("://") else {
        return Cow::Borrowed(uri);
    };
    let authority_start = scheme_end + 3;
    let rest = &uri[authority_start..];
    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());

    match rest[..authority_end].rfind('@') {
        Some(at) => Cow::Owned(format!("{}***{}", &uri[..authority_start], &rest[at..])),
        None => Cow::Borrowed(uri),
    }
}

// The directory goes in as given, separated by a literal `/`, so a trailing
// slash on the directory is kept.
fn in_dir(output_dir: &Path, name: &str) -> String {
    format!("{}/{}", output_dir.to_string_lossy(), name)
}

/// Segment filename template passed to `-hls_segment_filename`.
pub fn segment_template(output_dir: &Path) -> String {
    in_dir(output_dir, SEGMENT_PATTERN)
}

/// Playlist path, the final output argument.
pub fn playlist_path(output_dir: &Path) -> PathBuf {
    PathBuf::from(in_dir(output_dir, PLAYLIST_NAME))
}

/// Build the argument list for a live RTSP-to-HLS session.
///
/// Total over its inputs: the URI is passed through without validation and
/// the directory is used as given. No I/O happens here.
pub fn build_command(
    retention: RetentionMode,
    audio: bool,
    output_dir: &Path,
    uri: &str,
) -> CommandSpec {
    let mut args: Vec<String> =
        Vec::with_capacity(INPUT_PREAMBLE.len() + ENCODE_PARAMS.len() + MUXER_PARAMS.len() + 6);

    args.extend(INPUT_PREAMBLE.iter().map(|s| s.to_string()));
    args.push(uri.to_string());

    args.extend(ENCODE_PARAMS.iter().map(|s| s.to_string()));

    if !audio {
        args.push(DISABLE_AUDIO.to_string());
    }

    args.push("-hls_flags".to_string());
    args.push(retention.hls_flags().to_string());

    args.extend(MUXER_PARAMS.iter().map(|s| s.to_string()));
    args.push(segment_template(output_dir));
    args.push(in_dir(output_dir, PLAYLIST_NAME));

    tracing::trace!(
        output_dir = %output_dir.display(),
        uri = %redact_userinfo(uri),
        args = args.len(),
        "built transcoder arguments"
    );

    CommandSpec { args }
}
