//! Integration test: config → spawner → unstarted handle, for several
//! sessions sharing one configuration.
//!
//! Never executes ffmpeg; only the prepared directories and argument lists
//! are inspected.

use std::path::Path;
use std::sync::Arc;
use std::thread;

use rtsp_hls::{ProcessSpawner, RetentionMode, Spawn, StreamConfig};
use tempfile::TempDir;

#[test]
fn keep_all_with_audio_end_to_end() {
    let config = StreamConfig::default()
        .with_retention(RetentionMode::KeepAll)
        .with_audio(true);
    let spec = config.command(Path::new("/tmp/cam1"), "rtsp://host/stream");

    let expected: Vec<&str> = "-y -fflags nobuffer -rtsp_transport tcp -i rtsp://host/stream \
         -vsync 0 -c:v libx264 -crf 30 -preset fast -pix_fmt yuv420p -flags +cgop -g 50 \
         -movflags frag_keyframe+empty_moov -hls_flags append_list -f hls \
         -segment_list_flags live -hls_time 1 -hls_list_size 5 -hls_delete_threshold 5 \
         -hls_wrap 5 -hls_segment_filename /tmp/cam1/%d.ts /tmp/cam1/index.m3u8"
        .split_whitespace()
        .collect();

    assert_eq!(spec.args(), expected.as_slice());
}

#[test]
fn spawn_twice_into_same_directory() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("cam1");
    let spawner = ProcessSpawner::new(Arc::new(StreamConfig::default()));

    let first = spawner.spawn(&dir, "rtsp://host/stream").expect("first spawn");
    let second = spawner.spawn(&dir, "rtsp://host/stream").expect("second spawn");

    assert!(dir.is_dir());
    assert_eq!(first.command_spec(), second.command_spec());
}

#[test]
fn concurrent_sessions_share_one_config() {
    let tmp = TempDir::new().unwrap();
    let spawner: Arc<dyn Spawn> = Arc::new(ProcessSpawner::new(Arc::new(
        StreamConfig::default().with_retention(RetentionMode::DeleteConsumed),
    )));

    let workers: Vec<_> = (0..8)
        .map(|i| {
            let spawner = spawner.clone();
            let dir = tmp.path().join(format!("cam{i}"));
            thread::spawn(move || {
                let uri = format!("rtsp://10.0.0.{i}/stream");
                let handle = spawner.spawn(&dir, &uri).expect("spawn");
                (dir, uri, handle)
            })
        })
        .collect();

    for worker in workers {
        let (dir, uri, handle) = worker.join().expect("worker panicked");
        let args = handle.command_spec().args();

        assert!(dir.is_dir());
        assert_eq!(handle.output_dir(), dir.as_path());
        assert_eq!(args[6], uri);
        assert_eq!(
            args[args.len() - 1],
            dir.join("index.m3u8").to_string_lossy()
        );
        assert_eq!(args.iter().filter(|a| *a == "-an").count(), 1);
    }
}

#[test]
fn handle_command_writes_into_session_directory() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("nested").join("cam7");

    let handle = rtsp_hls::spawn(&StreamConfig::default(), &dir, "rtsp://cam7/live").unwrap();
    let cmd = handle.command();

    assert_eq!(cmd.get_current_dir(), None);
    assert_eq!(cmd.get_args().last(), Some(dir.join("index.m3u8").as_os_str()));
    assert_eq!(handle.playlist_path(), dir.join("index.m3u8"));
    assert!(!handle.playlist_path().exists(), "nothing should have run yet");
}
