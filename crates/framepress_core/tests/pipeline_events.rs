//! End-to-end pipeline runs against stub ffmpeg/ffprobe executables.
//!
//! The stubs are small shell scripts that produce the artifacts each call
//! shape is expected to leave behind, so a full job can run without a real
//! ffmpeg install and the event stream can be asserted exactly.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use framepress_core::config::Settings;
use framepress_core::models::{CompressionLevel, JobSpec};
use framepress_core::orchestrator::JobRunner;
use framepress_core::progress::JobEvent;

const FFPROBE_STUB: &str = r#"#!/bin/sh
echo "30/1,3"
"#;

// Handles the three call shapes by their leading arguments:
// extract (-i .. -vf ..), per-frame (-i .. -q:v ..), assemble (-framerate ..).
const FFMPEG_STUB: &str = r#"#!/bin/sh
case "$1" in
-framerate)
    for last in "$@"; do :; done
    printf mp4 > "$last"
    ;;
-i)
    if [ "$3" = "-vf" ]; then
        dir=$(dirname "$5")
        i=1
        while [ "$i" -le 3 ]; do
            printf png > "$dir/$(printf 'frame%08d.png' "$i")"
            i=$((i + 1))
        done
        printf aac > "$8"
    else
        printf jpg > "$5"
    fi
    ;;
esac
exit 0
"#;

// Same as FFMPEG_STUB but the second frame conversion fails.
const FFMPEG_STUB_FRAME2_FAILS: &str = r#"#!/bin/sh
case "$1" in
-framerate)
    for last in "$@"; do :; done
    printf mp4 > "$last"
    ;;
-i)
    if [ "$3" = "-vf" ]; then
        dir=$(dirname "$5")
        i=1
        while [ "$i" -le 3 ]; do
            printf png > "$dir/$(printf 'frame%08d.png' "$i")"
            i=$((i + 1))
        done
        printf aac > "$8"
    else
        case "$2" in
        *frame00000002.png)
            echo "corrupt frame" >&2
            exit 1
            ;;
        esac
        printf jpg > "$5"
    fi
    ;;
esac
exit 0
"#;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

fn stub_settings(root: &Path, ffmpeg: &Path, ffprobe: &Path) -> Settings {
    let mut settings = Settings::default();
    settings.paths.temp_root = root.join("temp").to_string_lossy().into_owned();
    settings.paths.logs_folder = root.join("logs").to_string_lossy().into_owned();
    settings.tools.ffmpeg = ffmpeg.to_string_lossy().into_owned();
    settings.tools.ffprobe = ffprobe.to_string_lossy().into_owned();
    settings
}

#[test]
fn event_sequence_is_ordered_with_terminal_completed() {
    let root = TempDir::new().unwrap();
    let ffprobe = write_script(root.path(), "ffprobe", FFPROBE_STUB);
    let ffmpeg = write_script(root.path(), "ffmpeg", FFMPEG_STUB);

    let input = root.path().join("in.mp4");
    fs::write(&input, b"video bytes").unwrap();
    let output = root.path().join("out.mp4");
    let spec = JobSpec::new(&input, &output, CompressionLevel::best());

    let runner = JobRunner::new(stub_settings(root.path(), &ffmpeg, &ffprobe));
    let handle = runner.start(spec);

    let events: Vec<JobEvent> = handle.events().iter().collect();
    handle.join();

    // Exactly one terminal event, and nothing after it: the channel hung
    // up right behind it.
    let (terminal, progress) = events.split_last().unwrap();
    assert!(terminal.is_terminal());
    assert!(progress.iter().all(|e| !e.is_terminal()));

    let sequence: Vec<(u8, &str)> = progress
        .iter()
        .map(|e| match e {
            JobEvent::Progress(p) => (p.percent, p.label.as_str()),
            other => panic!("unexpected event before terminal: {:?}", other),
        })
        .collect();

    assert_eq!(
        sequence,
        vec![
            (0, "Processing"),
            (0, "Extracting frames"),
            (33, "Processing frame 1/3"),
            (66, "Processing frame 2/3"),
            (100, "Processing frame 3/3"),
            (100, "Combining frames"),
        ]
    );
    // Percent never decreases and ends at exactly 100.
    assert!(sequence.windows(2).all(|w| w[0].0 <= w[1].0));
    assert_eq!(sequence.last().unwrap().0, 100);

    match terminal {
        JobEvent::Completed { output_path } => assert_eq!(output_path, &output),
        other => panic!("expected Completed, got {:?}", other),
    }
    assert_eq!(fs::read(&output).unwrap(), b"mp4");
}

#[test]
fn failing_frame_aborts_without_output_or_leftovers() {
    let root = TempDir::new().unwrap();
    let ffprobe = write_script(root.path(), "ffprobe", FFPROBE_STUB);
    let ffmpeg = write_script(root.path(), "ffmpeg", FFMPEG_STUB_FRAME2_FAILS);

    let input = root.path().join("in.mp4");
    fs::write(&input, b"video bytes").unwrap();
    let output = root.path().join("out.mp4");
    let spec = JobSpec::new(&input, &output, CompressionLevel::best());

    let settings = stub_settings(root.path(), &ffmpeg, &ffprobe);
    let temp_root = PathBuf::from(&settings.paths.temp_root);

    let runner = JobRunner::new(settings);
    let handle = runner.start(spec);

    let events: Vec<JobEvent> = handle.events().iter().collect();
    handle.join();

    // Frame 1 completed and reported progress before frame 2 failed.
    assert!(events.iter().any(|e| matches!(
        e,
        JobEvent::Progress(p) if p.percent == 33 && p.label == "Processing frame 1/3"
    )));

    match events.last().unwrap() {
        JobEvent::Failed { error } => {
            assert_eq!(error.kind(), "frame_compression");
            assert_eq!(error.frame_index(), Some(2));
        }
        other => panic!("expected Failed, got {:?}", other),
    }

    // No partial output, and the workspace is gone.
    assert!(!output.exists());
    let leftovers: Vec<_> = fs::read_dir(&temp_root)
        .unwrap()
        .filter_map(|e| e.ok())
        .collect();
    assert!(leftovers.is_empty(), "leftover workspaces: {:?}", leftovers);
}
