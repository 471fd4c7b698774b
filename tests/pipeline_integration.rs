//! Integration tests for the dialogue synthesis pipeline
//!
//! Exercises the full flow - script loading, voice resolution, markup
//! construction, per-line synthesis, concatenation, export, and logging -
//! against a deterministic fake engine that returns fixed-length silent
//! clips.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use scenevoice::audio::{AudioEncoder, ExportFormat};
use scenevoice::core::error::{Result, SceneError};
use scenevoice::engine::SpeechSynthesizer;
use scenevoice::log::{append_entries, SynthesisLogEntry};
use scenevoice::pipeline::{build_final_track, render_script};
use scenevoice::script::load_script;
use scenevoice::ssml::SsmlBuilder;
use scenevoice::voice::VoiceConfig;

/// Fake speech engine producing fixed-length silent WAV clips
struct SilentEngine {
    frames: u32,
    sample_rate: u32,
    calls: AtomicUsize,
    requests: Mutex<Vec<String>>,
}

impl SilentEngine {
    fn new(frames: u32, sample_rate: u32) -> Self {
        Self {
            frames,
            sample_rate,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesizer for SilentEngine {
    async fn synthesize(&self, ssml: &str, output_path: &Path) -> Result<Duration> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(ssml.to_string());

        if let Some(dir) = output_path.parent() {
            fs::create_dir_all(dir)?;
        }
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(output_path, spec).map_err(|e| {
            SceneError::Synthesis {
                message: e.to_string(),
            }
        })?;
        for _ in 0..self.frames {
            writer.write_sample(0i16).map_err(|e| SceneError::Synthesis {
                message: e.to_string(),
            })?;
        }
        writer.finalize().map_err(|e| SceneError::Synthesis {
            message: e.to_string(),
        })?;

        Ok(Duration::from_secs_f64(
            f64::from(self.frames) / f64::from(self.sample_rate),
        ))
    }
}

struct NoopEncoder;

impl AudioEncoder for NoopEncoder {
    fn encode(&self, source: &Path, destination: &Path) -> Result<()> {
        fs::copy(source, destination)?;
        Ok(())
    }
}

fn write_two_line_scene(dir: &Path) -> (PathBuf, PathBuf) {
    let script_path = dir.join("scene1.json");
    fs::write(
        &script_path,
        r#"[
            {"speaker": "A", "text": "Hello", "pauseMs": 200},
            {"speaker": "B", "text": "World"}
        ]"#,
    )
    .unwrap();

    let voices_path = dir.join("voices.yaml");
    fs::write(
        &voices_path,
        r#"
defaults:
  fallback_voice: voiceY
voices:
  A:
    voice_name: voiceX
"#,
    )
    .unwrap();

    (script_path, voices_path)
}

#[tokio::test]
async fn test_two_line_scene_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let (script_path, voices_path) = write_two_line_scene(dir.path());

    let lines = load_script(&script_path).unwrap();
    let config = VoiceConfig::load(&voices_path).unwrap();
    // 8000 frames at 16 kHz: every clip is exactly 500 ms
    let engine = SilentEngine::new(8000, 16000);
    let builder = SsmlBuilder::new();

    let segment_dir = dir.path().join("out/scene1");
    let rendered = render_script(&engine, &config, &builder, &lines, &segment_dir, false)
        .await
        .unwrap();

    // One artifact per line, in script order, deterministically named
    assert_eq!(rendered.len(), 2);
    assert_eq!(rendered[0].profile.voice_name, "voiceX");
    assert_eq!(rendered[1].profile.voice_name, "voiceY");
    assert!(segment_dir.join("001_voice.wav").exists());
    assert!(segment_dir.join("002_voice.wav").exists());
    assert_eq!(rendered[0].pause_ms, 200);
    assert_eq!(rendered[1].pause_ms, 0);

    let requests = engine.requests.lock().unwrap();
    assert!(requests[0].contains("voiceX"));
    assert!(requests[1].contains("voiceY"));
    drop(requests);

    let final_path = dir.path().join("out/scene1_final.wav");
    let entries = build_final_track(&rendered, &final_path, ExportFormat::Wav, &NoopEncoder).unwrap();

    // duration(A) + 200 ms pause + duration(B) = 1.2 s at 16 kHz
    let reader = hound::WavReader::open(&final_path).unwrap();
    assert_eq!(reader.duration(), 8000 + 3200 + 8000);

    // The scratch mixdown is gone after a successful export
    assert!(!dir.path().join("out/scene1_final__mix.wav").exists());

    // Exactly one log entry per line, in script order
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].speaker, "A");
    assert_eq!(entries[0].duration_ms, 500);
    assert_eq!(entries[0].pause_ms, 200);
    assert_eq!(entries[1].voice_name, "voiceY");

    let log_path = dir.path().join("logs/synth_scene1.jsonl");
    append_entries(&log_path, &entries).unwrap();
    let content = fs::read_to_string(&log_path).unwrap();
    let parsed: Vec<SynthesisLogEntry> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].speaker, "A");
    assert_eq!(parsed[1].speaker, "B");
}

#[tokio::test]
async fn test_unresolvable_speaker_aborts_before_synthesis() {
    let dir = tempfile::tempdir().unwrap();
    let script_path = dir.path().join("scene.json");
    fs::write(
        &script_path,
        r#"[{"speaker": "Ghost", "text": "Boo"}]"#,
    )
    .unwrap();

    let lines = load_script(&script_path).unwrap();
    let config = VoiceConfig::default();
    let engine = SilentEngine::new(8000, 16000);
    let builder = SsmlBuilder::new();

    let err = render_script(
        &engine,
        &config,
        &builder,
        &lines,
        &dir.path().join("segments"),
        false,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, SceneError::MissingVoice { ref speaker } if speaker == "Ghost"));
    assert_eq!(engine.call_count(), 0);
}

#[tokio::test]
async fn test_validation_failure_is_fatal_and_names_the_line() {
    let dir = tempfile::tempdir().unwrap();
    let script_path = dir.path().join("scene.json");
    fs::write(
        &script_path,
        r#"[
            {"speaker": "A", "text": "Hello"},
            {"speaker": "", "text": "World"}
        ]"#,
    )
    .unwrap();
    let voices_path = dir.path().join("voices.yaml");
    fs::write(&voices_path, "defaults:\n  fallback_voice: voiceY\n").unwrap();

    let lines = load_script(&script_path).unwrap();
    let config = VoiceConfig::load(&voices_path).unwrap();
    let engine = SilentEngine::new(800, 16000);
    let builder = SsmlBuilder::new();

    let err = render_script(
        &engine,
        &config,
        &builder,
        &lines,
        &dir.path().join("segments"),
        false,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, SceneError::Validation { line: 2, .. }));
    // The first line was already synthesized; the failure is fail-fast, not
    // rollback, and no further synthesis happens.
    assert_eq!(engine.call_count(), 1);
}

#[tokio::test]
async fn test_empty_text_requires_opt_in() {
    let dir = tempfile::tempdir().unwrap();
    let script_path = dir.path().join("scene.json");
    fs::write(&script_path, r#"[{"speaker": "A", "text": ""}]"#).unwrap();
    let voices_path = dir.path().join("voices.yaml");
    fs::write(&voices_path, "defaults:\n  fallback_voice: voiceY\n").unwrap();

    let lines = load_script(&script_path).unwrap();
    let config = VoiceConfig::load(&voices_path).unwrap();
    let builder = SsmlBuilder::new();

    let engine = SilentEngine::new(800, 16000);
    let err = render_script(
        &engine,
        &config,
        &builder,
        &lines,
        &dir.path().join("segments"),
        false,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SceneError::Validation { line: 1, .. }));
    assert_eq!(engine.call_count(), 0);

    // With the opt-in, the line synthesizes as silence
    let engine = SilentEngine::new(800, 16000);
    let rendered = render_script(
        &engine,
        &config,
        &builder,
        &lines,
        &dir.path().join("segments"),
        true,
    )
    .await
    .unwrap();
    assert_eq!(rendered.len(), 1);
    assert_eq!(engine.call_count(), 1);
}

#[tokio::test]
async fn test_mismatched_clip_formats_fail_the_mixdown() {
    let dir = tempfile::tempdir().unwrap();
    let (script_path, voices_path) = write_two_line_scene(dir.path());

    let lines = load_script(&script_path).unwrap();
    let config = VoiceConfig::load(&voices_path).unwrap();
    let builder = SsmlBuilder::new();

    let engine = SilentEngine::new(8000, 16000);
    let segment_dir = dir.path().join("segments");
    let rendered = render_script(&engine, &config, &builder, &lines, &segment_dir, false)
        .await
        .unwrap();

    // Corrupt the second clip's format behind the pipeline's back
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 22050,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&rendered[1].wav_path, spec).unwrap();
    writer.write_sample(0i16).unwrap();
    writer.finalize().unwrap();

    let final_path = dir.path().join("final.wav");
    let err =
        build_final_track(&rendered, &final_path, ExportFormat::Wav, &NoopEncoder).unwrap_err();
    assert!(matches!(err, SceneError::FormatMismatch { index: 1, .. }));
    assert!(!final_path.exists());
}

#[test]
fn test_unsupported_export_format_leaves_no_destination() {
    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("final.flac");

    let err = ExportFormat::parse("flac").unwrap_err();
    assert!(matches!(err, SceneError::UnsupportedFormat { ref format } if format == "flac"));
    assert!(!destination.exists());
}
