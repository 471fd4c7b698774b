//! Per-line synthesis orchestration and final track assembly
//!
//! Drives the sequential loop over the script: resolve profile, build
//! markup, invoke the engine, collect the artifact. Lines are processed
//! strictly in script order; a single failure aborts the run with no partial
//! track emitted.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::audio::{concatenate, export, AudioEncoder, ClipSegment, ExportFormat};
use crate::core::error::{Result, SceneError};
use crate::engine::SpeechSynthesizer;
use crate::log::SynthesisLogEntry;
use crate::script::DialogueLine;
use crate::ssml::SsmlBuilder;
use crate::voice::{VoiceConfig, VoiceProfile};

/// One synthesized line: the audio artifact plus everything needed for
/// concatenation and logging. Never mutated after creation.
#[derive(Debug, Clone)]
pub struct RenderedLine {
    pub line: DialogueLine,
    pub profile: VoiceProfile,
    pub wav_path: PathBuf,
    pub pause_ms: u64,
    pub ssml: String,
    pub duration: Duration,
}

/// Synthesize every dialogue line, in order, into `segment_dir`.
///
/// Validation failures and engine failures are fatal; the returned vector
/// always has exactly one entry per input line, in script order.
pub async fn render_script(
    engine: &dyn SpeechSynthesizer,
    config: &VoiceConfig,
    builder: &SsmlBuilder,
    lines: &[DialogueLine],
    segment_dir: &Path,
    allow_empty_lines: bool,
) -> Result<Vec<RenderedLine>> {
    fs::create_dir_all(segment_dir)?;

    let mut rendered = Vec::with_capacity(lines.len());
    for (index, line) in lines.iter().enumerate() {
        let position = index + 1;

        if line.speaker.trim().is_empty() {
            return Err(SceneError::Validation {
                message: "is missing a speaker name".to_string(),
                line: position,
            });
        }
        if line.text.trim().is_empty() && !allow_empty_lines {
            return Err(SceneError::Validation {
                message: "is missing text content".to_string(),
                line: position,
            });
        }

        let profile = config.resolve_profile(&line.speaker)?;
        let ssml = builder.build(&line.text, &profile, line.emotion.as_deref());

        let file_name = format!("{}_{}.wav", line.file_stem(position), profile.file_tag);
        let wav_path = segment_dir.join(file_name);

        debug!(
            speaker = %line.speaker,
            voice = %profile.voice_name,
            path = %wav_path.display(),
            "synthesizing line"
        );
        let duration = engine.synthesize(&ssml, &wav_path).await?;
        let pause_ms = config.resolve_pause(line.pause_ms);

        rendered.push(RenderedLine {
            line: line.clone(),
            profile,
            wav_path,
            pause_ms,
            ssml,
            duration,
        });
    }

    info!(lines = rendered.len(), "synthesis finished");
    Ok(rendered)
}

/// Merge the rendered lines into the final track and project the log
/// entries.
///
/// The merged waveform is assembled in a scratch file next to the
/// destination, exported, and removed; a successful run leaves only the
/// final track behind.
pub fn build_final_track(
    rendered: &[RenderedLine],
    final_path: &Path,
    format: ExportFormat,
    encoder: &dyn AudioEncoder,
) -> Result<Vec<SynthesisLogEntry>> {
    if rendered.is_empty() {
        return Err(SceneError::EmptyInput);
    }

    let parent = final_path.parent().unwrap_or_else(|| Path::new("."));
    let stem = final_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("track");
    let mix_path = parent.join(format!("{stem}__mix.wav"));

    let segments: Vec<ClipSegment> = rendered
        .iter()
        .map(|r| ClipSegment {
            path: r.wav_path.clone(),
            pause_ms: r.pause_ms,
        })
        .collect();
    concatenate(&segments, &mix_path)?;

    if let Err(err) = export(&mix_path, final_path, format, encoder) {
        let _ = fs::remove_file(&mix_path);
        return Err(err);
    }
    fs::remove_file(&mix_path).map_err(|e| SceneError::Io {
        message: format!("failed to remove scratch waveform: {e}"),
        path: Some(mix_path.clone()),
    })?;

    Ok(rendered.iter().map(log_entry).collect())
}

fn log_entry(rendered: &RenderedLine) -> SynthesisLogEntry {
    SynthesisLogEntry {
        line_id: rendered.line.line_id.as_ref().map(|id| id.to_string()),
        speaker: rendered.line.speaker.clone(),
        emotion: rendered.line.emotion.clone(),
        voice_name: rendered.profile.voice_name.clone(),
        style: rendered
            .line
            .emotion
            .clone()
            .or_else(|| rendered.profile.style.clone()),
        rate: rendered.profile.rate.clone(),
        pitch: rendered.profile.pitch.clone(),
        volume: rendered.profile.volume.clone(),
        duration_ms: (rendered.duration.as_secs_f64() * 1000.0).round() as u64,
        pause_ms: rendered.pause_ms,
        wav_path: rendered.wav_path.to_string_lossy().replace('\\', "/"),
    }
}
