//! # scenevoice
//!
//! Renders a scripted dialogue (ordered lines with speaker, emotion, and
//! optional pause) into a single mixed audio track plus a newline-delimited
//! JSON synthesis log.
//!
//! ## Pipeline
//!
//! ```text
//! dialogue lines
//!     │  resolve speaker → voice profile        (voice)
//!     │  render line → SSML document            (ssml)
//!     ▼
//! per-line synthesis via the speech engine      (engine, pipeline)
//!     ▼
//! WAV concatenation with silence padding        (audio)
//!     ▼
//! export to wav/mp3 + synthesis log             (audio, log)
//! ```
//!
//! The external text-to-speech service and the MP3 codec are injected
//! capabilities (`SpeechSynthesizer`, `AudioEncoder`), so the whole pipeline
//! can be exercised against deterministic fakes.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use scenevoice::engine::{AzureSpeechEngine, SpeechCredentials, EngineOutputFormat};
//! use scenevoice::pipeline::{render_script, build_final_track};
//!
//! let engine = AzureSpeechEngine::new(SpeechCredentials::from_env()?, EngineOutputFormat::default())?;
//! let rendered = render_script(&engine, &config, &builder, &lines, segment_dir, false).await?;
//! let entries = build_final_track(&rendered, final_path, format, &encoder)?;
//! ```

pub mod audio;
pub mod core;
pub mod engine;
pub mod log;
pub mod pipeline;
pub mod script;
pub mod ssml;
pub mod voice;

// Re-exports for convenience
pub use audio::{concatenate, export, AudioEncoder, ClipSegment, ExportFormat, LameMp3Encoder};
pub use crate::core::error::{Result, SceneError};
pub use engine::{AzureSpeechEngine, EngineOutputFormat, SpeechCredentials, SpeechSynthesizer};
pub use log::{append_entries, SynthesisLogEntry};
pub use pipeline::{build_final_track, render_script, RenderedLine};
pub use script::{load_script, DialogueLine, LineId};
pub use ssml::SsmlBuilder;
pub use voice::{VoiceConfig, VoiceProfile};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
