//! Core trait and configuration types for speech engines

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::error::{Result, SceneError};

/// Contract for the external text-to-speech collaborator.
///
/// Implementations accept a markup document and an output file path, write
/// one audio artifact to that path, and report the measured duration of the
/// synthesized clip. Cancellation or engine failure is surfaced as
/// [`SceneError::Synthesis`] and aborts the whole run.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize one markup document into an audio artifact at `output_path`.
    async fn synthesize(&self, ssml: &str, output_path: &Path) -> Result<Duration>;
}

/// Credentials for the speech service, resolved once at startup and passed
/// into the engine constructor so core logic carries no implicit environment
/// dependency.
#[derive(Debug, Clone)]
pub struct SpeechCredentials {
    pub api_key: String,
    pub region: String,
}

impl SpeechCredentials {
    /// Read credentials from `AZURE_SPEECH_KEY` and `AZURE_SPEECH_REGION`.
    ///
    /// Missing or blank variables are a fatal configuration error, raised
    /// before any synthesis is attempted.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("AZURE_SPEECH_KEY").unwrap_or_default();
        let region = std::env::var("AZURE_SPEECH_REGION").unwrap_or_default();

        if api_key.trim().is_empty() || region.trim().is_empty() {
            return Err(SceneError::Config {
                message: "AZURE_SPEECH_KEY and AZURE_SPEECH_REGION environment variables must be set"
                    .to_string(),
                path: None,
            });
        }

        Ok(Self { api_key, region })
    }
}

/// Engine output audio format, selectable via `defaults.output_format`.
///
/// Restricted to RIFF (WAV) formats: the assembly stage performs no
/// resampling or transcoding, so compressed engine output would always fail
/// downstream. An unrecognized name is rejected at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineOutputFormat {
    Riff8Khz16BitMonoPcm,
    Riff16Khz16BitMonoPcm,
    Riff22050Hz16BitMonoPcm,
    Riff24Khz16BitMonoPcm,
    Riff44100Hz16BitMonoPcm,
    Riff48Khz16BitMonoPcm,
}

impl Default for EngineOutputFormat {
    fn default() -> Self {
        Self::Riff24Khz16BitMonoPcm
    }
}

impl EngineOutputFormat {
    /// Wire name used in the service's output-format header.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Riff8Khz16BitMonoPcm => "riff-8khz-16bit-mono-pcm",
            Self::Riff16Khz16BitMonoPcm => "riff-16khz-16bit-mono-pcm",
            Self::Riff22050Hz16BitMonoPcm => "riff-22050hz-16bit-mono-pcm",
            Self::Riff24Khz16BitMonoPcm => "riff-24khz-16bit-mono-pcm",
            Self::Riff44100Hz16BitMonoPcm => "riff-44100hz-16bit-mono-pcm",
            Self::Riff48Khz16BitMonoPcm => "riff-48khz-16bit-mono-pcm",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "riff-8khz-16bit-mono-pcm" => Some(Self::Riff8Khz16BitMonoPcm),
            "riff-16khz-16bit-mono-pcm" => Some(Self::Riff16Khz16BitMonoPcm),
            "riff-22050hz-16bit-mono-pcm" => Some(Self::Riff22050Hz16BitMonoPcm),
            "riff-24khz-16bit-mono-pcm" => Some(Self::Riff24Khz16BitMonoPcm),
            "riff-44100hz-16bit-mono-pcm" => Some(Self::Riff44100Hz16BitMonoPcm),
            "riff-48khz-16bit-mono-pcm" => Some(Self::Riff48Khz16BitMonoPcm),
            _ => None,
        }
    }
}
