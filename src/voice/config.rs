//! Voice configuration loading and speaker resolution
//!
//! The configuration document has three sections: `defaults` (global
//! fallback values), `voices` (speaker → override, case-sensitive keys), and
//! `aliases` (alias → canonical speaker key). Unknown fields are ignored.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::core::error::{Result, SceneError};
use crate::voice::profile::VoiceProfile;

/// Global fallback values applied when a speaker override leaves a field unset
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoiceDefaults {
    /// Named speech-service output format; unrecognized values are fatal
    pub output_format: Option<String>,
    /// Default inter-line pause in milliseconds
    pub pause_ms: Option<i64>,
    /// Voice used for speakers with no mapping and no alias
    pub fallback_voice: Option<String>,
    pub rate: Option<String>,
    pub pitch: Option<String>,
    pub volume: Option<String>,
    pub style_degree: Option<f64>,
    pub enable_style: Option<bool>,
}

/// Per-speaker profile override
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoiceOverride {
    #[serde(default)]
    pub voice_name: String,
    pub style: Option<String>,
    pub style_degree: Option<f64>,
    pub rate: Option<String>,
    pub pitch: Option<String>,
    pub volume: Option<String>,
    pub file_tag: Option<String>,
    pub enable_style: Option<bool>,
    pub speaker_profile_id: Option<String>,
}

/// Voice configuration document; loaded once, read-only for the run
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoiceConfig {
    #[serde(default)]
    pub defaults: VoiceDefaults,
    #[serde(default)]
    pub voices: HashMap<String, VoiceOverride>,
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

/// Three-tier field resolution: override, else default, else literal.
/// Blank strings count as unset.
fn resolve_field(over: Option<&str>, default: Option<&str>, literal: &str) -> String {
    over.filter(|v| !v.trim().is_empty())
        .or_else(|| default.filter(|v| !v.trim().is_empty()))
        .unwrap_or(literal)
        .to_string()
}

impl VoiceConfig {
    /// Load the configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SceneError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let raw = fs::read_to_string(path).map_err(|e| SceneError::Io {
            message: e.to_string(),
            path: Some(path.to_path_buf()),
        })?;

        serde_yaml::from_str(&raw).map_err(|e| SceneError::Config {
            message: format!("failed to parse voice configuration: {e}"),
            path: Some(path.to_path_buf()),
        })
    }

    /// Resolve a speaker name to a fully specified voice profile.
    ///
    /// Lookup order: the voice map, then the alias map (retrying the voice
    /// map with the canonical name), then `defaults.fallback_voice` as a
    /// synthetic override carrying only the voice name. Each profile field is
    /// then merged independently: override value, else configuration default,
    /// else the literal default.
    pub fn resolve_profile(&self, speaker: &str) -> Result<VoiceProfile> {
        if speaker.trim().is_empty() {
            return Err(SceneError::Config {
                message: "speaker name must be provided".to_string(),
                path: None,
            });
        }

        let mut over = self.voices.get(speaker);
        if over.is_none() {
            if let Some(canonical) = self.aliases.get(speaker) {
                over = self.voices.get(canonical);
            }
        }

        let fallback;
        let over = match over {
            Some(found) => found,
            None => {
                let Some(voice) = self
                    .defaults
                    .fallback_voice
                    .as_deref()
                    .filter(|v| !v.trim().is_empty())
                else {
                    return Err(SceneError::MissingVoice {
                        speaker: speaker.to_string(),
                    });
                };
                fallback = VoiceOverride {
                    voice_name: voice.to_string(),
                    ..VoiceOverride::default()
                };
                &fallback
            }
        };

        let defaults = &self.defaults;
        Ok(VoiceProfile {
            voice_name: over.voice_name.clone(),
            style: over.style.clone(),
            style_degree: over.style_degree.or(defaults.style_degree),
            rate: resolve_field(over.rate.as_deref(), defaults.rate.as_deref(), "0%"),
            pitch: resolve_field(over.pitch.as_deref(), defaults.pitch.as_deref(), "0%"),
            volume: resolve_field(over.volume.as_deref(), defaults.volume.as_deref(), "0%"),
            file_tag: resolve_field(over.file_tag.as_deref(), None, "voice"),
            enable_style: over.enable_style.or(defaults.enable_style).unwrap_or(true),
            speaker_profile_id: over.speaker_profile_id.clone(),
        })
    }

    /// Resolve the pause after a line: the explicit value if positive, else
    /// the configured default if positive, else zero.
    pub fn resolve_pause(&self, explicit_ms: Option<i64>) -> u64 {
        match explicit_ms {
            Some(v) if v > 0 => v as u64,
            _ => match self.defaults.pause_ms {
                Some(v) if v > 0 => v as u64,
                _ => 0,
            },
        }
    }
}
