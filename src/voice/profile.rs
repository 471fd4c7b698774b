//! Resolved voice profile for one speaker

/// Fully resolved prosody and identity settings for one speaker.
///
/// Derived per line by merging a speaker-specific override over the
/// configuration defaults; never persisted on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceProfile {
    /// Stock voice name sent to the speech service
    pub voice_name: String,
    /// Speaking style, e.g. "cheerful"; a line's emotion takes precedence
    pub style: Option<String>,
    /// Style intensity; absent when unset anywhere in the configuration
    pub style_degree: Option<f64>,
    /// Prosody rate token, e.g. "+10%"
    pub rate: String,
    /// Prosody pitch token
    pub pitch: String,
    /// Prosody volume token
    pub volume: String,
    /// Tag appended to per-line artifact file names
    pub file_tag: String,
    /// Whether style wrapping is applied at all
    pub enable_style: bool,
    /// Personal-voice reference id; when set, style and pitch/volume tuning
    /// are suppressed and only rate applies
    pub speaker_profile_id: Option<String>,
}
