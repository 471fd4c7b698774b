//! Speech-markup rendering
//!
//! Renders one dialogue line plus its resolved voice profile into the SSML
//! document sent to the speech service. Output is compact and byte-stable:
//! identical inputs always produce identical markup, which keeps request
//! construction deterministic and testable.

use crate::voice::profile::VoiceProfile;

const SPEAK_NS: &str = "http://www.w3.org/2001/10/synthesis";
const MSTTS_NS: &str = "http://www.w3.org/2001/mstts";
const DEFAULT_LANGUAGE: &str = "ja-JP";

/// Escape a string for use in XML text or attribute values.
pub fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Builder for per-line SSML documents
#[derive(Debug, Clone)]
pub struct SsmlBuilder {
    language: String,
}

impl Default for SsmlBuilder {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl SsmlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the document language tag.
    pub fn with_language(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    /// Render one line of dialogue into a compact SSML document.
    ///
    /// Mode priority, mutually exclusive:
    /// 1. personal voice (`speaker_profile_id` set): `mstts:ttsembedding`,
    ///    style and pitch/volume suppressed, only rate applies;
    /// 2. style (`enable_style` and an effective style, where a non-empty
    ///    emotion overrides the profile style): `mstts:express-as` with an
    ///    optional one-decimal `styledegree`;
    /// 3. plain: the prosody element attaches directly to the voice element.
    ///
    /// Empty text is accepted and yields an empty prosody element; rejecting
    /// empty lines is the orchestrator's policy decision.
    pub fn build(&self, text: &str, profile: &VoiceProfile, emotion: Option<&str>) -> String {
        let personal_voice = profile
            .speaker_profile_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty());

        let effective_style = emotion
            .filter(|e| !e.trim().is_empty())
            .or_else(|| profile.style.as_deref().filter(|s| !s.trim().is_empty()));
        let use_style = !personal_voice && profile.enable_style && effective_style.is_some();

        let mut prosody = format!("<prosody rate=\"{}\"", escape_xml(&profile.rate));
        if !personal_voice {
            prosody.push_str(&format!(
                " pitch=\"{}\" volume=\"{}\"",
                escape_xml(&profile.pitch),
                escape_xml(&profile.volume)
            ));
        }
        prosody.push('>');
        prosody.push_str(&escape_xml(text));
        prosody.push_str("</prosody>");

        let content = if personal_voice {
            let id = profile.speaker_profile_id.as_deref().unwrap_or_default();
            format!(
                "<mstts:ttsembedding speakerProfileId=\"{}\">{}</mstts:ttsembedding>",
                escape_xml(id),
                prosody
            )
        } else if use_style {
            let style = effective_style.unwrap_or_default();
            let degree = profile
                .style_degree
                .map(|d| format!(" styledegree=\"{d:.1}\""))
                .unwrap_or_default();
            format!(
                "<mstts:express-as style=\"{}\"{}>{}</mstts:express-as>",
                escape_xml(style),
                degree,
                prosody
            )
        } else {
            prosody
        };

        let mstts_decl = if personal_voice || use_style {
            format!(" xmlns:mstts=\"{MSTTS_NS}\"")
        } else {
            String::new()
        };

        format!(
            "<speak version=\"1.0\" xml:lang=\"{}\" xmlns=\"{}\"{}><voice name=\"{}\">{}</voice></speak>",
            escape_xml(&self.language),
            SPEAK_NS,
            mstts_decl,
            escape_xml(&profile.voice_name),
            content
        )
    }
}
