//! Dialogue script model and loading
//!
//! A script is an ordered array of dialogue lines. Ordering is significant
//! and is preserved through synthesis, concatenation, and logging.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::core::error::{Result, SceneError};

/// Line identifier as it appears in the script: a number or a free-form tag
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LineId {
    Number(i64),
    Text(String),
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineId::Number(n) => write!(f, "{n}"),
            LineId::Text(s) => f.write_str(s),
        }
    }
}

/// One scripted utterance. Immutable once loaded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueLine {
    #[serde(default)]
    pub line_id: Option<LineId>,
    #[serde(default)]
    pub speaker: String,
    #[serde(default)]
    pub emotion: Option<String>,
    #[serde(default)]
    pub text: String,
    /// Pause after this line in milliseconds; zero or negative means unset
    #[serde(default)]
    pub pause_ms: Option<i64>,
}

impl DialogueLine {
    /// File stem for this line's audio artifact.
    ///
    /// A numeric id (or numeric string) is zero-padded to three digits, a
    /// non-numeric id is used verbatim, and an absent id falls back to the
    /// 1-based position in the script, also zero-padded.
    pub fn file_stem(&self, position: usize) -> String {
        match &self.line_id {
            Some(LineId::Number(n)) => format!("{n:03}"),
            Some(LineId::Text(raw)) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    format!("{position:03}")
                } else if let Ok(n) = trimmed.parse::<i64>() {
                    format!("{n:03}")
                } else {
                    trimmed.to_string()
                }
            }
            None => format!("{position:03}"),
        }
    }
}

/// Load a dialogue script from disk.
///
/// JSON is the primary format; a `.yaml`/`.yml` extension switches to YAML,
/// whose `#` comments make annotated scripts possible.
pub fn load_script(path: &Path) -> Result<Vec<DialogueLine>> {
    if !path.exists() {
        return Err(SceneError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let raw = fs::read_to_string(path).map_err(|e| SceneError::Io {
        message: e.to_string(),
        path: Some(path.to_path_buf()),
    })?;

    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    let lines = if is_yaml {
        serde_yaml::from_str(&raw).map_err(|e| SceneError::Config {
            message: format!("failed to parse dialogue script: {e}"),
            path: Some(path.to_path_buf()),
        })?
    } else {
        serde_json::from_str(&raw).map_err(|e| SceneError::Config {
            message: format!("failed to parse dialogue script: {e}"),
            path: Some(path.to_path_buf()),
        })?
    };

    Ok(lines)
}
