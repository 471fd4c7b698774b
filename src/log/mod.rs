//! Synthesis log
//!
//! One newline-delimited JSON record per synthesized line, appended to a
//! persistent log. Prior content is never rewritten or reordered.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SceneError};

/// Flattened, JSON-serializable projection of one rendered line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisLogEntry {
    #[serde(rename = "lineId")]
    pub line_id: Option<String>,
    pub speaker: String,
    pub emotion: Option<String>,
    pub voice_name: String,
    pub style: Option<String>,
    pub rate: String,
    pub pitch: String,
    pub volume: String,
    pub duration_ms: u64,
    pub pause_ms: u64,
    pub wav_path: String,
}

/// Append `entries` to the log at `log_path`, one compact JSON object per
/// line, creating the file and its parent directory if absent.
pub fn append_entries(log_path: &Path, entries: &[SynthesisLogEntry]) -> Result<()> {
    if let Some(dir) = log_path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|e| SceneError::Io {
            message: e.to_string(),
            path: Some(log_path.to_path_buf()),
        })?;

    for entry in entries {
        let payload = serde_json::to_string(entry).map_err(|e| SceneError::Io {
            message: format!("failed to serialize log entry: {e}"),
            path: Some(log_path.to_path_buf()),
        })?;
        writeln!(file, "{payload}")?;
    }

    Ok(())
}
