//! Export of the merged waveform to the requested container

use std::fs;
use std::path::Path;

use crate::audio::encoder::AudioEncoder;
use crate::core::error::{Result, SceneError};

/// Supported export containers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Verbatim byte copy, lossless
    Wav,
    /// Lossy transcode via the injected encoder
    Mp3,
}

impl ExportFormat {
    /// Parse a user-supplied format token. Unrecognized values fail with
    /// [`SceneError::UnsupportedFormat`] before any filesystem effect.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "wav" => Ok(Self::Wav),
            "mp3" => Ok(Self::Mp3),
            _ => Err(SceneError::UnsupportedFormat {
                format: raw.trim().to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
        }
    }
}

/// Copy or transcode `source` into `destination`, creating missing
/// destination directories first.
pub fn export(
    source: &Path,
    destination: &Path,
    format: ExportFormat,
    encoder: &dyn AudioEncoder,
) -> Result<()> {
    if !source.exists() {
        return Err(SceneError::NotFound {
            path: source.to_path_buf(),
        });
    }

    if let Some(dir) = destination.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }

    match format {
        ExportFormat::Wav => {
            fs::copy(source, destination).map_err(|e| SceneError::Io {
                message: e.to_string(),
                path: Some(destination.to_path_buf()),
            })?;
            Ok(())
        }
        ExportFormat::Mp3 => encoder.encode(source, destination),
    }
}
