//! Audio encoding behind an injectable trait
//!
//! The lossy export path goes through [`AudioEncoder`] so the exporter can be
//! tested against a fake; the production implementation wraps LAME.

use std::fs;
use std::path::Path;

use hound::{SampleFormat, WavReader};
use mp3lame_encoder::{Bitrate, Builder, FlushNoGap, InterleavedPcm, MonoPcm, Quality};

use crate::core::error::{Result, SceneError};

/// Transcoding capability consumed by the exporter
pub trait AudioEncoder: Send + Sync {
    /// Transcode the WAV at `source` into `destination`.
    ///
    /// Any codec session opened here must be released before returning,
    /// success or failure.
    fn encode(&self, source: &Path, destination: &Path) -> Result<()>;
}

/// MP3 encoder backed by LAME
pub struct LameMp3Encoder {
    bitrate: Bitrate,
}

impl Default for LameMp3Encoder {
    fn default() -> Self {
        Self {
            bitrate: Bitrate::Kbps192,
        }
    }
}

impl LameMp3Encoder {
    pub fn new(bitrate: Bitrate) -> Self {
        Self { bitrate }
    }
}

fn encoder_error(source: &Path, err: impl std::fmt::Display) -> SceneError {
    SceneError::Config {
        message: format!("MP3 encoding failed: {err}"),
        path: Some(source.to_path_buf()),
    }
}

impl AudioEncoder for LameMp3Encoder {
    fn encode(&self, source: &Path, destination: &Path) -> Result<()> {
        let mut reader = WavReader::open(source).map_err(|e| SceneError::Io {
            message: format!("failed to open source waveform: {e}"),
            path: Some(source.to_path_buf()),
        })?;
        let spec = reader.spec();

        if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
            return Err(SceneError::Config {
                message: format!(
                    "MP3 encoding expects 16-bit PCM input, found {} bit {}",
                    spec.bits_per_sample,
                    match spec.sample_format {
                        SampleFormat::Int => "int",
                        SampleFormat::Float => "float",
                    }
                ),
                path: Some(source.to_path_buf()),
            });
        }

        let samples: Vec<i16> = reader
            .samples::<i16>()
            .collect::<std::result::Result<_, _>>()?;

        let mut builder = Builder::new().ok_or_else(|| SceneError::Config {
            message: "failed to initialize the MP3 encoder".to_string(),
            path: None,
        })?;
        builder
            .set_num_channels(spec.channels as u8)
            .map_err(|e| encoder_error(source, e))?;
        builder
            .set_sample_rate(spec.sample_rate)
            .map_err(|e| encoder_error(source, e))?;
        builder
            .set_brate(self.bitrate)
            .map_err(|e| encoder_error(source, e))?;
        builder
            .set_quality(Quality::Best)
            .map_err(|e| encoder_error(source, e))?;
        let mut encoder = builder.build().map_err(|e| encoder_error(source, e))?;

        let mut mp3 = Vec::new();
        mp3.reserve(mp3lame_encoder::max_required_buffer_size(samples.len()));

        let written = match spec.channels {
            1 => encoder
                .encode(MonoPcm(&samples), mp3.spare_capacity_mut())
                .map_err(|e| encoder_error(source, e))?,
            2 => encoder
                .encode(InterleavedPcm(&samples), mp3.spare_capacity_mut())
                .map_err(|e| encoder_error(source, e))?,
            n => {
                return Err(SceneError::Config {
                    message: format!("MP3 encoding supports 1 or 2 channels, found {n}"),
                    path: Some(source.to_path_buf()),
                })
            }
        };
        // The encoder only initializes `written` bytes of the spare capacity.
        unsafe { mp3.set_len(mp3.len() + written) };

        let written = encoder
            .flush::<FlushNoGap>(mp3.spare_capacity_mut())
            .map_err(|e| encoder_error(source, e))?;
        unsafe { mp3.set_len(mp3.len() + written) };

        fs::write(destination, &mp3).map_err(|e| SceneError::Io {
            message: e.to_string(),
            path: Some(destination.to_path_buf()),
        })?;

        Ok(())
    }
}
