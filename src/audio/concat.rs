//! WAV concatenation with silence padding
//!
//! Merges an ordered sequence of per-line clips into one continuous waveform.
//! The first clip's format is canonical; every later clip must match exactly.
//! No resampling or channel conversion is performed here.

use std::fs;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::core::error::{Result, SceneError};

/// One clip in the concatenation order, with the pause that follows it
#[derive(Debug, Clone)]
pub struct ClipSegment {
    pub path: PathBuf,
    /// Silence inserted after this clip, in milliseconds
    pub pause_ms: u64,
}

/// Merge `segments` in order into a single WAV at `destination`.
///
/// Formats are validated in a pre-pass, so a mismatch fails with
/// [`SceneError::FormatMismatch`] before anything is written to the
/// destination. The pause is honored after every clip, including the last.
pub fn concatenate(segments: &[ClipSegment], destination: &Path) -> Result<()> {
    if segments.is_empty() {
        return Err(SceneError::EmptyInput);
    }

    let mut specs = Vec::with_capacity(segments.len());
    for segment in segments {
        let reader = open_clip(&segment.path)?;
        specs.push(reader.spec());
    }

    let canonical = specs[0];
    for (index, spec) in specs.iter().enumerate().skip(1) {
        if *spec != canonical {
            return Err(SceneError::FormatMismatch {
                index,
                expected: describe_spec(&canonical),
                actual: describe_spec(spec),
            });
        }
    }

    if let Some(dir) = destination.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }

    let mut writer = WavWriter::create(destination, canonical)?;
    for segment in segments {
        append_clip(&mut writer, segment, canonical)?;
    }
    writer.finalize()?;

    Ok(())
}

fn open_clip(path: &Path) -> Result<WavReader<std::io::BufReader<fs::File>>> {
    WavReader::open(path).map_err(|e| SceneError::Io {
        message: format!("failed to open clip: {e}"),
        path: Some(path.to_path_buf()),
    })
}

fn append_clip<W: Write + Seek>(
    writer: &mut WavWriter<W>,
    segment: &ClipSegment,
    spec: WavSpec,
) -> Result<()> {
    let mut reader = open_clip(&segment.path)?;

    match spec.sample_format {
        SampleFormat::Int => {
            for sample in reader.samples::<i32>() {
                writer.write_sample(sample?)?;
            }
        }
        SampleFormat::Float => {
            for sample in reader.samples::<f32>() {
                writer.write_sample(sample?)?;
            }
        }
    }

    let frames = silence_frames(spec, segment.pause_ms);
    for _ in 0..frames {
        for _ in 0..spec.channels {
            match spec.sample_format {
                SampleFormat::Int => writer.write_sample(0i32)?,
                SampleFormat::Float => writer.write_sample(0.0f32)?,
            }
        }
    }

    Ok(())
}

/// Number of whole sample frames covering `pause_ms` of silence.
///
/// The byte count is `round(pause_ms * average_bytes_per_second / 1000)`,
/// half away from zero, truncated down to a multiple of the block alignment
/// so the written region starts and ends on frame boundaries.
fn silence_frames(spec: WavSpec, pause_ms: u64) -> u64 {
    let block_align = u64::from(spec.channels) * u64::from(spec.bits_per_sample / 8);
    if block_align == 0 || pause_ms == 0 {
        return 0;
    }
    let byte_rate = u64::from(spec.sample_rate) * block_align;
    let mut bytes = (pause_ms as f64 * byte_rate as f64 / 1000.0).round() as u64;
    bytes -= bytes % block_align;
    bytes / block_align
}

fn describe_spec(spec: &WavSpec) -> String {
    let format = match spec.sample_format {
        SampleFormat::Int => "int",
        SampleFormat::Float => "float",
    };
    format!(
        "{} Hz, {} ch, {} bit {format}",
        spec.sample_rate, spec.channels, spec.bits_per_sample
    )
}
