//! Azure Speech REST channel
//!
//! Posts SSML to the regional `cognitiveservices/v1` endpoint and writes the
//! returned RIFF audio to the requested artifact path. The reported duration
//! is measured from the written WAV header rather than estimated.

use std::fs;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use tracing::debug;

use crate::core::error::{Result, SceneError};
use crate::engine::traits::{EngineOutputFormat, SpeechCredentials, SpeechSynthesizer};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Azure Speech synthesis channel
#[derive(Debug)]
pub struct AzureSpeechEngine {
    client: Client,
    endpoint: String,
    output_format: EngineOutputFormat,
}

impl AzureSpeechEngine {
    /// Create a new channel from credentials resolved at startup.
    pub fn new(credentials: SpeechCredentials, output_format: EngineOutputFormat) -> Result<Self> {
        if credentials.api_key.trim().is_empty() || credentials.region.trim().is_empty() {
            return Err(SceneError::Config {
                message: "speech service credentials must not be empty".to_string(),
                path: None,
            });
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            "Ocp-Apim-Subscription-Key",
            credentials
                .api_key
                .parse::<HeaderValue>()
                .map_err(|e| SceneError::Config {
                    message: format!("invalid speech service API key: {e}"),
                    path: None,
                })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/ssml+xml"));

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .default_headers(headers)
            .build()
            .map_err(|e| SceneError::Config {
                message: format!("failed to create HTTP client: {e}"),
                path: None,
            })?;

        let endpoint = format!(
            "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
            credentials.region
        );

        Ok(Self {
            client,
            endpoint,
            output_format,
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for AzureSpeechEngine {
    async fn synthesize(&self, ssml: &str, output_path: &Path) -> Result<Duration> {
        if let Some(dir) = output_path.parent() {
            fs::create_dir_all(dir).map_err(|e| SceneError::Io {
                message: e.to_string(),
                path: Some(dir.to_path_buf()),
            })?;
        }

        debug!(endpoint = %self.endpoint, format = self.output_format.as_str(), "sending synthesis request");

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-Microsoft-OutputFormat", self.output_format.as_str())
            .body(ssml.to_string())
            .send()
            .await
            .map_err(|e| SceneError::Synthesis {
                message: format!("request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(SceneError::Synthesis {
                message: format!("speech service returned {status}: {}", body.trim()),
            });
        }

        let audio = response.bytes().await.map_err(|e| SceneError::Synthesis {
            message: format!("failed to read response body: {e}"),
        })?;
        if audio.is_empty() {
            return Err(SceneError::Synthesis {
                message: "speech service returned no audio".to_string(),
            });
        }

        fs::write(output_path, &audio).map_err(|e| SceneError::Io {
            message: e.to_string(),
            path: Some(output_path.to_path_buf()),
        })?;

        measure_wav_duration(output_path)
    }
}

/// Measure a WAV artifact's duration from its header.
pub fn measure_wav_duration(path: &Path) -> Result<Duration> {
    let reader = hound::WavReader::open(path).map_err(|e| SceneError::Synthesis {
        message: format!("engine produced unreadable audio at {}: {e}", path.display()),
    })?;
    let spec = reader.spec();
    let frames = reader.duration();
    Ok(Duration::from_secs_f64(f64::from(frames) / f64::from(spec.sample_rate)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_credentials_are_rejected() {
        let credentials = SpeechCredentials {
            api_key: "  ".to_string(),
            region: "japaneast".to_string(),
        };
        let err = AzureSpeechEngine::new(credentials, EngineOutputFormat::default()).unwrap_err();
        assert!(matches!(err, SceneError::Config { .. }));
    }

    #[test]
    fn test_endpoint_is_regional() {
        let credentials = SpeechCredentials {
            api_key: "key".to_string(),
            region: "japaneast".to_string(),
        };
        let engine = AzureSpeechEngine::new(credentials, EngineOutputFormat::default()).unwrap();
        assert_eq!(
            engine.endpoint,
            "https://japaneast.tts.speech.microsoft.com/cognitiveservices/v1"
        );
    }

    #[test]
    fn test_measure_wav_duration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for _ in 0..8000 {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();

        let duration = measure_wav_duration(&path).unwrap();
        assert_eq!(duration, Duration::from_millis(500));
    }
}
