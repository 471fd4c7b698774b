//! Speech engine abstraction layer
//!
//! The external text-to-speech service is modeled as an injected capability
//! behind the [`SpeechSynthesizer`] trait so the orchestrator can be tested
//! against a deterministic fake. The production implementation is the Azure
//! Speech REST channel.

pub mod azure;
pub mod traits;

pub use azure::AzureSpeechEngine;
pub use traits::{EngineOutputFormat, SpeechCredentials, SpeechSynthesizer};
