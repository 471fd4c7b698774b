//! Voice Module
//!
//! Maps speaker names from the script onto fully resolved voice profiles:
//! - `profile`: the resolved per-line voice settings
//! - `config`: the voices/aliases/defaults document and its resolution rules

pub mod config;
pub mod profile;

pub use config::{VoiceConfig, VoiceDefaults, VoiceOverride};
pub use profile::VoiceProfile;
