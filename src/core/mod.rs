//! Core abstractions for the synthesis pipeline
//!
//! # Modules
//!
//! - `error`: Structured error handling for the whole pipeline

pub mod error;

pub use error::{Result, SceneError};
