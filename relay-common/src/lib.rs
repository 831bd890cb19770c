//! Relay Common - Shared types, configuration, and logging for the chat relay.
//!
//! This crate provides:
//! - Configuration types and loading with environment overrides
//! - The error taxonomy shared by the relay service
//! - Logging setup

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;

pub use config::{Config, FaqConfig, LlmConfig, ObservabilityConfig};
pub use error::{Error, Result};
pub use logging::init_logging;
