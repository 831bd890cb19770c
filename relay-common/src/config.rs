//! Configuration management for the chat relay.
//!
//! The relay reads a single configuration file at `~/.chat-relay/config.json`.
//!
//! # Configuration Priority
//!
//! 1. Explicit config file values
//! 2. Environment variables (RELAY_* prefix)
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `RELAY_PORT` → service.port
//! - `RELAY_BIND_ADDRESS` → network.bind
//! - `RELAY_LOG_LEVEL` → observability.log_level
//! - `RELAY_FAQ_PATH` → faq.path
//! - `GROQ_API_KEY` → secrets.llm.groq

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".chat-relay"),
        |dirs| dirs.home_dir().join(".chat-relay"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Network / Service Configuration
// ============================================================================

/// Global network configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Bind address for the service.
    /// Default: "127.0.0.1" (local only); set to "0.0.0.0" for remote access
    #[serde(default = "default_bind_address")]
    pub bind: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind: default_bind_address(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".into()
}

/// Service port configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServiceConfig {
    /// Port number for the relay service
    #[serde(default)]
    pub port: Option<u16>,
}

// ============================================================================
// Secrets Configuration
// ============================================================================

/// Grouped secrets configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SecretsConfig {
    /// LLM provider API keys
    #[serde(default)]
    pub llm: LlmSecretsConfig,
}

/// LLM provider API keys.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LlmSecretsConfig {
    #[serde(default)]
    pub groq: Option<String>,
}

// ============================================================================
// LLM Configuration
// ============================================================================

/// Upstream completion API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model identifier sent to the completion API
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Completion API base URL
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_llm_model(),
            base_url: default_llm_base_url(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

fn default_llm_model() -> String {
    "llama-3.1-8b-instant".into()
}

fn default_llm_base_url() -> String {
    "https://api.groq.com".into()
}

fn default_llm_timeout() -> u64 {
    300
}

// ============================================================================
// FAQ Configuration
// ============================================================================

/// FAQ table configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqConfig {
    /// Path to the FAQ JSON file (keyword → answer mapping)
    #[serde(default = "default_faq_path")]
    pub path: PathBuf,
}

impl Default for FaqConfig {
    fn default() -> Self {
        Self {
            path: default_faq_path(),
        }
    }
}

fn default_faq_path() -> PathBuf {
    PathBuf::from("faq.json")
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Base log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log output format: "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure for the relay service.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Global network configuration (bind address)
    #[serde(default)]
    pub network: NetworkConfig,

    /// Service port configuration
    #[serde(default)]
    pub service: ServiceConfig,

    /// Grouped secrets (API keys)
    #[serde(default)]
    pub secrets: SecretsConfig,

    /// Upstream completion API configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// FAQ table configuration
    #[serde(default)]
    pub faq: FaqConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration with environment variable fallbacks.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("RELAY_PORT") {
            if let Ok(p) = port.parse() {
                self.service.port = Some(p);
            }
        }
        if let Ok(bind) = std::env::var("RELAY_BIND_ADDRESS") {
            self.network.bind = bind;
        }
        if let Ok(level) = std::env::var("RELAY_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Ok(path) = std::env::var("RELAY_FAQ_PATH") {
            self.faq.path = PathBuf::from(path);
        }
        if let Ok(key) = std::env::var("GROQ_API_KEY") {
            self.secrets.llm.groq = Some(key);
        }
    }

    /// Get the effective bind address.
    pub fn bind_address(&self) -> &str {
        &self.network.bind
    }

    /// Get the effective service port.
    pub fn port(&self) -> u16 {
        self.service.port.unwrap_or(8000)
    }

    /// Get the Groq API key, if configured.
    pub fn groq_api_key(&self) -> Option<&str> {
        self.secrets.llm.groq.as_deref()
    }
}
