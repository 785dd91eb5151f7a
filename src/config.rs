//! Configuration for the construction sender
//!
//! Loaded from a TOML file with environment variable overrides; every field
//! has a fixed default so the sender runs against a local devnet service
//! out of the box. The pipeline receives this as an injected value, never
//! reads ambient process state itself.

use serde::{Deserialize, Serialize};

use crate::pipeline::PipelineError;

/// Top-level sender configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Construction service endpoint configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// External signer configuration
    #[serde(default)]
    pub signer: SignerConfig,

    /// Pipeline behavior (advisory steps, explorer link)
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the construction API (endpoint paths are appended)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Blockchain name in every network_identifier
    #[serde(default = "default_blockchain")]
    pub blockchain: String,

    /// Target network name (devnet, mainnet, ...)
    #[serde(default = "default_network")]
    pub network: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignerConfig {
    /// Signer command (resolved via PATH unless absolute)
    #[serde(default = "default_signer_command")]
    pub command: String,

    /// Signer invocation timeout in seconds
    #[serde(default = "default_signer_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Policy for the parse step on the unsigned transaction
    #[serde(default = "default_parse_policy")]
    pub parse_unsigned: AdvisoryPolicy,

    /// Policy for the parse step on the signed transaction
    #[serde(default = "default_parse_policy")]
    pub parse_signed: AdvisoryPolicy,

    /// Policy for the pre-submit hash step
    #[serde(default = "default_hash_policy")]
    pub hash: AdvisoryPolicy,

    /// Explorer base URL used to derive the final transaction link
    #[serde(default = "default_explorer_base_url")]
    pub explorer_base_url: String,
}

/// How the pipeline treats an advisory (diagnostic) step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryPolicy {
    /// Do not run the step at all
    Skip,
    /// Run it; log a warning on failure and continue
    Warn,
    /// Run it; treat failure like any mandatory step
    Fail,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:3000/construction".to_string()
}
fn default_blockchain() -> String {
    "mina".to_string()
}
fn default_network() -> String {
    "devnet".to_string()
}
fn default_request_timeout() -> u64 {
    30
}
fn default_signer_command() -> String {
    "signer.exe".to_string()
}
fn default_signer_timeout() -> u64 {
    60
}
fn default_parse_policy() -> AdvisoryPolicy {
    AdvisoryPolicy::Skip
}
fn default_hash_policy() -> AdvisoryPolicy {
    AdvisoryPolicy::Warn
}
fn default_explorer_base_url() -> String {
    "https://minascan.io".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            blockchain: default_blockchain(),
            network: default_network(),
            timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            command: default_signer_command(),
            timeout_secs: default_signer_timeout(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            parse_unsigned: default_parse_policy(),
            parse_signed: default_parse_policy(),
            hash: default_hash_policy(),
            explorer_base_url: default_explorer_base_url(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            signer: SignerConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self, PipelineError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::Config(format!("failed to read {path}: {e}")))?;
        toml::from_str(&content)
            .map_err(|e| PipelineError::Config(format!("failed to parse {path}: {e}")))
    }

    /// Load configuration with `.env` + environment variable overrides
    ///
    /// Recognized variables: `API_URL`, `NETWORK`, `MINA_SIGNER`.
    pub fn from_file_with_env(path: &str) -> Result<Self, PipelineError> {
        dotenvy::dotenv().ok();
        let mut config = if std::path::Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Overlay the recognized environment variables onto this configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("API_URL") {
            self.api.base_url = url;
        }
        if let Ok(network) = std::env::var("NETWORK") {
            self.api.network = network;
        }
        if let Ok(signer) = std::env::var("MINA_SIGNER") {
            self.signer.command = signer;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:3000/construction");
        assert_eq!(config.api.blockchain, "mina");
        assert_eq!(config.api.network, "devnet");
        assert_eq!(config.signer.command, "signer.exe");
        assert_eq!(config.pipeline.parse_unsigned, AdvisoryPolicy::Skip);
        assert_eq!(config.pipeline.hash, AdvisoryPolicy::Warn);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            network = "mainnet"

            [pipeline]
            parse_unsigned = "warn"
            hash = "fail"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.network, "mainnet");
        assert_eq!(config.api.base_url, "http://localhost:3000/construction");
        assert_eq!(config.pipeline.parse_unsigned, AdvisoryPolicy::Warn);
        assert_eq!(config.pipeline.hash, AdvisoryPolicy::Fail);
        assert_eq!(config.pipeline.parse_signed, AdvisoryPolicy::Skip);
    }
}
