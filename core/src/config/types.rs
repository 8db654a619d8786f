//! Minimal configuration types for stock-agent core
//!
//! Core only accepts fully resolved, validated configuration.
//! All discovery, loading, and merging happens in CLI layer.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Model used when neither the config file nor the environment names one
pub const DEFAULT_MODEL: &str = "llama3-groq-70b-8192-tool-use-preview";

/// Supported LLM protocols
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    /// Groq's OpenAI-compatible endpoint
    #[serde(rename = "groq")]
    Groq,
    /// OpenAI-compatible API (includes OpenAI, many proxies, local models)
    #[serde(rename = "openai_compat")]
    OpenAICompat,
    /// Custom protocol
    #[serde(rename = "custom")]
    Custom(String),
}

impl Protocol {
    /// Get the protocol name as a string
    pub fn as_str(&self) -> &str {
        match self {
            Protocol::Groq => "groq",
            Protocol::OpenAICompat => "openai",
            Protocol::Custom(name) => name,
        }
    }

    /// Get the default base URL for this protocol
    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            Protocol::Groq => Some("https://api.groq.com/openai/v1"),
            Protocol::OpenAICompat => Some("https://api.openai.com/v1"),
            Protocol::Custom(_) => None,
        }
    }

    /// Environment variable holding the credential for this protocol
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            Protocol::Groq => Some("GROQ_API_KEY"),
            Protocol::OpenAICompat => Some("OPENAI_API_KEY"),
            Protocol::Custom(_) => None,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "groq" => Protocol::Groq,
            "openai" | "openai_compat" => Protocol::OpenAICompat,
            _ => Protocol::Custom(s.to_string()),
        })
    }
}

/// Model parameters for LLM requests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelParams {
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Temperature for sampling (0.0 to 2.0)
    pub temperature: Option<f32>,
    /// Top-p sampling parameter
    pub top_p: Option<f32>,
}

/// A fully resolved LLM configuration ready for use by core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedLlmConfig {
    /// The protocol to use
    pub protocol: Protocol,
    /// Base URL for the API
    pub base_url: String,
    /// API key for authentication
    pub api_key: String,
    /// Model name/identifier
    pub model: String,
    /// Model parameters
    #[serde(default)]
    pub params: ModelParams,
    /// Additional headers for requests
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

impl ResolvedLlmConfig {
    /// Create a new resolved LLM config
    pub fn new(protocol: Protocol, base_url: String, api_key: String, model: String) -> Self {
        Self {
            protocol,
            base_url,
            api_key,
            model,
            params: ModelParams::default(),
            headers: HashMap::new(),
        }
    }

    /// Set model parameters
    pub fn with_params(mut self, params: ModelParams) -> Self {
        self.params = params;
        self
    }

    /// Add multiple headers
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.is_empty() {
            return Err("API key cannot be empty".to_string());
        }

        if self.model.is_empty() {
            return Err("Model name cannot be empty".to_string());
        }

        if self.base_url.is_empty() {
            return Err("Base URL cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("Base URL must start with http:// or https://".to_string());
        }

        if let Some(temp) = self.params.temperature {
            if !(0.0..=2.0).contains(&temp) {
                return Err("Temperature must be between 0.0 and 2.0".to_string());
            }
        }

        if let Some(top_p) = self.params.top_p {
            if !(0.0..=1.0).contains(&top_p) {
                return Err("Top-p must be between 0.0 and 1.0".to_string());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groq_config() -> ResolvedLlmConfig {
        ResolvedLlmConfig::new(
            Protocol::Groq,
            "https://api.groq.com/openai/v1".to_string(),
            "gsk_test".to_string(),
            DEFAULT_MODEL.to_string(),
        )
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(groq_config().validate().is_ok());
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let mut config = groq_config();
        config.api_key.clear();
        assert_eq!(config.validate().unwrap_err(), "API key cannot be empty");
    }

    #[test]
    fn test_base_url_scheme_required() {
        let mut config = groq_config();
        config.base_url = "api.groq.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sampling_ranges() {
        let config = groq_config().with_params(ModelParams {
            temperature: Some(2.5),
            ..Default::default()
        });
        assert!(config.validate().is_err());

        let config = groq_config().with_params(ModelParams {
            top_p: Some(1.5),
            ..Default::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_protocol_parsing() {
        assert_eq!("groq".parse::<Protocol>().unwrap(), Protocol::Groq);
        assert_eq!("OpenAI".parse::<Protocol>().unwrap(), Protocol::OpenAICompat);
        assert_eq!(
            "ollama".parse::<Protocol>().unwrap(),
            Protocol::Custom("ollama".to_string())
        );
        assert_eq!(
            Protocol::Groq.default_base_url(),
            Some("https://api.groq.com/openai/v1")
        );
        assert_eq!(Protocol::Groq.api_key_env(), Some("GROQ_API_KEY"));
    }
}
