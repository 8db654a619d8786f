//! CLI configuration loader for stock-agent
//!
//! Implements single-source priority loading with flag overrides:
//! 1. --config file/dir (highest priority)
//! 2. Current working directory: ./stock-agent.json or ./.stock-agent/config.json
//! 3. XDG config: $XDG_CONFIG_HOME/stock-agent/config.json or ~/.config/stock-agent/config.json
//! 4. Environment variables only (no files)

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use stock_agent_core::config::DEFAULT_MODEL;
use stock_agent_core::quote::yahoo::YAHOO_BASE_URL;
use stock_agent_core::{ModelParams, Protocol, ResolvedLlmConfig};

/// Environment variable selecting the protocol in env-only mode
pub const PROTOCOL_ENV: &str = "STOCK_AGENT_PROTOCOL";
/// Environment variable overriding the model in env-only mode
pub const MODEL_ENV: &str = "STOCK_AGENT_MODEL";
/// Environment variable overriding the model endpoint in env-only mode
pub const BASE_URL_ENV: &str = "STOCK_AGENT_BASE_URL";
/// Environment variable overriding the quote host in every mode
pub const QUOTE_URL_ENV: &str = "STOCK_AGENT_QUOTE_URL";

const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";

fn default_protocol() -> String {
    Protocol::Groq.as_str().to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

/// Raw configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawConfig {
    /// Protocol to use ("groq" or "openai")
    #[serde(default = "default_protocol")]
    pub protocol: String,
    /// API key (can be "env:VAR_NAME" for environment variable)
    pub api_key: String,
    /// Base URL (optional, uses protocol default if not specified)
    pub base_url: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub params: ModelParams,
    /// Additional headers sent with every model request
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Quote provider host (optional, Yahoo Finance by default)
    #[serde(default)]
    pub quote_base_url: Option<String>,
}

/// Everything the front ends need to build an agent
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm: ResolvedLlmConfig,
    pub quote_base_url: String,
}

/// CLI configuration loader
#[derive(Default)]
pub struct CliConfigLoader {
    /// Override config file/directory path
    config_override: Option<PathBuf>,
    /// Flag overrides
    protocol_override: Option<String>,
    api_key_override: Option<String>,
    base_url_override: Option<String>,
    model_override: Option<String>,
}

impl CliConfigLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Set config file/directory override
    pub fn with_config_override(mut self, path: PathBuf) -> Self {
        self.config_override = Some(path);
        self
    }

    /// Set protocol override
    pub fn with_protocol_override(mut self, protocol: String) -> Self {
        self.protocol_override = Some(protocol);
        self
    }

    /// Set API key override
    pub fn with_api_key_override(mut self, api_key: String) -> Self {
        self.api_key_override = Some(api_key);
        self
    }

    /// Set base URL override
    pub fn with_base_url_override(mut self, base_url: String) -> Self {
        self.base_url_override = Some(base_url);
        self
    }

    /// Set model override
    pub fn with_model_override(mut self, model: String) -> Self {
        self.model_override = Some(model);
        self
    }

    /// Load and resolve configuration
    pub async fn load(&self) -> Result<AppConfig> {
        // Step 1: Find and load base configuration
        let mut config = match self.find_config_file().await? {
            Some(config) => config,
            None => raw_from_env(
                |name| std::env::var(name).ok(),
                self.protocol_override.as_deref(),
                self.api_key_override.as_deref(),
            )?,
        };

        // Step 2: Apply flag overrides
        if let Some(protocol) = &self.protocol_override {
            config.protocol = protocol.clone();
        }
        if let Some(api_key) = &self.api_key_override {
            config.api_key = api_key.clone();
        }
        if let Some(base_url) = &self.base_url_override {
            config.base_url = Some(base_url.clone());
        }
        if let Some(model) = &self.model_override {
            config.model = model.clone();
        }

        // Step 3: Resolve to final config
        let quote_base_url = resolve_quote_url(config.quote_base_url.clone());
        let llm = resolve_config(config)?;
        Ok(AppConfig {
            llm,
            quote_base_url,
        })
    }

    /// Quote host only; needs neither a config file nor an API key
    pub async fn load_quote_base_url(&self) -> Result<String> {
        let from_file = self
            .find_config_file()
            .await?
            .and_then(|config| config.quote_base_url);
        Ok(resolve_quote_url(from_file))
    }

    /// Override path, or the first config file found in priority order
    async fn find_config_file(&self) -> Result<Option<RawConfig>> {
        if let Some(override_path) = &self.config_override {
            let config = load_from_path(override_path).await.with_context(|| {
                format!(
                    "Failed to load config from override path: {}",
                    override_path.display()
                )
            })?;
            return Ok(Some(config));
        }

        let cwd = std::env::current_dir()?;
        let candidates = [
            Some(cwd.join("stock-agent.json")),
            Some(cwd.join(".stock-agent").join("config.json")),
            xdg_config_dir().map(|dir| dir.join("stock-agent").join("config.json")),
        ];

        for path in candidates.into_iter().flatten() {
            if path.is_file() {
                tracing::debug!("Using config file {}", path.display());
                return Ok(Some(load_file(&path).await?));
            }
        }

        Ok(None)
    }
}

/// Build a config without a file, from flags and environment variables
///
/// A flag-supplied key is used for the requested protocol (Groq when none
/// was requested). Otherwise `GROQ_API_KEY` wins when both credentials are
/// present and no protocol was requested.
pub fn raw_from_env<F>(
    lookup: F,
    protocol_override: Option<&str>,
    api_key_override: Option<&str>,
) -> Result<RawConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let groq_key = lookup("GROQ_API_KEY").filter(|k| !k.is_empty());
    let openai_key = lookup("OPENAI_API_KEY").filter(|k| !k.is_empty());

    let env_protocol = lookup(PROTOCOL_ENV);
    let preference = protocol_override
        .map(str::to_string)
        .or(env_protocol)
        .map(|p| p.parse::<Protocol>().unwrap_or_else(|e| match e {}));

    let flag_key = api_key_override.filter(|k| !k.is_empty()).map(str::to_string);

    let (protocol, api_key) = match (preference, groq_key, openai_key) {
        (preference, _, _) if flag_key.is_some() => {
            (preference.unwrap_or(Protocol::Groq), flag_key.unwrap_or_default())
        }
        (Some(Protocol::Groq) | None, Some(key), _) => (Protocol::Groq, key),
        (Some(Protocol::OpenAICompat) | None, _, Some(key)) => (Protocol::OpenAICompat, key),
        (Some(protocol), _, _) => {
            return Err(anyhow!(
                "Protocol '{}' specified but no corresponding API key found",
                protocol
            ))
        }
        (None, None, None) => {
            return Err(anyhow!(
                "No configuration found. Please create a stock-agent.json file or set GROQ_API_KEY"
            ))
        }
    };

    let default_model = match protocol {
        Protocol::OpenAICompat => OPENAI_DEFAULT_MODEL,
        _ => DEFAULT_MODEL,
    };

    Ok(RawConfig {
        protocol: protocol.as_str().to_string(),
        api_key,
        base_url: lookup(BASE_URL_ENV),
        model: lookup(MODEL_ENV).unwrap_or_else(|| default_model.to_string()),
        params: ModelParams::default(),
        headers: HashMap::new(),
        quote_base_url: None,
    })
}

/// Environment beats the config file; Yahoo is the fallback
fn resolve_quote_url(from_file: Option<String>) -> String {
    std::env::var(QUOTE_URL_ENV)
        .ok()
        .filter(|url| !url.is_empty())
        .or(from_file)
        .unwrap_or_else(|| YAHOO_BASE_URL.to_string())
}

/// Load configuration from a specific path (file or directory)
async fn load_from_path(path: &Path) -> Result<RawConfig> {
    if path.is_file() {
        load_file(path).await
    } else if path.is_dir() {
        let config_file = path.join("config.json");
        if config_file.exists() {
            load_file(&config_file).await
        } else {
            Err(anyhow!(
                "No config.json found in directory: {}",
                path.display()
            ))
        }
    } else {
        Err(anyhow!("Config path does not exist: {}", path.display()))
    }
}

/// Load a single config file
async fn load_file(path: &Path) -> Result<RawConfig> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Get XDG config directory
fn xdg_config_dir() -> Option<PathBuf> {
    match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg_config) if !xdg_config.is_empty() => Some(PathBuf::from(xdg_config)),
        _ => dirs::home_dir().map(|home| home.join(".config")),
    }
}

/// Resolve raw config to ResolvedLlmConfig
fn resolve_config(config: RawConfig) -> Result<ResolvedLlmConfig> {
    let protocol: Protocol = config.protocol.parse().unwrap_or_else(|e| match e {});
    if let Protocol::Custom(name) = &protocol {
        return Err(anyhow!(
            "Unsupported protocol '{}'. Use \"groq\" or \"openai\"",
            name
        ));
    }

    // Resolve API key (handle env: prefix)
    let api_key = match config.api_key.strip_prefix("env:") {
        Some(var_name) => std::env::var(var_name)
            .with_context(|| format!("Environment variable not found: {}", var_name))?,
        None => config.api_key,
    };

    let base_url = match config.base_url {
        Some(base_url) => base_url,
        None => protocol
            .default_base_url()
            .ok_or_else(|| anyhow!("No base URL for protocol '{}'", protocol))?
            .to_string(),
    };

    let resolved = ResolvedLlmConfig::new(protocol, base_url, api_key, config.model)
        .with_params(config.params)
        .with_headers(config.headers);

    resolved
        .validate()
        .map_err(|e| anyhow!("Configuration validation failed: {}", e))?;

    Ok(resolved)
}
