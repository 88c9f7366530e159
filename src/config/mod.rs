use std::env;
use std::fmt;
use std::time::Duration;
use anyhow::{Result, Context};
use tracing::{info, warn};

use crate::services::completion::CompletionSettings;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

#[derive(Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub max_file_size_mb: usize,
    pub max_concurrent_requests: usize,
    pub request_timeout_seconds: u64,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub openai_temperature: f32,
}

// Hand-written so the credential never reaches the logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("max_file_size_mb", &self.max_file_size_mb)
            .field("max_concurrent_requests", &self.max_concurrent_requests)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("openai_api_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url)
            .field("openai_model", &self.openai_model)
            .field("openai_temperature", &self.openai_temperature)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let openai_api_key = lookup("OPENAI_API_KEY")
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .context("OPENAI_API_KEY must be set to a non-empty value")?;

        let config = Config {
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| {
                info!("SERVER_HOST not set, using default: 0.0.0.0");
                "0.0.0.0".to_string()
            }),
            server_port: Self::parse_var(&lookup, "SERVER_PORT", 8080)
                .context("Failed to parse SERVER_PORT")?,
            max_file_size_mb: Self::parse_var(&lookup, "MAX_FILE_SIZE_MB", 10)
                .context("Failed to parse MAX_FILE_SIZE_MB")?,
            max_concurrent_requests: Self::parse_var(&lookup, "MAX_CONCURRENT_REQUESTS", 10)
                .context("Failed to parse MAX_CONCURRENT_REQUESTS")?,
            request_timeout_seconds: Self::parse_var(&lookup, "REQUEST_TIMEOUT_SECONDS", 60)
                .context("Failed to parse REQUEST_TIMEOUT_SECONDS")?,
            openai_api_key,
            openai_base_url: lookup("OPENAI_BASE_URL")
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            openai_model: lookup("OPENAI_MODEL")
                .map(|model| model.trim().to_string())
                .filter(|model| !model.is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            openai_temperature: Self::parse_var(&lookup, "OPENAI_TEMPERATURE", DEFAULT_TEMPERATURE)
                .context("Failed to parse OPENAI_TEMPERATURE")?,
        };

        config.validate()?;

        info!("OPENAI_API_KEY present");
        info!("Configuration loaded successfully: {:?}", config);
        Ok(config)
    }

    fn parse_var<F, T>(lookup: &F, var_name: &str, default: T) -> Result<T>
    where
        F: Fn(&str) -> Option<String>,
        T: std::str::FromStr + Copy + std::fmt::Debug,
        T::Err: std::fmt::Display,
    {
        match lookup(var_name) {
            Some(val) => match val.trim().parse() {
                Ok(parsed) => Ok(parsed),
                Err(e) => {
                    warn!("Failed to parse {}: {} (using default: {:?})", var_name, e, default);
                    Ok(default)
                }
            },
            None => {
                info!("{} not set, using default: {:?}", var_name, default);
                Ok(default)
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.server_port == 0 {
            return Err(anyhow::anyhow!("SERVER_PORT must be greater than 0"));
        }
        if self.max_file_size_mb == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }
        if self.max_concurrent_requests == 0 {
            return Err(anyhow::anyhow!("MAX_CONCURRENT_REQUESTS must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("REQUEST_TIMEOUT_SECONDS must be greater than 0"));
        }
        if !(0.0..=2.0).contains(&self.openai_temperature) {
            return Err(anyhow::anyhow!("OPENAI_TEMPERATURE must be between 0.0 and 2.0"));
        }
        Ok(())
    }

    pub fn completion_settings(&self) -> CompletionSettings {
        CompletionSettings {
            api_key: self.openai_api_key.clone(),
            base_url: self.openai_base_url.clone(),
            model: self.openai_model.clone(),
            temperature: self.openai_temperature,
            timeout: Duration::from_secs(self.request_timeout_seconds),
        }
    }
}
