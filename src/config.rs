use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ai::summarizer::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::ai::{GenerationParams, DEFAULT_MAX_CHARS};
use crate::error::{AppError, Result};
use crate::services::SmtpSettings;

const APP_DIR: &str = "meetsynth";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: String,

    pub groq_api_key: Option<String>,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Character budget for submitted text before it is truncated.
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "default_smtp_host")]
    pub host: String,

    #[serde(default = "default_smtp_port")]
    pub port: u16,

    pub user: Option<String>,
    pub pass: Option<String>,

    /// Sender address; falls back to `user`.
    pub from: Option<String>,
}

fn default_db_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR);
    std::fs::create_dir_all(&data_dir).ok();
    data_dir.join("summaries.db").to_string_lossy().to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_max_input_chars() -> usize {
    DEFAULT_MAX_CHARS
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_input_chars: default_max_input_chars(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            user: None,
            pass: None,
            from: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            groq_api_key: None,
            generation: GenerationConfig::default(),
            email: EmailConfig::default(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Config {
    /// Load the config file (writing a default one on first run), then apply
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    /// Override settings from the environment, read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("DB_PATH") {
            self.db_path = path;
        }
        if let Some(key) = lookup("GROQ_API_KEY") {
            self.groq_api_key = Some(key);
        }
        if let Some(host) = lookup("EMAIL_HOST") {
            self.email.host = host;
        }
        if let Some(port) = lookup("EMAIL_PORT") {
            self.email.port = port
                .trim()
                .parse()
                .map_err(|_| AppError::Config(format!("EMAIL_PORT is not a port: {}", port)))?;
        }
        if let Some(user) = lookup("EMAIL_USER") {
            self.email.user = Some(user);
        }
        if let Some(pass) = lookup("EMAIL_PASS") {
            self.email.pass = Some(pass);
        }
        if let Some(from) = lookup("EMAIL_FROM") {
            self.email.from = Some(from);
        }
        Ok(())
    }

    /// The API key, if one is actually set.
    pub fn groq_api_key(&self) -> Option<&str> {
        non_empty(&self.groq_api_key)
    }

    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            model: self.generation.model.clone(),
            temperature: self.generation.temperature,
            max_tokens: self.generation.max_tokens,
        }
    }
}

impl EmailConfig {
    /// SMTP settings, present only when both credentials are set.
    pub fn smtp_settings(&self) -> Option<SmtpSettings> {
        let user = non_empty(&self.user)?;
        let pass = non_empty(&self.pass)?;
        let from = non_empty(&self.from).unwrap_or(user);
        Some(SmtpSettings {
            host: self.host.clone(),
            port: self.port,
            user: user.to_string(),
            pass: pass.to_string(),
            from: from.to_string(),
        })
    }
}
