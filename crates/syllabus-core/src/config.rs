use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Key value shipped in sample configs; treated the same as no key at all.
pub const PLACEHOLDER_API_KEY: &str = "demo-key-placeholder";

const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings for the external text-generation service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// No key (or the placeholder) puts the service in demo mode
    pub api_key: Option<String>,
    pub model: String,
    /// `{model}` is substituted with `model`
    pub endpoint: String,
    pub timeout_secs: u64,
    /// Longer documents are cut down to this many characters before prompting
    pub max_content_chars: usize,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 45,
            max_content_chars: 25_000,
            temperature: 0.1,
            max_output_tokens: 8192,
        }
    }
}

impl AiConfig {
    #[must_use]
    pub fn is_demo_mode(&self) -> bool {
        self.api_key
            .as_deref()
            .map(str::trim)
            .map_or(true, |key| key.is_empty() || key == PLACEHOLDER_API_KEY)
    }

    #[must_use]
    pub fn endpoint_url(&self) -> String {
        self.endpoint.replace("{model}", &self.model)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub ai: AiConfig,
    /// Re-rate topic difficulty with the AI service after extraction
    pub enrich_difficulty: bool,
}

impl ExtractorConfig {
    /// Defaults, then config files, then environment.
    pub fn load() -> ConfigResult<Self> {
        let mut config = match find_config_file() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Loads `path`, then applies environment overrides.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_env() -> ConfigResult<Self> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overrides fields from `lookup`, which maps an environment variable
    /// name to its value.
    pub fn apply_env<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("SYLLABUS_AI_API_KEY").or_else(|| lookup("GEMINI_API_KEY")) {
            self.ai.api_key = Some(key);
        }
        if let Some(model) = lookup("SYLLABUS_AI_MODEL") {
            self.ai.model = model;
        }
        if let Some(endpoint) = lookup("SYLLABUS_AI_ENDPOINT") {
            self.ai.endpoint = endpoint;
        }
        if let Some(value) = lookup("SYLLABUS_AI_TIMEOUT_SECS") {
            self.ai.timeout_secs = value.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "SYLLABUS_AI_TIMEOUT_SECS",
                value,
            })?;
        }
        if let Some(value) = lookup("SYLLABUS_ENRICH_DIFFICULTY") {
            self.enrich_difficulty = value == "1" || value.eq_ignore_ascii_case("true");
        }
        Ok(())
    }
}

/// Platform config path: `<config_dir>/syllabus/config.toml`.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("syllabus").join("config.toml"))
}

/// `./.syllabus.toml` wins over the platform config.
fn find_config_file() -> Option<PathBuf> {
    let cwd = PathBuf::from(".syllabus.toml");
    if cwd.is_file() {
        return Some(cwd);
    }
    config_path().filter(|p| p.is_file())
}
