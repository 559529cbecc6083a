use crate::errors::ConfigError;
use crate::pipeline::extract::ExtractMode;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_DB_PATH: &str = "history.db";
pub const DEFAULT_BIND: &str = "0.0.0.0:8000";
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 60;

#[derive(Clone)]
pub struct ServiceConfig {
    pub api_key: String,
    pub model: String,
    pub gemini_base_url: String,
    pub model_timeout_secs: u64,
    pub db_path: PathBuf,
    pub bind: String,
    pub extract_mode: ExtractMode,
    pub log_level: String,
}

// Keeps the credential out of startup logs.
impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("model_timeout_secs", &self.model_timeout_secs)
            .field("db_path", &self.db_path)
            .field("bind", &self.bind)
            .field("extract_mode", &self.extract_mode)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl ServiceConfig {
    /// Reads `.env` (if any) and then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_lookup(|k| env::var(k).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GOOGLE_API_KEY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingVar("GOOGLE_API_KEY"))?;

        let model_timeout_secs: u64 = match lookup("SCSC_MODEL_TIMEOUT_SECS") {
            Some(v) => v.trim().parse().map_err(|e| ConfigError::Invalid {
                var: "SCSC_MODEL_TIMEOUT_SECS",
                value: v.clone(),
                reason: format!("{}", e),
            })?,
            None => DEFAULT_MODEL_TIMEOUT_SECS,
        };

        let extract_mode = match lookup("SCSC_EXTRACTOR") {
            Some(v) => v.parse().map_err(|reason| ConfigError::Invalid {
                var: "SCSC_EXTRACTOR",
                value: v.clone(),
                reason,
            })?,
            None => ExtractMode::default(),
        };

        Ok(Self {
            api_key,
            model: lookup("SCSC_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: lookup("SCSC_GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            model_timeout_secs,
            db_path: lookup("SCSC_DB")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH)),
            bind: lookup("SCSC_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            extract_mode,
            log_level: lookup("SCSC_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn model_timeout(&self) -> Duration {
        Duration::from_secs(self.model_timeout_secs)
    }
}

/// Loads `.env` from the working directory; a missing file is not an error.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}
