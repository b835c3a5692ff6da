use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use reqwest::Url;

use crate::errors::AppError;
use crate::llm_client::{ClientSettings, DEFAULT_BASE_URL, DEFAULT_MODEL};

pub const DEFAULT_LOG_FILE: &str = "logs/resume_assessor.log";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Loads a supplementary env file before anything else reads the environment.
///
/// `DOTENV_PATH` names an explicit file and must load. Otherwise `LOAD_DOTENV`
/// set to `1`/`true`/`yes` loads `./.env` if one exists. Returns the file that
/// was loaded, if any.
pub fn load_dotenv() -> Result<Option<PathBuf>, AppError> {
    if let Some(path) = non_blank(std::env::var("DOTENV_PATH").ok()) {
        let path = PathBuf::from(path);
        dotenvy::from_path(&path).map_err(|e| {
            AppError::Configuration(format!(
                "failed to load DOTENV_PATH '{}': {e}",
                path.display()
            ))
        })?;
        return Ok(Some(path));
    }

    let requested = std::env::var("LOAD_DOTENV")
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);
    if requested {
        // A missing ./.env is not an error.
        return Ok(dotenvy::dotenv().ok());
    }
    Ok(None)
}

// ────────────────────────────────────────────────────────────────────────────
// Logging settings
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// `tracing` has no level above ERROR, so CRITICAL shares it.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARNING" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            "CRITICAL" => Ok(LogLevel::Critical),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

/// Logging configuration. Never fails: an unknown `LOG_LEVEL` falls back to
/// INFO and is reported once logging is up.
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub level: LogLevel,
    pub file: PathBuf,
    pub rejected_level: Option<String>,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let (level, rejected_level) = match non_blank(lookup("LOG_LEVEL")) {
            None => (LogLevel::default(), None),
            Some(raw) => match raw.parse::<LogLevel>() {
                Ok(level) => (level, None),
                Err(_) => (LogLevel::default(), Some(raw)),
            },
        };
        let file = non_blank(lookup("LOG_FILE"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

        Self {
            level,
            file,
            rejected_level,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Model configuration
// ────────────────────────────────────────────────────────────────────────────

/// Model configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub request_timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("openai_api_key", &"***")
            .field("openai_base_url", &self.openai_base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let openai_api_key = non_blank(lookup("OPENAI_API_KEY")).ok_or_else(|| {
            AppError::Configuration(
                "Required environment variable 'OPENAI_API_KEY' is not set. \
                 Set it in the environment or in the file named by DOTENV_PATH."
                    .to_string(),
            )
        })?;

        let model = non_blank(lookup("OPENAI_MODEL"))
            .map(|m| m.trim().to_string())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let temperature = parse_ranged(&lookup, "OPENAI_TEMPERATURE", 0.0, 0.0, 2.0)?;
        let top_p = parse_ranged(&lookup, "OPENAI_TOP_P", 1.0, 0.0, 1.0)?;

        let openai_base_url = non_blank(lookup("OPENAI_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();
        match Url::parse(&openai_base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => {
                return Err(AppError::Configuration(format!(
                    "OPENAI_BASE_URL must be an http(s) URL, got '{openai_base_url}'"
                )));
            }
        }

        let request_timeout = match non_blank(lookup("OPENAI_TIMEOUT_SECS")) {
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(AppError::Configuration(format!(
                        "OPENAI_TIMEOUT_SECS must be a positive integer, got '{raw}'"
                    )));
                }
            },
        };

        Ok(Config {
            openai_api_key,
            openai_base_url,
            model,
            temperature,
            top_p,
            request_timeout,
        })
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            api_key: self.openai_api_key.clone(),
            base_url: self.openai_base_url.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            top_p: self.top_p,
            timeout: self.request_timeout,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_ranged(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: f32,
    min: f32,
    max: f32,
) -> Result<f32, AppError> {
    let Some(raw) = non_blank(lookup(key)) else {
        return Ok(default);
    };
    match raw.trim().parse::<f32>() {
        Ok(value) if value.is_finite() && (min..=max).contains(&value) => Ok(value),
        _ => Err(AppError::Configuration(format!(
            "{key} must be a number between {min} and {max}, got '{raw}'"
        ))),
    }
}
