use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::screening::critique::CritiqueFormat;
use crate::screening::projects::ProjectCaptureMode;

const DEFAULT_EMBEDDING_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Unset means the in-memory store is used.
    pub database_url: Option<String>,
    pub placement_password: String,
    /// Unset means critiques are reported as unavailable.
    pub anthropic_api_key: Option<String>,
    pub llm_model: Option<String>,
    pub embedding_api_url: String,
    pub embedding_api_key: String,
    pub embedding_model: String,
    pub model_timeout: Duration,
    pub clamp_scores: bool,
    pub project_capture: ProjectCaptureMode,
    pub critique_format: CritiqueFormat,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            placement_password: require_env("PLACEMENT_PASSWORD")?,
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            llm_model: optional_env("LLM_MODEL"),
            embedding_api_url: optional_env("EMBEDDING_API_URL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_API_URL.to_string()),
            embedding_api_key: require_env("EMBEDDING_API_KEY")?,
            embedding_model: optional_env("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            model_timeout: Duration::from_secs(
                parse_env("MODEL_TIMEOUT_SECS", 60)
                    .context("MODEL_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            clamp_scores: parse_bool("CLAMP_SCORES", false)?,
            project_capture: match optional_env("PROJECT_CAPTURE").as_deref() {
                None | Some("rearm") => ProjectCaptureMode::Rearm,
                Some("first_section") => ProjectCaptureMode::FirstSectionOnly,
                Some(other) => {
                    bail!("PROJECT_CAPTURE must be 'rearm' or 'first_section', got '{other}'")
                }
            },
            critique_format: match optional_env("CRITIQUE_FORMAT").as_deref() {
                None | Some("text") => CritiqueFormat::Text,
                Some("structured") => CritiqueFormat::Structured,
                Some(other) => {
                    bail!("CRITIQUE_FORMAT must be 'text' or 'structured', got '{other}'")
                }
            },
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Treats empty values the same as unset ones.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => Ok(raw.trim().parse::<T>()?),
        None => Ok(default),
    }
}

fn parse_bool(key: &str, default: bool) -> Result<bool> {
    match optional_env(key).map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => bail!("{key} must be a boolean, got '{other}'"),
    }
}
