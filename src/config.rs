//! Runtime configuration.
//!
//! Values come from environment variables, optionally overridden by CLI flags:
//! - `VISION_AI_API_URL` - Base URL of the Vision AI API (required by commands
//!   that talk to the API)
//! - `VISION_AI_PAGE_SIZE` - Page size for list requests (default: 100)
//! - `VISION_AI_SESSION_FILE` - Where the session token is persisted
//!   (default: `<config dir>/vision-ai/session.json`)

use std::path::PathBuf;

use anyhow::{Context, Result};
use dirs::config_dir;

const APP_DIR: &str = "vision-ai";
const SESSION_FILE: &str = "session.json";

/// Default page size for paginated endpoints.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone)]
pub struct Config {
    /// API base URL without trailing slash.
    pub api_url: Option<String>,
    pub page_size: u32,
    pub session_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `api_url` takes precedence over `VISION_AI_API_URL` when given. A
    /// missing URL is only an error once [`Config::api_url`] is asked for it.
    pub fn from_env(api_url: Option<String>) -> Result<Self> {
        let api_url = api_url.or_else(|| std::env::var("VISION_AI_API_URL").ok());

        let page_size = match std::env::var("VISION_AI_PAGE_SIZE") {
            Ok(raw) => parse_page_size(&raw)?,
            Err(_) => DEFAULT_PAGE_SIZE,
        };

        let session_path = match std::env::var("VISION_AI_SESSION_FILE") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_session_path()?,
        };

        Ok(Self::new(api_url, page_size, session_path))
    }

    /// Create with explicit values.
    pub fn new(api_url: Option<String>, page_size: u32, session_path: PathBuf) -> Self {
        Self {
            api_url: api_url
                .map(|url| normalize_url(&url))
                .filter(|url| !url.is_empty()),
            page_size: page_size.max(1),
            session_path,
        }
    }

    /// The API base URL, for commands that talk to the API.
    pub fn api_url(&self) -> Result<&str> {
        self.api_url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("VISION_AI_API_URL is not set"))
    }
}

/// Trim trailing slashes so paths can be appended directly.
pub fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_page_size(raw: &str) -> Result<u32> {
    let size: u32 = raw
        .trim()
        .parse()
        .with_context(|| format!("Invalid VISION_AI_PAGE_SIZE '{}'", raw))?;
    if size == 0 {
        anyhow::bail!("VISION_AI_PAGE_SIZE must be at least 1");
    }
    Ok(size)
}

fn default_session_path() -> Result<PathBuf> {
    let mut path =
        config_dir().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    path.push(APP_DIR);
    path.push(SESSION_FILE);
    Ok(path)
}
