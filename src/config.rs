//! Environment configuration for the suite
//!
//! Two base URLs point at the externally running target application. Both
//! are resolved up front so a missing value fails before any network action
//! is attempted.

use std::path::PathBuf;

use crate::error::{E2eError, E2eResult};

/// Environment variable naming the API base URL, e.g.
/// `https://practice.expandtesting.com/notes/api`.
pub const BASE_API_URL: &str = "BASE_API_URL";

/// Environment variable naming the application (UI) base URL, e.g.
/// `https://practice.expandtesting.com/notes/app`.
pub const BASE_APP_URL: &str = "BASE_APP_URL";

/// Optional override for where per-scenario fixture records are written.
pub const FIXTURES_DIR: &str = "NOTES_E2E_FIXTURES_DIR";

const DEFAULT_FIXTURES_DIR: &str = "tests/fixtures";

/// Resolved suite configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub app_base_url: Option<String>,
    pub fixtures_dir: PathBuf,
}

impl Config {
    /// Read configuration from the environment. `BASE_API_URL` is required;
    /// `BASE_APP_URL` is only required by browser suites, which demand it
    /// through [`Config::app_base_url`].
    pub fn from_env() -> E2eResult<Self> {
        let api_base_url = required_url(BASE_API_URL)?;
        let app_base_url = std::env::var(BASE_APP_URL)
            .ok()
            .map(|u| u.trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty());

        let fixtures_dir = std::env::var(FIXTURES_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_FIXTURES_DIR));

        Ok(Self {
            api_base_url,
            app_base_url,
            fixtures_dir,
        })
    }

    /// The application base URL, or a descriptive error for API+web suites
    /// run without one.
    pub fn app_base_url(&self) -> E2eResult<&str> {
        self.app_base_url.as_deref().ok_or_else(|| {
            E2eError::Env(format!(
                "{} is not set; browser scenarios need the application base URL",
                BASE_APP_URL
            ))
        })
    }
}

fn required_url(var: &str) -> E2eResult<String> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => Ok(v.trim_end_matches('/').to_string()),
        _ => Err(E2eError::Env(format!(
            "{} is not set; point it at the running Notes instance before running the suite",
            var
        ))),
    }
}
