//! Error types for the E2E suite

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Environment error: {0}")]
    Env(String),

    #[error("Fixture record not found for id {id} (expected at {path})")]
    FixtureNotFound { id: String, path: PathBuf },

    #[error("{endpoint} returned {actual}, expected {expected}: {message}")]
    UnexpectedStatus {
        endpoint: String,
        expected: u16,
        actual: u16,
        message: String,
    },

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CDP error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),
}

pub type E2eResult<T> = Result<T, E2eError>;
