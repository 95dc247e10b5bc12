//! Shared environment gating for scenario specs
//!
//! Scenarios need a live Notes instance (and, for browser suites, a local
//! Chrome). Each test resolves its environment through these helpers and
//! returns early with a log line when something is missing, so the suite
//! stays green on machines without the target configured.

#![allow(dead_code)]

use notes_e2e::{ApiClient, Config, FixtureStore, UiSession};
use tracing_subscriber::EnvFilter;

pub struct ApiEnv {
    pub api: ApiClient,
    pub store: FixtureStore,
}

pub struct WebEnv {
    pub api: ApiClient,
    pub store: FixtureStore,
    pub session: UiSession,
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// API client + fixture store, or None (skip) when BASE_API_URL is unset.
pub fn api_env() -> Option<ApiEnv> {
    init_tracing();
    match Config::from_env() {
        Ok(config) => Some(ApiEnv {
            api: ApiClient::new(&config.api_base_url),
            store: FixtureStore::new(&config.fixtures_dir),
        }),
        Err(e) => {
            eprintln!("skipping scenario: {e}");
            None
        }
    }
}

/// API env plus a launched browser session, or None (skip) when the app URL
/// or Chrome is unavailable.
pub async fn web_env() -> Option<WebEnv> {
    init_tracing();
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("skipping scenario: {e}");
            return None;
        }
    };
    let app_url = match config.app_base_url() {
        Ok(u) => u.to_string(),
        Err(e) => {
            eprintln!("skipping scenario: {e}");
            return None;
        }
    };
    let session = match UiSession::launch(&app_url).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("skipping scenario: browser unavailable: {e}");
            return None;
        }
    };
    Some(WebEnv {
        api: ApiClient::new(&config.api_base_url),
        store: FixtureStore::new(&config.fixtures_dir),
        session,
    })
}
