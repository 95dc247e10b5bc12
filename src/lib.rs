//! Notes E2E Test Suite
//!
//! This crate exercises a running instance of the Notes web application
//! through two surfaces:
//! - its HTTP API, via a typed `reqwest` client
//! - its browser-rendered UI, via headless Chrome over the DevTools protocol
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 Scenario Specs (tests/*.rs)                  │
//! │   setup helpers → action under test → assert → teardown      │
//! ├──────────────────────────────────────────────────────────────┤
//! │  commands                                                    │
//! │    ├── register_user / log_in_user / create_note / ...       │
//! │    └── create_user_via_web / log_in_user_via_web / ...       │
//! ├───────────────────────────┬──────────────────────────────────┤
//! │  api::ApiClient           │  browser::UiSession              │
//! │    typed Envelope<T>      │    three-phase interactions      │
//! │    per-endpoint methods   │    (exist → scroll → displayed)  │
//! ├───────────────────────────┴──────────────────────────────────┤
//! │  fixtures::FixtureStore                                      │
//! │    testdata-<id>.json, one record per scenario run           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every scenario draws its own random scoping identifier, so concurrent
//! scenarios never share a fixture record. Nothing is retried anywhere:
//! helpers assert status and body shape synchronously and any deviation
//! fails the scenario.

pub mod api;
pub mod browser;
pub mod commands;
pub mod config;
pub mod data;
pub mod error;
pub mod fixtures;
pub mod wait;

pub use api::ApiClient;
pub use browser::{Target, UiSession};
pub use config::Config;
pub use error::{E2eError, E2eResult};
pub use fixtures::{random_scope_id, FixtureRecord, FixtureStore};
