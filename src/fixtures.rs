//! Fixture store - per-scenario persisted state
//!
//! Each scenario run accumulates entity state (credentials, auth token,
//! note identifiers) in one JSON file named after a random scoping
//! identifier. Persisting the record lets API-only and browser-driven steps
//! share state without a direct call chain between them. The store is a
//! narrow key-value interface: last write wins, merging is the caller's
//! responsibility (see [`FixtureStore::update`]).
//!
//! Records are exclusively owned by the scenario that created them; nothing
//! here is concurrency-safe beyond each scenario drawing its own id.

use std::path::PathBuf;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{E2eError, E2eResult};

/// The flat state record accumulated across a scenario's setup steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_completed: Option<bool>,
}

impl FixtureRecord {
    /// A required field, or an assertion failure naming it. Callers are
    /// expected to have run the setup step that populates the field.
    pub fn require<'a>(&self, field: &str, value: &'a Option<String>) -> E2eResult<&'a str> {
        value.as_deref().ok_or_else(|| {
            E2eError::AssertionFailed(format!(
                "fixture record is missing `{field}`; a prior setup step was skipped"
            ))
        })
    }

    pub fn token(&self) -> E2eResult<&str> {
        self.require("user_token", &self.user_token)
    }

    pub fn note_id(&self) -> E2eResult<&str> {
        self.require("note_id", &self.note_id)
    }
}

/// Keyed persisted records under one fixtures directory.
#[derive(Debug, Clone)]
pub struct FixtureStore {
    dir: PathBuf,
}

impl FixtureStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File path for a scoping identifier.
    pub fn path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("testdata-{id}.json"))
    }

    /// Persist `record` under `id`, overwriting any existing record.
    pub fn write(&self, id: &str, record: &FixtureRecord) -> E2eResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path(id);
        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(&path, json)?;
        debug!(id, path = %path.display(), "fixture record written");
        Ok(())
    }

    /// Read the record for `id`, failing if no prior step wrote one.
    pub fn read(&self, id: &str) -> E2eResult<FixtureRecord> {
        let path = self.path(id);
        let raw = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                E2eError::FixtureNotFound {
                    id: id.to_string(),
                    path: path.clone(),
                }
            } else {
                E2eError::Io(e)
            }
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Read-modify-write. The closure merges new fields into the record;
    /// the store itself stays last-write-wins.
    pub fn update(&self, id: &str, f: impl FnOnce(&mut FixtureRecord)) -> E2eResult<FixtureRecord> {
        let mut record = self.read(id)?;
        f(&mut record);
        self.write(id, &record)?;
        Ok(record)
    }

    /// Remove the record. Best-effort: cleanup after cleanup is normal, so
    /// an already-absent file is logged and swallowed.
    pub fn delete(&self, id: &str) -> E2eResult<()> {
        let path = self.path(id);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(id, path = %path.display(), "fixture record already absent");
                Ok(())
            }
            Err(e) => Err(E2eError::Io(e)),
        }
    }
}

/// Random 8-digit scoping identifier for one scenario run. There is no
/// collision avoidance; concurrent scenarios drawing the same value would
/// clash, matching the source suite's behavior.
pub fn random_scope_id() -> String {
    let mut rng = rand::thread_rng();
    (0..8).map(|_| rng.gen_range(0..10).to_string()).collect()
}
