//! Shared fixtures for Vigil tests: golden JSON scenarios, record builders,
//! and scripted delivery channels.
//!
//! Everything here panics on bad input; it is only ever used from tests.

pub mod builders;
pub mod channels;

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Deserialize;

pub use builders::*;
pub use channels::{FlakyChannel, RecordingChannel, StallingChannel};

/// Root of the bundled fixture data.
pub fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// A questionnaire with its expected classification.
#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentScenario {
    pub description: String,
    pub responses: std::collections::BTreeMap<String, u8>,
    pub expected_composite: f64,
    pub expected_tier: String,
    pub expected_urgency: String,
}

/// A memory at a given age with the decay outcome it should produce.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryScenario {
    pub description: String,
    pub memory_type: vigil_core::models::MemoryType,
    pub name: String,
    pub recall_strength: f64,
    pub emotional_weight: f64,
    pub importance: f64,
    pub days_since_access: i64,
    pub expected_recommended: bool,
    pub expected_intervention: vigil_core::models::InterventionType,
}

/// `assessments/<name>.json`.
pub fn assessment_scenario(name: &str) -> AssessmentScenario {
    load_fixture(&format!("assessments/{name}.json"))
}

/// `memories/<name>.json`.
pub fn memory_scenario(name: &str) -> MemoryScenario {
    load_fixture(&format!("memories/{name}.json"))
}
