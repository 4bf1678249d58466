use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::wheels::models::Wheel;

/// Storage key holding the serialized collection.
pub const COLLECTION_KEY: &str = "wheelspin.collection";

/// What survives a restart: the wheels and which one is active. The winning
/// segment is deliberately left out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PersistedCollection {
    pub wheels: Vec<Wheel>,
    #[serde(default)]
    pub active_wheel_id: Option<String>,
}

impl PersistedCollection {
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self).context("failed to serialize wheel collection")
    }

    pub fn decode(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("failed to parse stored wheel collection")
    }
}
