//! Key-value row model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the `kv_store` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KvEntry {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}
