//! Catalog types

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Set of streams available for syncing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Catalog entries
    pub streams: Vec<CatalogEntry>,
}

impl Catalog {
    /// Parse a catalog from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::from)
    }

    /// Load a catalog from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Stream ids in catalog order
    pub fn stream_ids(&self) -> Vec<&str> {
        self.streams
            .iter()
            .map(|s| s.tap_stream_id.as_str())
            .collect()
    }

    /// Find an entry by stream id
    pub fn get(&self, tap_stream_id: &str) -> Option<&CatalogEntry> {
        self.streams
            .iter()
            .find(|s| s.tap_stream_id == tap_stream_id)
    }

    /// Keep only the named streams, preserving catalog order
    #[must_use]
    pub fn filter(self, names: &[String]) -> Self {
        Self {
            streams: self
                .streams
                .into_iter()
                .filter(|s| names.iter().any(|n| *n == s.tap_stream_id))
                .collect(),
        }
    }
}

/// One stream in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stream name
    #[serde(default)]
    pub stream: String,

    /// Stream identifier used for dispatch
    pub tap_stream_id: String,

    /// JSON schema of the records
    #[serde(default)]
    pub schema: JsonValue,

    /// Breadcrumb metadata
    #[serde(default)]
    pub metadata: Vec<MetadataEntry>,

    /// Primary key fields
    #[serde(default)]
    pub key_properties: Vec<String>,
}

/// Metadata attached to a breadcrumb path (`[]` for the stream itself)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    /// Path into the schema
    pub breadcrumb: Vec<String>,
    /// Metadata values
    pub metadata: JsonObject,
}
