//! Typed model of a terraform state document
//!
//! One `StateDocument` is produced per apply invocation, is immutable
//! after parse, and is owned by the calling test case. The backing state
//! file is deleted by the apply runner before the document is returned.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::Result;

/// Snapshot of all resources and outputs produced by one apply
///
/// Fields beyond `outputs` and `resources` (version, serial, lineage, ...)
/// are present in real state files but irrelevant here and ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct StateDocument {
    /// Module outputs by name
    #[serde(default)]
    pub outputs: BTreeMap<String, OutputValue>,

    /// Resource records in document order
    #[serde(default)]
    pub resources: Vec<ResourceRecord>,
}

/// A single module output
#[derive(Debug, Clone, Deserialize)]
pub struct OutputValue {
    #[serde(rename = "type")]
    pub type_name: String,
    pub value: Value,
}

/// One declared resource block, materialized
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceRecord {
    #[serde(rename = "type")]
    pub type_name: String,
    pub name: String,
    #[serde(default)]
    pub provider: String,
    /// A well-formed record has exactly one instance; the locator enforces
    /// this rather than the parser, so the violation is reportable
    #[serde(default)]
    pub instances: Vec<InstanceRecord>,
}

/// One concrete materialization of a resource block
#[derive(Debug, Clone, Deserialize)]
pub struct InstanceRecord {
    /// Opaque payload; the schema varies per resource type and consumers
    /// narrow it with an explicit parse step
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl StateDocument {
    /// Parse a state document from its JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
