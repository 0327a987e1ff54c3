//! Finds a unique resource instance inside a state document
//!
//! Matching is on type and (optionally) name only. Two records differing
//! only in provider are not distinguished; first match in document order
//! wins.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::state::StateDocument;

/// Find the single instance of a resource by type, and name when given
///
/// Returns the instance's attribute map unmodified; callers narrow the
/// shape for their resource type.
pub fn find_instance<'a>(
    state: &'a StateDocument,
    resource_type: &str,
    name: Option<&str>,
) -> Result<&'a Map<String, Value>> {
    let record = state
        .resources
        .iter()
        .find(|record| {
            record.type_name == resource_type && name.is_none_or(|n| record.name == n)
        })
        .ok_or_else(|| Error::ResourceNotFound {
            resource_type: resource_type.to_string(),
            name: name.map(str::to_string),
        })?;

    match record.instances.as_slice() {
        [instance] => Ok(&instance.attributes),
        other => Err(Error::InstanceCardinality {
            resource_type: record.type_name.clone(),
            name: record.name.clone(),
            count: other.len(),
        }),
    }
}
