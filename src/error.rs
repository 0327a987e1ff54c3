//! Error taxonomy for the harness
//!
//! Every subprocess failure surfaces immediately with the raw captured
//! tool output as the message. There is no local recovery and no retry:
//! a non-zero exit anywhere is a terminal failure of that one operation.

use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// All failure modes of the harness
#[derive(Debug, Error)]
pub enum Error {
    /// `terraform apply` exited non-zero; carries the tool's stderr verbatim
    #[error("terraform apply failed:\n{stderr}")]
    ApplyFailed { stderr: String },

    /// `terraform init` exited non-zero; carries the tool's stdout verbatim
    #[error("terraform init failed:\n{stdout}")]
    InitFailed { stdout: String },

    /// Container start exited non-zero; carries the runtime's stdout verbatim
    #[error("container start failed:\n{stdout}")]
    ContainerStart { stdout: String },

    /// No resource in the state document matched the requested type/name
    #[error("no \"{resource_type}\" resource{} found in state", fmt_name_filter(.name))]
    ResourceNotFound {
        resource_type: String,
        name: Option<String>,
    },

    /// A matched resource had zero or multiple instances
    #[error("resource \"{resource_type}.{name}\" has {count} instances, expected exactly 1")]
    InstanceCardinality {
        resource_type: String,
        name: String,
        count: usize,
    },

    /// An instance's attribute payload did not match the expected shape
    #[error("attributes of \"{resource_type}\" did not match the expected shape: {source}")]
    MalformedAttributes {
        resource_type: String,
        #[source]
        source: serde_json::Error,
    },

    /// Apply succeeded even though a supposedly required variable was omitted
    #[error("variable \"{variable}\" was omitted but apply succeeded; it is not actually required")]
    RequiredVariableAccepted { variable: String },

    /// Omitting a variable failed, but not with the expected rejection message
    #[error("omitting \"{variable}\" failed for an unexpected reason:\n{stderr}")]
    WrongRejection { variable: String, stderr: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn fmt_name_filter(name: &Option<String>) -> String {
    name.as_deref()
        .map(|n| format!(" named \"{n}\""))
        .unwrap_or_default()
}
