//! Runs a module's declared provisioning script in a fresh container
//!
//! Composes the resource locator and the container bridge: the module
//! under test must declare exactly one `coder_script` resource; its
//! script text is executed through a shell inside a container kept alive
//! with `sleep infinity`.

use serde::Deserialize;
use serde_json::Value;

use crate::container::ContainerBridge;
use crate::error::{Error, Result};
use crate::locator::find_instance;
use crate::state::StateDocument;

/// Resource type holding the module's provisioning script
pub const SCRIPT_RESOURCE_TYPE: &str = "coder_script";

/// Shell used when none is given
pub const DEFAULT_SHELL: &str = "sh";

/// Narrowed attribute shape of a script resource instance
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptAttributes {
    /// The script text itself
    pub script: String,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Line-oriented outcome of one script run
///
/// Both streams are trimmed of trailing whitespace and split on newlines,
/// so empty output yields a single empty line rather than no lines. That
/// asymmetry is long-standing assertion-compatibility behavior and is
/// kept as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRun {
    pub exit_code: i32,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

/// Locate the module's script resource and run it in a container from
/// `image`, through `shell`
pub async fn execute_declared_script(
    bridge: &ContainerBridge,
    state: &StateDocument,
    image: &str,
    shell: &str,
) -> Result<ScriptRun> {
    let attributes = find_instance(state, SCRIPT_RESOURCE_TYPE, None)?;
    let script: ScriptAttributes = serde_json::from_value(Value::Object(attributes.clone()))
        .map_err(|source| Error::MalformedAttributes {
            resource_type: SCRIPT_RESOURCE_TYPE.to_string(),
            source,
        })?;

    let container_id = bridge.run(image, "sleep infinity").await?;
    let result = bridge
        .exec(&container_id, &[shell, "-c", &script.script])
        .await?;

    Ok(ScriptRun {
        exit_code: result.exit_code,
        stdout: split_lines(&result.stdout),
        stderr: split_lines(&result.stderr),
    })
}

/// [`execute_declared_script`] with the default `sh` shell
pub async fn execute_declared_script_sh(
    bridge: &ContainerBridge,
    state: &StateDocument,
    image: &str,
) -> Result<ScriptRun> {
    execute_declared_script(bridge, state, image, DEFAULT_SHELL).await
}

fn split_lines(text: &str) -> Vec<String> {
    text.trim_end().split('\n').map(str::to_string).collect()
}
