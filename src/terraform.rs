//! Drives the external terraform binary
//!
//! `init` runs once per module directory; `apply` runs once per test case
//! with an isolated state file and environment-injected variables. There
//! is no retry anywhere: a failed apply is that test case's failure.

use std::env;
use std::path::Path;
use tokio::fs;
use tokio::process::Command;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::process::run_capture;
use crate::state::StateDocument;
use crate::vars::VariableSet;

/// Environment variable overriding the terraform binary (e.g. `tofu`)
pub const BINARY_ENV: &str = "TFCHECK_TERRAFORM";

const DEFAULT_BINARY: &str = "terraform";

/// Invokes terraform init/apply against a module directory
#[derive(Debug, Clone)]
pub struct TerraformRunner {
    binary: String,
}

impl Default for TerraformRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TerraformRunner {
    /// Runner using the ambient `TFCHECK_TERRAFORM` binary, or `terraform`
    pub fn new() -> Self {
        Self {
            binary: env::var(BINARY_ENV).unwrap_or_else(|_| DEFAULT_BINARY.to_string()),
        }
    }

    /// Runner pinned to a specific binary; lets tests substitute a fake
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Initialize a module directory
    ///
    /// Safe to call repeatedly; idempotence is the tool's own guarantee.
    pub async fn init(&self, module_dir: &Path) -> Result<()> {
        log::debug!("terraform init in {}", module_dir.display());

        let mut cmd = Command::new(&self.binary);
        cmd.arg("init").current_dir(module_dir);

        let output = run_capture(cmd).await?;
        if output.success() {
            Ok(())
        } else {
            Err(Error::InitFailed {
                stdout: output.stdout,
            })
        }
    }

    /// Apply the module with the given variables and return the parsed state
    pub async fn apply(&self, module_dir: &Path, vars: &VariableSet) -> Result<StateDocument> {
        self.apply_with_env(module_dir, vars, &[]).await
    }

    /// Apply with additional environment entries merged alongside the
    /// derived `TF_VAR_` entries
    ///
    /// Each call writes to its own collision-resistant state file inside
    /// `module_dir`, so concurrent test cases never contend. On success
    /// the state file is read, deleted, and returned parsed; a deletion
    /// failure is logged but never fails the apply. On non-zero exit the
    /// state file is neither read nor deleted (it may not exist).
    pub async fn apply_with_env(
        &self,
        module_dir: &Path,
        vars: &VariableSet,
        extra_env: &[(String, String)],
    ) -> Result<StateDocument> {
        let state_path = module_dir.join(state_file_name());
        log::debug!(
            "terraform apply in {} (state: {})",
            module_dir.display(),
            state_path.display()
        );

        let mut cmd = Command::new(&self.binary);
        cmd.args([
            "apply",
            "-compact-warnings",
            "-input=false",
            "-auto-approve",
            "-no-color",
        ])
        .arg(format!("-state={}", state_path.display()))
        .current_dir(module_dir);
        for (key, value) in extra_env {
            cmd.env(key, value);
        }
        for (key, value) in vars.to_env() {
            cmd.env(key, value);
        }

        let output = run_capture(cmd).await?;
        if !output.success() {
            return Err(Error::ApplyFailed {
                stderr: output.stderr,
            });
        }

        let text = fs::read_to_string(&state_path).await?;
        if let Err(err) = fs::remove_file(&state_path).await {
            log::warn!(
                "failed to delete state file {}: {err}",
                state_path.display()
            );
        }
        StateDocument::from_json(&text)
    }
}

/// Process-unique, collision-resistant name for one apply's state artifact
fn state_file_name() -> String {
    format!("tfcheck-{}-{}.tfstate", std::process::id(), Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn state_file_names_are_pairwise_distinct() {
        let names: HashSet<String> = (0..256).map(|_| state_file_name()).collect();
        assert_eq!(names.len(), 256);
    }

    #[test]
    fn state_file_names_stay_inside_the_module_dir() {
        let name = state_file_name();
        assert!(!name.contains('/'));
        assert!(name.ends_with(".tfstate"));
    }

    #[cfg(unix)]
    mod with_stub_binary {
        use super::*;
        use crate::vars::VariableSet;
        use std::fs as std_fs;
        use std::os::unix::fs::PermissionsExt;
        use std::path::PathBuf;
        use tempfile::TempDir;

        const STATE_JSON: &str = r#"{
            "outputs": {},
            "resources": [
                {
                    "type": "coder_script",
                    "name": "main",
                    "provider": "provider[\"registry.terraform.io/coder/coder\"]",
                    "instances": [ { "attributes": { "script": "echo hello" } } ]
                }
            ]
        }"#;

        /// Stub terraform: init is a no-op; apply checks required TF_VAR_s
        /// and writes a canned state file to the -state= path.
        fn write_stub(dir: &TempDir, required: &[&str]) -> PathBuf {
            let state_json = dir.path().join("canned-state.json");
            std_fs::write(&state_json, STATE_JSON).unwrap();

            let mut script = String::from("#!/bin/sh\n");
            script.push_str("sub=\"$1\"; shift\n");
            script.push_str("[ \"$sub\" = init ] && exit 0\n");
            for name in required {
                script.push_str(&format!(
                    "if [ -z \"$(printenv TF_VAR_{name})\" ]; then \
                     printf 'Error: input variable \"%s\" is not set\\n' '{name}' >&2; exit 1; fi\n"
                ));
            }
            script.push_str("state=''\n");
            script.push_str("for arg in \"$@\"; do case \"$arg\" in -state=*) state=\"${arg#-state=}\";; esac; done\n");
            script.push_str(&format!("cat '{}' > \"$state\"\n", state_json.display()));

            let path = dir.path().join("terraform-stub");
            std_fs::write(&path, script).unwrap();
            std_fs::set_permissions(&path, std_fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[tokio::test]
        async fn apply_parses_state_and_deletes_the_file() {
            let dir = TempDir::new().unwrap();
            let stub = write_stub(&dir, &[]);
            let runner = TerraformRunner::with_binary(stub.display().to_string());

            runner.init(dir.path()).await.unwrap();
            let state = runner.apply(dir.path(), &VariableSet::new()).await.unwrap();

            assert_eq!(state.resources.len(), 1);
            assert_eq!(state.resources[0].type_name, "coder_script");

            // No .tfstate artifact survives the call
            let leftovers: Vec<_> = std_fs::read_dir(dir.path())
                .unwrap()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_name().to_string_lossy().ends_with(".tfstate"))
                .collect();
            assert!(leftovers.is_empty());
        }

        #[tokio::test]
        async fn missing_required_variable_fails_with_raw_stderr() {
            let dir = TempDir::new().unwrap();
            let stub = write_stub(&dir, &["region"]);
            let runner = TerraformRunner::with_binary(stub.display().to_string());

            let err = runner
                .apply(dir.path(), &VariableSet::new())
                .await
                .unwrap_err();
            match err {
                Error::ApplyFailed { stderr } => {
                    assert!(stderr.contains("input variable \"region\" is not set"));
                }
                other => panic!("expected ApplyFailed, got {other}"),
            }
        }

        #[tokio::test]
        async fn injected_variables_reach_the_tool() {
            let dir = TempDir::new().unwrap();
            let stub = write_stub(&dir, &["region", "share"]);
            let runner = TerraformRunner::with_binary(stub.display().to_string());

            let vars = VariableSet::new().set("region", "us-east-1").set("share", true);
            assert!(runner.apply(dir.path(), &vars).await.is_ok());
        }

        #[tokio::test]
        async fn concurrent_applies_do_not_contend() {
            let dir = TempDir::new().unwrap();
            let stub = write_stub(&dir, &[]);
            let runner = TerraformRunner::with_binary(stub.display().to_string());

            let vars = VariableSet::new();
            let (a, b, c, d) = tokio::join!(
                runner.apply(dir.path(), &vars),
                runner.apply(dir.path(), &vars),
                runner.apply(dir.path(), &vars),
                runner.apply(dir.path(), &vars),
            );
            for state in [a, b, c, d] {
                assert_eq!(state.unwrap().resources.len(), 1);
            }
        }
    }
}
