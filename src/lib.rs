//! # tfcheck
//!
//! A verification harness for Terraform modules. It applies a module into
//! ephemeral state, parses the state into a typed resource graph, and
//! executes the module's declared provisioning script inside a disposable
//! Docker container so tests can assert on observable behavior. It also
//! derives tests proving that every variable a module author marked
//! required is actually rejected when absent.
//!
//! ## Flow
//!
//! 1. [`TerraformRunner::init`] prepares a module directory, once.
//! 2. Each test case calls [`TerraformRunner::apply`] with a
//!    [`VariableSet`]; every call gets its own collision-resistant state
//!    file, so cases run safely in parallel.
//! 3. [`find_instance`] locates a unique resource in the parsed
//!    [`StateDocument`].
//! 4. [`execute_declared_script`] bridges the located script into a fresh
//!    container via [`ContainerBridge`] and captures its output.
//!
//! ## Example
//!
//! ```ignore
//! use tfcheck::{
//!     check_required_variables, execute_declared_script_sh,
//!     ContainerBridge, TerraformRunner, VariableSet,
//! };
//!
//! #[tokio::test]
//! async fn module_script_prints_hello() -> tfcheck::Result<()> {
//!     let runner = TerraformRunner::new();
//!     runner.init("./modules/hello".as_ref()).await?;
//!
//!     let vars = VariableSet::new().set("agent_id", "a-1");
//!     let state = runner.apply("./modules/hello".as_ref(), &vars).await?;
//!
//!     let bridge = ContainerBridge::new();
//!     let run = execute_declared_script_sh(&bridge, &state, "alpine").await?;
//!     assert_eq!(run.exit_code, 0);
//!     assert_eq!(run.stdout, vec!["hello"]);
//!
//!     check_required_variables(&runner, "./modules/hello".as_ref(), &vars).await
//! }
//! ```
//!
//! ## External collaborators
//!
//! The terraform binary and the docker binary are black boxes invoked as
//! subprocesses; both are overridable via the `TFCHECK_TERRAFORM` and
//! `TFCHECK_DOCKER` environment variables or pinned per-runner with
//! `with_binary`, which is how the test suite substitutes fakes.
//!
//! No call here carries a timeout: a hung subprocess blocks its test case
//! until the enclosing test framework intervenes.

pub mod container;
pub mod error;
pub mod locator;
pub mod process;
pub mod required;
pub mod script;
pub mod state;
pub mod terraform;
pub mod vars;

// Re-export main types at crate root
pub use container::{ContainerBridge, HARNESS_LABEL};
pub use error::{Error, Result};
pub use locator::find_instance;
pub use process::ExecResult;
pub use required::{
    check_required_variables, rejection_phrase, required_variable_cases, CaseKind,
    RequiredVarCase,
};
pub use script::{
    execute_declared_script, execute_declared_script_sh, ScriptAttributes, ScriptRun,
    DEFAULT_SHELL, SCRIPT_RESOURCE_TYPE,
};
pub use state::{InstanceRecord, OutputValue, ResourceRecord, StateDocument};
pub use terraform::TerraformRunner;
pub use vars::{VarValue, VariableSet, ENV_VAR_PREFIX};
