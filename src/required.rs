//! Derived tests for a module's required variables
//!
//! Given the full variable set a module needs, this generates one case
//! asserting the full set applies cleanly, plus one case per variable
//! asserting that omitting it makes apply fail with terraform's standard
//! rejection message. A module author who declared a variable optional
//! when it should be required shows up as an explicit, named failure
//! rather than a silently passing test.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::terraform::TerraformRunner;
use crate::vars::VariableSet;

/// Terraform's phrasing when a required input variable is missing
pub fn rejection_phrase(variable: &str) -> String {
    format!("input variable \"{variable}\" is not set")
}

/// What one generated case asserts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseKind {
    /// Apply with every variable present must succeed
    AllPresent,
    /// Apply with this variable omitted must be rejected by name
    Omitted(String),
}

/// One derived test case against a module directory
#[derive(Debug, Clone)]
pub struct RequiredVarCase {
    module_dir: PathBuf,
    vars: VariableSet,
    kind: CaseKind,
}

impl RequiredVarCase {
    /// Human-readable case name for test reporters
    pub fn name(&self) -> String {
        match &self.kind {
            CaseKind::AllPresent => "apply with all variables set".to_string(),
            CaseKind::Omitted(variable) => format!("apply without variable \"{variable}\""),
        }
    }

    pub fn kind(&self) -> &CaseKind {
        &self.kind
    }

    /// Run this case's apply and assert on the outcome
    pub async fn check(&self, runner: &TerraformRunner) -> Result<()> {
        match &self.kind {
            CaseKind::AllPresent => {
                runner.apply(&self.module_dir, &self.vars).await?;
                Ok(())
            }
            CaseKind::Omitted(variable) => {
                match runner.apply(&self.module_dir, &self.vars).await {
                    Ok(_) => Err(Error::RequiredVariableAccepted {
                        variable: variable.clone(),
                    }),
                    Err(Error::ApplyFailed { stderr })
                        if stderr.contains(&rejection_phrase(variable)) =>
                    {
                        Ok(())
                    }
                    Err(Error::ApplyFailed { stderr }) => Err(Error::WrongRejection {
                        variable: variable.clone(),
                        stderr,
                    }),
                    Err(other) => Err(other),
                }
            }
        }
    }
}

/// Derive the full case list: one all-present case, then one omission
/// case per variable in set order
pub fn required_variable_cases(module_dir: &Path, vars: &VariableSet) -> Vec<RequiredVarCase> {
    let mut cases = vec![RequiredVarCase {
        module_dir: module_dir.to_path_buf(),
        vars: vars.clone(),
        kind: CaseKind::AllPresent,
    }];
    for name in vars.names() {
        cases.push(RequiredVarCase {
            module_dir: module_dir.to_path_buf(),
            vars: vars.without(name),
            kind: CaseKind::Omitted(name.to_string()),
        });
    }
    cases
}

/// Run every derived case sequentially, stopping at the first failure
pub async fn check_required_variables(
    runner: &TerraformRunner,
    module_dir: &Path,
    vars: &VariableSet,
) -> Result<()> {
    for case in required_variable_cases(module_dir, vars) {
        log::debug!("required-variable case: {}", case.name());
        case.check(runner).await?;
    }
    Ok(())
}
