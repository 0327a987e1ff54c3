//! Variable sets injected into apply invocations
//!
//! A [`VariableSet`] is an ordered name → value mapping that exists only
//! for the duration of one apply call. It is serialized into the child
//! process environment using terraform's `TF_VAR_<name>` convention:
//! strings pass through unchanged, booleans become their literal text.

use std::collections::BTreeMap;
use std::fmt;

/// Prefix terraform uses to pick up variables from the environment
pub const ENV_VAR_PREFIX: &str = "TF_VAR_";

/// A variable value: string or boolean
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarValue {
    Str(String),
    Bool(bool),
}

impl fmt::Display for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for VarValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for VarValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for VarValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Ordered mapping of variable names to values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableSet {
    values: BTreeMap<String, VarValue>,
}

impl VariableSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn set(mut self, name: impl Into<String>, value: impl Into<VarValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<VarValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Clone of this set with one variable removed
    ///
    /// Used by the required-variable generator to derive omission cases.
    pub fn without(&self, name: &str) -> Self {
        let mut values = self.values.clone();
        values.remove(name);
        Self { values }
    }

    /// Variable names in set order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Serialize into environment entries, one `TF_VAR_<name>` per variable
    pub fn to_env(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .map(|(name, value)| (format!("{ENV_VAR_PREFIX}{name}"), value.to_string()))
            .collect()
    }
}

impl<N: Into<String>, V: Into<VarValue>> FromIterator<(N, V)> for VariableSet {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}
