use crate::error::TraitError;
use std::collections::{BTreeMap, BTreeSet};

/// Read-only resource metadata (an `R` class) that traits may consult.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassType {
    qualified_name: String,
    resources: BTreeMap<String, BTreeSet<String>>,
}

impl ClassType {
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            resources: BTreeMap::new(),
        }
    }

    /// Adds a resource of `kind` (e.g. `attr`, `styleable`).
    pub fn with_resource(mut self, kind: impl Into<String>, name: impl Into<String>) -> Self {
        self.resources
            .entry(kind.into())
            .or_default()
            .insert(name.into());
        self
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    pub fn has_resource(&self, kind: &str, name: &str) -> bool {
        self.resources
            .get(kind)
            .is_some_and(|names| names.contains(name))
    }

    /// Returns `com.example.R.attr.name` when the resource exists.
    pub fn reference(&self, kind: &str, name: &str) -> Option<String> {
        self.has_resource(kind, name)
            .then(|| format!("{}.{}.{}", self.qualified_name, kind, name))
    }

    /// Like [`ClassType::reference`], failing with a trait error when absent.
    pub fn require(&self, kind: &str, name: &str) -> Result<String, TraitError> {
        self.reference(kind, name)
            .ok_or_else(|| TraitError::missing_resource(&self.qualified_name, kind, name))
    }

    pub fn resource_count(&self) -> usize {
        self.resources.values().map(BTreeSet::len).sum()
    }
}
