// Mon Jan 19 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator used when rendering a namespace-qualified name.
pub const SCOPE_SEPARATOR: &str = "::";

/// A reference to a type by name, optionally nested in namespaces.
///
/// `namespace` is ordered outermost first. Two references are equal when both
/// the bare name and the namespace path match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeReference {
    pub name: String,
    #[serde(default)]
    pub namespace: Vec<String>,
}

impl TypeReference {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            namespace: Vec::new(),
        }
    }

    pub fn with_namespace(name: &str, namespace: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn fullname(&self) -> String {
        qualify(&self.namespace, &self.name)
    }

    pub fn is_qualified(&self) -> bool {
        !self.namespace.is_empty()
    }

    /// Collapse the namespace into the name, joined by `separator`.
    pub fn flattened(&self, separator: &str) -> Self {
        if self.namespace.is_empty() {
            return self.clone();
        }
        let mut parts = self.namespace.clone();
        parts.push(self.name.clone());
        Self {
            name: parts.join(separator),
            namespace: Vec::new(),
        }
    }
}

/// `::`-joined path followed by the bare name.
pub fn qualify(namespace: &[String], name: &str) -> String {
    if namespace.is_empty() {
        return name.to_string();
    }
    let mut full = namespace.join(SCOPE_SEPARATOR);
    full.push_str(SCOPE_SEPARATOR);
    full.push_str(name);
    full
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fullname())
    }
}

impl From<&str> for TypeReference {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
