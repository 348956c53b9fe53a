// Tue Jan 20 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Cyclic dependency through '{node}' (path: {})", path.join(" -> "))]
    CyclicDependency { node: String, path: Vec<String> },
    #[error("None of the requested roots exist: {}", roots.join(", "))]
    NoMatch { roots: Vec<String> },
}
