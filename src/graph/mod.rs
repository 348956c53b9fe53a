// Tue Jan 20 2026 - Alex

pub mod error;
pub mod dependency;

pub use error::GraphError;
pub use dependency::{build_graph, topological_order, reachable_from, Adjacency, DependencyGraph};
