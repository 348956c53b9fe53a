// Tue Jan 20 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("Recursive typedef '{name}' (chain: {})", chain.join(" -> "))]
    RecursiveTypedef { name: String, chain: Vec<String> },
    #[error("None of the requested targets exist: {}", targets.join(", "))]
    NoMatch { targets: Vec<String> },
    #[error("{definition}: gap of {bits} bits at bit {offset} is not a whole number of bytes")]
    ByteAlignment {
        definition: String,
        offset: u64,
        bits: u64,
    },
    #[error("{definition}.{field}: '{name}' matches several enums ({})", candidates.join(", "))]
    AmbiguousEnum {
        definition: String,
        field: String,
        name: String,
        candidates: Vec<String>,
    },
    #[error("{definition}: '{composite}' contains itself")]
    RecursiveComposite { definition: String, composite: String },
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}
