// Mon Jan 19 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolutionError {
    #[error("Type node not found: {0}")]
    NodeNotFound(String),
    #[error("Incomplete type '{name}' (node {id})")]
    IncompleteType { id: String, name: String },
    #[error("Unsupported node kind {kind} (node {id})")]
    Unsupported { id: String, kind: String },
    #[error("Type chain deeper than {limit} nodes at {id}")]
    DepthExceeded { id: String, limit: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("Failed to resolve {definition}.{field}: {source}")]
    FieldType {
        definition: String,
        field: String,
        source: ResolutionError,
    },
    #[error("Failed to resolve {definition}: {source}")]
    Resolution {
        definition: String,
        source: ResolutionError,
    },
    #[error("{definition}: missing '{attribute}' attribute")]
    MissingAttribute {
        definition: String,
        attribute: &'static str,
    },
    #[error("{definition}: size {size_bits} bits is not a multiple of 8")]
    UnalignedSize { definition: String, size_bits: u64 },
    #[error("{definition}: no source location")]
    MissingSource { definition: String },
}

impl BuildError {
    pub fn definition(&self) -> &str {
        match self {
            Self::FieldType { definition, .. }
            | Self::Resolution { definition, .. }
            | Self::MissingAttribute { definition, .. }
            | Self::UnalignedSize { definition, .. }
            | Self::MissingSource { definition } => definition,
        }
    }
}
