// Tue Jan 20 2026 - Alex

use thiserror::Error;

/// A broken memory-layout invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("{kind} declared at '{location}' has an empty name")]
    EmptyName { kind: String, location: String },
    #[error("{definition}: empty source location")]
    EmptySource { definition: String },
    #[error("{definition}: size must be greater than 0")]
    ZeroSize { definition: String },
    #[error("{definition}.{field}: unknown type '{type_name}'")]
    UnknownType {
        definition: String,
        field: String,
        type_name: String,
    },
    #[error("{definition}.{field}: invalid array dimensions {dims:?}")]
    InvalidArrayDims {
        definition: String,
        field: String,
        dims: Vec<u64>,
    },
    #[error("{definition}.{field}: starts at bit {offset} but '{previous}' ends at bit {previous_end}")]
    Overlap {
        definition: String,
        field: String,
        offset: u64,
        previous: String,
        previous_end: u64,
    },
    #[error("{definition}: declared {size_bits} bits but fields need {required_bits}")]
    Undersized {
        definition: String,
        size_bits: u64,
        required_bits: u64,
    },
    #[error("{definition}.{field}: union member at bit {offset}, expected 0")]
    UnionOffset {
        definition: String,
        field: String,
        offset: u64,
    },
}

impl LayoutError {
    pub fn definition(&self) -> &str {
        match self {
            Self::EmptyName { location, .. } => location,
            Self::EmptySource { definition }
            | Self::ZeroSize { definition }
            | Self::UnknownType { definition, .. }
            | Self::InvalidArrayDims { definition, .. }
            | Self::Overlap { definition, .. }
            | Self::Undersized { definition, .. }
            | Self::UnionOffset { definition, .. } => definition,
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            Self::EmptyName { .. } | Self::EmptySource { .. } => "identity",
            Self::ZeroSize { .. } | Self::Undersized { .. } => "size",
            Self::UnknownType { .. } => "unknown_type",
            Self::InvalidArrayDims { .. } => "array",
            Self::Overlap { .. } => "overlap",
            Self::UnionOffset { .. } => "union",
        }
    }
}
