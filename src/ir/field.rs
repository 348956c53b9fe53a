// Mon Jan 19 2026 - Alex

use crate::ir::TypeReference;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A data member of a struct or union.
///
/// `size_in_bits` is the size of a single element; the field occupies
/// `size_in_bits * product(array_dims)` bits starting at `bit_offset`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeReference,
    #[serde(default)]
    pub array_dims: Vec<u64>,
    pub bit_offset: u64,
    pub size_in_bits: u64,
    #[serde(default)]
    pub is_bitfield: bool,
}

impl Field {
    pub fn new(name: &str, ty: TypeReference, bit_offset: u64, size_in_bits: u64) -> Self {
        Self {
            name: name.to_string(),
            ty,
            array_dims: Vec::new(),
            bit_offset,
            size_in_bits,
            is_bitfield: false,
        }
    }

    pub fn with_dims(mut self, dims: Vec<u64>) -> Self {
        self.array_dims = dims;
        self
    }

    pub fn with_bitfield(mut self) -> Self {
        self.is_bitfield = true;
        self
    }

    /// Number of elements, 1 for scalars. A flexible array counts as 0.
    pub fn element_count(&self) -> u64 {
        element_count(&self.array_dims)
    }

    pub fn total_bits(&self) -> u64 {
        self.size_in_bits * self.element_count()
    }

    /// First bit past the field.
    pub fn end_bit(&self) -> u64 {
        self.bit_offset + self.total_bits()
    }

    pub fn is_array(&self) -> bool {
        !self.array_dims.is_empty()
    }

    pub fn is_flexible_array(&self) -> bool {
        self.array_dims == [0]
    }
}

pub fn element_count(dims: &[u64]) -> u64 {
    dims.iter().product()
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ty, self.name)?;
        for dim in &self.array_dims {
            write!(f, "[{}]", dim)?;
        }
        if self.is_bitfield {
            write!(f, " : {}", self.size_in_bits)?;
        }
        write!(f, " @ bit {}", self.bit_offset)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Enumerator {
    pub name: String,
    pub value: i64,
}

impl Enumerator {
    pub fn new(name: &str, value: i64) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }
}
