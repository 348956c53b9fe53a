// Mon Jan 19 2026 - Alex

use crate::dump::error::ResolutionError;
use crate::dump::node::{DumpNode, NodeKind, NodeTable};
use crate::dump::normalize::normalize_integral;
use crate::ir::field::element_count;
use crate::ir::{TypeReference, OPAQUE_POINTER};

/// Longest wrapper chain followed before giving up on a node.
pub const MAX_RESOLVE_DEPTH: usize = 256;

/// Terminal form of a dump type node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub base: TypeReference,
    /// Size of one element, in bits.
    pub size_bits: u64,
    pub align_bytes: u64,
    /// Array dimensions, outermost first.
    pub array_dims: Vec<u64>,
}

impl ResolvedType {
    fn terminal(base: TypeReference, size_bits: u64, align_bits: u64) -> Self {
        Self {
            base,
            size_bits,
            align_bytes: align_bits / 8,
            array_dims: Vec::new(),
        }
    }

    pub fn total_bits(&self) -> u64 {
        self.size_bits * element_count(&self.array_dims)
    }
}

/// Walks type nodes down to their terminal form.
///
/// Typedefs are seen through unless `stop_at_typedefs` is set, in which case
/// the first named typedef becomes the base type and its whole size becomes
/// the element size. Pointers are erased to `void*`.
pub struct TypeResolver<'a> {
    nodes: &'a NodeTable,
    preserve_bool: bool,
    stop_at_typedefs: bool,
}

impl<'a> TypeResolver<'a> {
    pub fn new(nodes: &'a NodeTable) -> Self {
        Self {
            nodes,
            preserve_bool: false,
            stop_at_typedefs: false,
        }
    }

    pub fn with_preserve_bool(mut self, preserve: bool) -> Self {
        self.preserve_bool = preserve;
        self
    }

    pub fn with_stop_at_typedefs(mut self, stop: bool) -> Self {
        self.stop_at_typedefs = stop;
        self
    }

    pub fn resolve(&self, id: &str) -> Result<ResolvedType, ResolutionError> {
        self.resolve_at(id, 0, self.stop_at_typedefs)
    }

    fn resolve_at(&self, id: &str, depth: usize, stop_at_typedefs: bool) -> Result<ResolvedType, ResolutionError> {
        if depth > MAX_RESOLVE_DEPTH {
            return Err(ResolutionError::DepthExceeded {
                id: id.to_string(),
                limit: MAX_RESOLVE_DEPTH,
            });
        }

        let node = self.nodes.require(id)?;
        match &node.kind {
            NodeKind::FundamentalType { name, size, align } => {
                let normalized = normalize_integral(name, *size, self.preserve_bool);
                Ok(ResolvedType::terminal(TypeReference::new(&normalized), *size, *align))
            }
            NodeKind::Typedef { name, target, .. } => {
                if !stop_at_typedefs {
                    return self.resolve_at(target, depth + 1, false);
                }
                // Size of the alias as a whole; its own dims surface later.
                let aliased = self.resolve_at(target, depth + 1, false)?;
                Ok(ResolvedType {
                    base: TypeReference {
                        name: name.clone(),
                        namespace: self.nodes.namespace_of(node),
                    },
                    size_bits: aliased.total_bits(),
                    align_bytes: aliased.align_bytes,
                    array_dims: Vec::new(),
                })
            }
            NodeKind::ElaboratedType { target } | NodeKind::CvQualifiedType { target } => {
                self.resolve_at(target, depth + 1, stop_at_typedefs)
            }
            NodeKind::PointerType { size, align, .. } => {
                Ok(ResolvedType::terminal(TypeReference::new(OPAQUE_POINTER), *size, *align))
            }
            NodeKind::ArrayType { element, max } => {
                let mut resolved = self.resolve_at(element, depth + 1, stop_at_typedefs)?;
                let dim = max.map(|m| (m + 1).max(0) as u64).unwrap_or(0);
                resolved.array_dims.insert(0, dim);
                Ok(resolved)
            }
            NodeKind::Struct(record) | NodeKind::Class(record) | NodeKind::Union(record) => {
                let (Some(size), false) = (record.size, record.incomplete) else {
                    return Err(ResolutionError::IncompleteType {
                        id: id.to_string(),
                        name: record.name.clone(),
                    });
                };
                let base = self.aggregate_reference(node, &record.name);
                Ok(ResolvedType::terminal(base, size, record.align.unwrap_or(0)))
            }
            NodeKind::Enumeration { name, size, align, .. } => {
                let base = self.aggregate_reference(node, name);
                Ok(ResolvedType::terminal(base, *size, *align))
            }
            other => Err(ResolutionError::Unsupported {
                id: id.to_string(),
                kind: other.tag().to_string(),
            }),
        }
    }

    /// Reference to a struct/union/enum, named through its typedef when anonymous.
    pub fn aggregate_reference(&self, node: &DumpNode, name: &str) -> TypeReference {
        if name.is_empty() {
            if let Some(alias) = self.nodes.anonymous_alias(&node.id) {
                if let NodeKind::Typedef { name: alias_name, .. } = &alias.kind {
                    return TypeReference {
                        name: alias_name.clone(),
                        namespace: self.nodes.namespace_of(alias),
                    };
                }
            }
        }
        TypeReference {
            name: name.to_string(),
            namespace: self.nodes.namespace_of(node),
        }
    }
}
