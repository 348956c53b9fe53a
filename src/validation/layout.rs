// Tue Jan 20 2026 - Alex

use crate::ir::{CompositeDefinition, Definition, DefinitionIndex, DefinitionKind, Field};
use crate::validation::error::LayoutError;

/// Checks the memory-layout invariants of a definition set.
///
/// Read-only and linear in the total number of fields.
pub struct LayoutValidator {
    check_types: bool,
}

impl LayoutValidator {
    pub fn new() -> Self {
        Self { check_types: true }
    }

    /// Skip the known-type check, for partial sets handed out for inspection.
    pub fn without_type_check(mut self) -> Self {
        self.check_types = false;
        self
    }

    /// Fails on the first broken invariant.
    pub fn validate(&self, definitions: &[Definition]) -> Result<(), LayoutError> {
        let index = DefinitionIndex::new(definitions);
        for definition in definitions {
            let mut issues = Vec::new();
            self.check_definition(definition, &index, &mut issues);
            if let Some(first) = issues.into_iter().next() {
                return Err(first);
            }
        }
        Ok(())
    }

    /// Every broken invariant, in definition order.
    pub fn check_all(&self, definitions: &[Definition]) -> Vec<LayoutError> {
        let index = DefinitionIndex::new(definitions);
        let mut issues = Vec::new();
        for definition in definitions {
            self.check_definition(definition, &index, &mut issues);
        }
        issues
    }

    fn check_definition(&self, definition: &Definition, index: &DefinitionIndex<'_>, issues: &mut Vec<LayoutError>) {
        let fullname = definition.fullname();

        if definition.name().is_empty() && definition.kind() != DefinitionKind::Enum {
            issues.push(LayoutError::EmptyName {
                kind: definition.kind().to_string(),
                location: definition.source().to_string(),
            });
        }
        if definition.source().is_empty() {
            issues.push(LayoutError::EmptySource {
                definition: fullname.clone(),
            });
        }

        let composite = match definition {
            Definition::Class(c) | Definition::Union(c) => c,
            _ => return,
        };

        if composite.size == 0 {
            issues.push(LayoutError::ZeroSize {
                definition: fullname.clone(),
            });
        }

        for field in &composite.fields {
            self.check_field(&fullname, field, index, issues);
        }

        match definition {
            Definition::Class(_) => check_class_layout(&fullname, composite, issues),
            Definition::Union(_) => check_union_layout(&fullname, composite, issues),
            _ => {}
        }
    }

    fn check_field(&self, owner: &str, field: &Field, index: &DefinitionIndex<'_>, issues: &mut Vec<LayoutError>) {
        if self.check_types {
            let type_name = field.ty.fullname();
            if !index.is_known(&type_name) {
                issues.push(LayoutError::UnknownType {
                    definition: owner.to_string(),
                    field: field.name.clone(),
                    type_name,
                });
            }
        }

        if field.array_dims.len() > 1 && field.array_dims.contains(&0) {
            issues.push(LayoutError::InvalidArrayDims {
                definition: owner.to_string(),
                field: field.name.clone(),
                dims: field.array_dims.clone(),
            });
        }
    }
}

impl Default for LayoutValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Shorthand for `LayoutValidator::new().validate(definitions)`.
pub fn validate(definitions: &[Definition]) -> Result<(), LayoutError> {
    LayoutValidator::new().validate(definitions)
}

fn check_class_layout(owner: &str, class: &CompositeDefinition, issues: &mut Vec<LayoutError>) {
    let mut covered_end = 0u64;
    let mut last_name: Option<&str> = None;

    for field in class.sorted_fields() {
        if let Some(previous) = last_name {
            if field.bit_offset < covered_end {
                issues.push(LayoutError::Overlap {
                    definition: owner.to_string(),
                    field: field.name.clone(),
                    offset: field.bit_offset,
                    previous: previous.to_string(),
                    previous_end: covered_end,
                });
            }
        }
        if field.end_bit() >= covered_end {
            covered_end = field.end_bit();
            last_name = Some(&field.name);
        }
    }

    if class.size_in_bits() < covered_end {
        issues.push(LayoutError::Undersized {
            definition: owner.to_string(),
            size_bits: class.size_in_bits(),
            required_bits: covered_end,
        });
    }
}

fn check_union_layout(owner: &str, union: &CompositeDefinition, issues: &mut Vec<LayoutError>) {
    for field in &union.fields {
        if field.bit_offset != 0 {
            issues.push(LayoutError::UnionOffset {
                definition: owner.to_string(),
                field: field.name.clone(),
                offset: field.bit_offset,
            });
        }
    }

    let largest = union.fields.iter().map(|f| f.total_bits()).max().unwrap_or(0);
    if union.size_in_bits() < largest {
        issues.push(LayoutError::Undersized {
            definition: owner.to_string(),
            size_bits: union.size_in_bits(),
            required_bits: largest,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{EnumDefinition, TypeReference, TypedefDefinition};

    fn class(name: &str, size: u64, fields: Vec<Field>) -> Definition {
        Definition::Class(CompositeDefinition::new(name, size, 4).with_source("test.h:1").with_fields(fields))
    }

    fn union(name: &str, size: u64, fields: Vec<Field>) -> Definition {
        Definition::Union(CompositeDefinition::new(name, size, 4).with_source("test.h:1").with_fields(fields))
    }

    fn field(name: &str, ty: &str, offset: u64, bits: u64) -> Field {
        Field::new(name, TypeReference::new(ty), offset, bits)
    }

    #[test]
    fn test_packed_struct_passes() {
        let defs = vec![class("A", 8, vec![field("i", "int32_t", 0, 32), field("f", "float", 32, 32)])];
        assert!(validate(&defs).is_ok());
    }

    #[test]
    fn test_overlap_detected() {
        let defs = vec![class("A", 8, vec![field("i", "int32_t", 0, 32), field("f", "float", 16, 32)])];
        match validate(&defs) {
            Err(LayoutError::Overlap { field, offset, previous, previous_end, .. }) => {
                assert_eq!(field, "f");
                assert_eq!(offset, 16);
                assert_eq!(previous, "i");
                assert_eq!(previous_end, 32);
            }
            other => panic!("expected overlap, got {:?}", other),
        }
    }

    #[test]
    fn test_undersized_class() {
        let arr = field("values", "int32_t", 0, 32).with_dims(vec![4]);
        let defs = vec![class("A", 8, vec![arr])];
        assert!(matches!(
            validate(&defs),
            Err(LayoutError::Undersized { size_bits: 64, required_bits: 128, .. })
        ));
    }

    #[test]
    fn test_union_offsets() {
        let ok = vec![union("U", 4, vec![field("i", "int32_t", 0, 32), field("f", "float", 0, 32)])];
        assert!(validate(&ok).is_ok());

        let moved = vec![union("U", 4, vec![field("i", "int32_t", 0, 32), field("f", "float", 8, 32)])];
        assert!(matches!(validate(&moved), Err(LayoutError::UnionOffset { offset: 8, .. })));
    }

    #[test]
    fn test_unknown_type() {
        let defs = vec![class("A", 4, vec![field("x", "Missing", 0, 32)])];
        assert!(matches!(validate(&defs), Err(LayoutError::UnknownType { .. })));

        let with_alias = vec![
            class("A", 4, vec![field("x", "MyInt", 0, 32)]),
            Definition::Typedef(TypedefDefinition::new("MyInt", TypeReference::new("int32_t")).with_source("t.h:2")),
        ];
        assert!(validate(&with_alias).is_ok());
        assert!(LayoutValidator::new().without_type_check().validate(&defs).is_ok());
    }

    #[test]
    fn test_array_dims() {
        let flexible = field("data", "uint8_t", 32, 8).with_dims(vec![0]);
        let defs = vec![class("Buf", 4, vec![field("len", "uint32_t", 0, 32), flexible])];
        assert!(validate(&defs).is_ok());

        let bad = field("data", "uint8_t", 32, 8).with_dims(vec![2, 0]);
        let defs = vec![class("Buf", 8, vec![field("len", "uint32_t", 0, 32), bad])];
        assert!(matches!(validate(&defs), Err(LayoutError::InvalidArrayDims { .. })));
    }

    #[test]
    fn test_identity_rules() {
        let nameless = Definition::Class(CompositeDefinition::new("", 4, 4).with_source("x.h:1"));
        assert!(matches!(validate(&[nameless]), Err(LayoutError::EmptyName { .. })));

        let anonymous_enum = Definition::Enum(EnumDefinition::new("", 4).with_source("x.h:2"));
        assert!(validate(&[anonymous_enum]).is_ok());

        let sourceless = Definition::Class(CompositeDefinition::new("A", 4, 4));
        assert!(matches!(validate(&[sourceless]), Err(LayoutError::EmptySource { .. })));

        let empty = class("Empty", 0, Vec::new());
        assert!(matches!(validate(&[empty]), Err(LayoutError::ZeroSize { .. })));
    }

    #[test]
    fn test_check_all_collects_everything() {
        let defs = vec![
            class("A", 2, vec![field("x", "Missing", 0, 32)]),
            union("U", 4, vec![field("f", "float", 8, 32)]),
        ];
        let issues = LayoutValidator::new().check_all(&defs);
        let categories: Vec<&str> = issues.iter().map(|i| i.category()).collect();
        assert_eq!(categories, vec!["unknown_type", "size", "union"]);
    }

    #[test]
    fn test_bitfields_share_a_unit() {
        let flags = vec![
            field("ready", "uint32_t", 0, 1).with_bitfield(),
            field("error", "uint32_t", 1, 1).with_bitfield(),
            field("reserved", "uint32_t", 2, 6).with_bitfield(),
        ];
        assert!(validate(&[class("Flags", 4, flags)]).is_ok());
    }
}
