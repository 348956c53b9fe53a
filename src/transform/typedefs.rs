// Tue Jan 20 2026 - Alex

use crate::ir::field::element_count;
use crate::ir::{Definition, TypeReference, TypedefDefinition};
use crate::transform::TransformError;
use indexmap::{IndexMap, IndexSet};

/// A reference followed through every typedef it names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAlias {
    pub target: TypeReference,
    /// Dims collected along the chain, outermost alias first.
    pub added_dims: Vec<u64>,
}

/// Fullname keyed view over the typedefs of one definition list.
pub struct TypedefMap<'a> {
    aliases: IndexMap<String, &'a TypedefDefinition>,
}

impl<'a> TypedefMap<'a> {
    pub fn new(definitions: &'a [Definition]) -> Self {
        let mut aliases = IndexMap::new();
        for def in definitions {
            if let Definition::Typedef(td) = def {
                aliases.entry(def.fullname()).or_insert(td);
            }
        }
        Self { aliases }
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn resolve(&self, reference: &TypeReference) -> Result<ResolvedAlias, TransformError> {
        let mut target = reference.clone();
        let mut added_dims = Vec::new();
        let mut seen: IndexSet<String> = IndexSet::new();

        loop {
            let fullname = target.fullname();
            let Some(alias) = self.aliases.get(&fullname) else {
                break;
            };
            if !seen.insert(fullname.clone()) {
                let mut chain: Vec<String> = seen.into_iter().collect();
                chain.push(fullname.clone());
                return Err(TransformError::RecursiveTypedef { name: fullname, chain });
            }
            added_dims.extend_from_slice(&alias.array_dims);
            target = alias.target.clone();
        }

        Ok(ResolvedAlias { target, added_dims })
    }
}

/// Drop every typedef and point each reference at its final target.
///
/// Dims picked up along a chain are appended after the referencing field's
/// own dims. The field's element size shrinks by the same factor so the
/// total extent is unchanged.
pub fn resolve_typedefs(definitions: &[Definition]) -> Result<Vec<Definition>, TransformError> {
    let aliases = TypedefMap::new(definitions);
    if aliases.is_empty() {
        return Ok(definitions.to_vec());
    }

    let mut resolved = Vec::with_capacity(definitions.len());
    let mut rewritten = 0usize;

    for def in definitions {
        match def {
            Definition::Typedef(_) => continue,
            Definition::Class(c) | Definition::Union(c) => {
                let mut composite = c.clone();
                for field in &mut composite.fields {
                    let alias = aliases.resolve(&field.ty)?;
                    if alias.target == field.ty {
                        continue;
                    }
                    let factor = element_count(&alias.added_dims);
                    if !alias.added_dims.is_empty() && factor != 0 {
                        field.size_in_bits /= factor;
                    }
                    field.ty = alias.target;
                    field.array_dims.extend(alias.added_dims);
                    rewritten += 1;
                }
                resolved.push(match def {
                    Definition::Union(_) => Definition::Union(composite),
                    _ => Definition::Class(composite),
                });
            }
            Definition::Constant(c) => {
                let mut constant = c.clone();
                constant.ty = aliases.resolve(&c.ty)?.target;
                resolved.push(Definition::Constant(constant));
            }
            Definition::Enum(_) => resolved.push(def.clone()),
        }
    }

    log::debug!(
        "Resolved {} typedefs, rewrote {} field references",
        aliases.len(),
        rewritten
    );
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{CompositeDefinition, ConstantDefinition, ConstantValue, Field};

    fn alias(name: &str, target: &str) -> Definition {
        Definition::Typedef(TypedefDefinition::new(name, TypeReference::new(target)).with_source("t.h:1"))
    }

    fn holder(field: Field) -> Definition {
        Definition::Class(CompositeDefinition::new("S", 64, 4).with_source("t.h:5").with_field(field))
    }

    #[test]
    fn test_chain_resolves_to_builtin() {
        let defs = vec![
            alias("MyInt", "int32_t"),
            alias("Alias1", "MyInt"),
            holder(Field::new("x", TypeReference::new("Alias1"), 0, 32)),
        ];
        let out = resolve_typedefs(&defs).unwrap();

        assert_eq!(out.len(), 1);
        let x = &out[0].fields()[0];
        assert_eq!(x.ty.fullname(), "int32_t");
        assert!(x.array_dims.is_empty());
        assert_eq!(x.size_in_bits, 32);
    }

    #[test]
    fn test_array_typedef_dims_are_appended() {
        let defs = vec![
            Definition::Typedef(
                TypedefDefinition::new("Row", TypeReference::new("float"))
                    .with_source("t.h:1")
                    .with_dims(vec![4]),
            ),
            holder(Field::new("rows", TypeReference::new("Row"), 0, 128).with_dims(vec![3])),
        ];
        let out = resolve_typedefs(&defs).unwrap();
        let rows = &out[0].fields()[0];

        assert_eq!(rows.ty.fullname(), "float");
        assert_eq!(rows.array_dims, vec![3, 4]);
        assert_eq!(rows.size_in_bits, 32);
        assert_eq!(rows.total_bits(), 3 * 128);
    }

    #[test]
    fn test_constant_type_resolved() {
        let defs = vec![
            alias("Count", "uint16_t"),
            Definition::Constant(
                ConstantDefinition::new("MAX", TypeReference::new("Count"), ConstantValue::Int(7)).with_source("t.h:3"),
            ),
        ];
        let out = resolve_typedefs(&defs).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].referenced_types()[0].fullname(), "uint16_t");
    }

    #[test]
    fn test_recursive_typedef() {
        let defs = vec![
            alias("A", "B"),
            alias("B", "A"),
            holder(Field::new("x", TypeReference::new("A"), 0, 32)),
        ];
        match resolve_typedefs(&defs) {
            Err(TransformError::RecursiveTypedef { name, chain }) => {
                assert_eq!(name, "A");
                assert_eq!(chain, vec!["A", "B", "A"]);
            }
            other => panic!("expected recursion error, got {:?}", other),
        }
    }

    #[test]
    fn test_idempotent() {
        let defs = vec![
            alias("MyInt", "int32_t"),
            holder(Field::new("x", TypeReference::new("MyInt"), 0, 32)),
        ];
        let once = resolve_typedefs(&defs).unwrap();
        let twice = resolve_typedefs(&once).unwrap();
        assert_eq!(once, twice);
    }
}
