// Tue Jan 20 2026 - Alex

use crate::ir::{Definition, TypeReference};
use crate::transform::TransformError;
use indexmap::IndexMap;

pub const DEFAULT_ENUM_TYPE: &str = "int";

struct EnumTable {
    by_fullname: IndexMap<String, String>,
    by_name: IndexMap<String, Vec<String>>,
}

enum Lookup<'t> {
    Found(&'t str),
    Ambiguous(&'t [String]),
    Missing,
}

impl EnumTable {
    fn new(definitions: &[Definition], fallback: &str) -> Self {
        let mut by_fullname = IndexMap::new();
        let mut by_name: IndexMap<String, Vec<String>> = IndexMap::new();
        for def in definitions {
            let Definition::Enum(e) = def else { continue };
            let fullname = def.fullname();
            let underlying = e.underlying_type().unwrap_or_else(|| fallback.to_string());

            // Anonymous enums are only reachable through their scope's fullname.
            if e.name.is_empty() {
                match by_fullname.get_mut(&fullname) {
                    Some(existing) if *existing != underlying => *existing = fallback.to_string(),
                    Some(_) => {}
                    None => {
                        by_fullname.insert(fullname, underlying);
                    }
                }
                continue;
            }
            by_name.entry(e.name.clone()).or_default().push(fullname.clone());
            by_fullname.insert(fullname, underlying);
        }
        Self { by_fullname, by_name }
    }

    fn lookup(&self, reference: &TypeReference) -> Lookup<'_> {
        if let Some(underlying) = self.by_fullname.get(&reference.fullname()) {
            return Lookup::Found(underlying);
        }
        if reference.is_qualified() {
            return Lookup::Missing;
        }
        match self.by_name.get(&reference.name).map(|v| v.as_slice()) {
            Some([only]) => self
                .by_fullname
                .get(only)
                .map(|u| Lookup::Found(u.as_str()))
                .unwrap_or(Lookup::Missing),
            Some(candidates) if candidates.len() > 1 => Lookup::Ambiguous(candidates),
            _ => Lookup::Missing,
        }
    }
}

/// Drop every enum and retype its uses as the enum's integer type.
///
/// A bare name shared by several enums in different namespaces is left as it
/// is, with a warning.
pub fn remove_enums(definitions: &[Definition], fallback: &str) -> Vec<Definition> {
    let (result, ambiguities) = erase_enums(definitions, fallback);
    for ambiguity in &ambiguities {
        log::warn!("{}, left unresolved", ambiguity);
    }
    result
}

/// Like [`remove_enums`], but an ambiguous bare name is an error.
pub fn remove_enums_strict(definitions: &[Definition], fallback: &str) -> Result<Vec<Definition>, TransformError> {
    let (result, ambiguities) = erase_enums(definitions, fallback);
    match ambiguities.into_iter().next() {
        Some(first) => Err(first),
        None => Ok(result),
    }
}

/// The erased list plus one `AmbiguousEnum` per reference left untouched.
fn erase_enums(definitions: &[Definition], fallback: &str) -> (Vec<Definition>, Vec<TransformError>) {
    let table = EnumTable::new(definitions, fallback);
    let mut result = Vec::with_capacity(definitions.len());
    let mut ambiguities = Vec::new();
    let mut rewritten = 0usize;

    for def in definitions {
        if matches!(def, Definition::Enum(_)) {
            continue;
        }

        let owner = def.fullname();
        let erased = def.map_type_refs(|reference| match table.lookup(reference) {
            Lookup::Found(underlying) => {
                rewritten += 1;
                TypeReference::new(underlying)
            }
            Lookup::Ambiguous(candidates) => {
                ambiguities.push(TransformError::AmbiguousEnum {
                    definition: owner.clone(),
                    field: field_of(def, reference),
                    name: reference.name.clone(),
                    candidates: candidates.to_vec(),
                });
                reference.clone()
            }
            Lookup::Missing => reference.clone(),
        });
        result.push(erased);
    }

    log::debug!(
        "Removed {} enums, retyped {} references",
        definitions.len() - result.len(),
        rewritten
    );
    (result, ambiguities)
}

fn field_of(def: &Definition, reference: &TypeReference) -> String {
    def.fields()
        .iter()
        .find(|f| &f.ty == reference)
        .map(|f| f.name.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{CompositeDefinition, EnumDefinition, Field, TypedefDefinition};
    use crate::validation::validate;

    fn color() -> Definition {
        Definition::Enum(
            EnumDefinition::new("Color", 1)
                .with_source("e.h:1")
                .with_enumerator("Red", 0)
                .with_enumerator("Green", 1),
        )
    }

    fn namespaced(ns: &str) -> Definition {
        let mut e = EnumDefinition::new("Mode", 4).with_source("e.h:5");
        e.namespace = vec![ns.to_string()];
        Definition::Enum(e)
    }

    fn user(ty: TypeReference) -> Definition {
        Definition::Class(
            CompositeDefinition::new("Pixel", 4, 4)
                .with_source("e.h:9")
                .with_field(Field::new("c", ty, 0, 8)),
        )
    }

    #[test]
    fn test_enum_replaced_by_underlying_type() {
        let defs = vec![color(), user(TypeReference::new("Color"))];
        let out = remove_enums(&defs, DEFAULT_ENUM_TYPE);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].fields()[0].ty.name, "int8_t");
        assert_eq!(out[0].fields()[0].size_in_bits, 8);
    }

    #[test]
    fn test_fallback_for_odd_sizes() {
        let odd = Definition::Enum(EnumDefinition::new("Odd", 3).with_source("e.h:2"));
        let alias = Definition::Typedef(TypedefDefinition::new("OddAlias", TypeReference::new("Odd")).with_source("e.h:3"));
        let out = remove_enums(&[odd, alias], "int32_t");
        assert_eq!(out[0].referenced_types()[0].name, "int32_t");
    }

    #[test]
    fn test_qualified_reference_and_unique_bare_name() {
        let defs = vec![namespaced("gfx"), user(TypeReference::with_namespace("Mode", &["gfx"]))];
        let out = remove_enums(&defs, DEFAULT_ENUM_TYPE);
        assert_eq!(out[0].fields()[0].ty.fullname(), "int32_t");

        let bare = vec![namespaced("gfx"), user(TypeReference::new("Mode"))];
        let out = remove_enums(&bare, DEFAULT_ENUM_TYPE);
        assert_eq!(out[0].fields()[0].ty.fullname(), "int32_t");
    }

    #[test]
    fn test_ambiguous_bare_name() {
        let defs = vec![namespaced("gfx"), namespaced("audio"), user(TypeReference::new("Mode"))];

        let lenient = remove_enums(&defs, DEFAULT_ENUM_TYPE);
        assert_eq!(lenient.len(), 1);
        assert_eq!(lenient[0].fields()[0].ty.fullname(), "Mode");

        match remove_enums_strict(&defs, DEFAULT_ENUM_TYPE) {
            Err(TransformError::AmbiguousEnum { definition, field, candidates, .. }) => {
                assert_eq!(definition, "Pixel");
                assert_eq!(field, "c");
                assert_eq!(candidates, vec!["gfx::Mode", "audio::Mode"]);
            }
            other => panic!("expected ambiguity error, got {:?}", other),
        }
    }

    #[test]
    fn test_anonymous_enum_in_struct_scope() {
        let mut anonymous = EnumDefinition::new("", 4).with_source("e.h:12").with_enumerator("A", 0);
        anonymous.namespace = vec!["S".to_string()];
        let holder = Definition::Class(
            CompositeDefinition::new("S", 4, 4)
                .with_source("e.h:11")
                .with_field(Field::new("mode", TypeReference::with_namespace("", &["S"]), 0, 32)),
        );
        let defs = vec![Definition::Enum(anonymous), holder];
        assert!(validate(&defs).is_ok());

        let out = remove_enums_strict(&defs, DEFAULT_ENUM_TYPE).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].fields()[0].ty, TypeReference::new("int32_t"));
        assert!(validate(&out).is_ok());
    }

    #[test]
    fn test_conflicting_anonymous_enums_use_fallback() {
        let scoped = |size: u64| {
            let mut e = EnumDefinition::new("", size).with_source("e.h:20");
            e.namespace = vec!["S".to_string()];
            Definition::Enum(e)
        };
        let defs = vec![scoped(1), scoped(4), user(TypeReference::with_namespace("", &["S"]))];
        let out = remove_enums(&defs, "int");
        assert_eq!(out[0].fields()[0].ty, TypeReference::new("int"));
    }
}
