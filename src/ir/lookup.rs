// Mon Jan 19 2026 - Alex

use crate::ir::{is_builtin, CompositeDefinition, Definition};
use indexmap::IndexMap;

/// Fullname index over a borrowed definition list.
///
/// Built fresh for every pass invocation and dropped on return. Several
/// definitions may share a fullname (anonymous enums, a struct and its
/// same-named typedef), so each key maps to every matching position.
pub struct DefinitionIndex<'a> {
    definitions: &'a [Definition],
    by_fullname: IndexMap<String, Vec<usize>>,
}

impl<'a> DefinitionIndex<'a> {
    pub fn new(definitions: &'a [Definition]) -> Self {
        let mut by_fullname: IndexMap<String, Vec<usize>> = IndexMap::new();
        for (idx, def) in definitions.iter().enumerate() {
            by_fullname.entry(def.fullname()).or_default().push(idx);
        }
        Self {
            definitions,
            by_fullname,
        }
    }

    pub fn len(&self) -> usize {
        self.by_fullname.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_fullname.is_empty()
    }

    pub fn contains(&self, fullname: &str) -> bool {
        self.by_fullname.contains_key(fullname)
    }

    /// Builtin or defined in the indexed list.
    pub fn is_known(&self, fullname: &str) -> bool {
        is_builtin(fullname) || self.contains(fullname)
    }

    pub fn get(&self, fullname: &str) -> Option<&'a Definition> {
        self.by_fullname
            .get(fullname)
            .and_then(|indices| indices.first())
            .map(|&idx| &self.definitions[idx])
    }

    pub fn get_all(&self, fullname: &str) -> impl Iterator<Item = &'a Definition> + '_ {
        let definitions = self.definitions;
        self.by_fullname
            .get(fullname)
            .into_iter()
            .flatten()
            .map(move |&idx| &definitions[idx])
    }

    /// First struct or union registered under `fullname`.
    pub fn composite(&self, fullname: &str) -> Option<&'a CompositeDefinition> {
        self.get_all(fullname).find_map(|d| d.as_composite())
    }

    pub fn fullnames(&self) -> impl Iterator<Item = &str> {
        self.by_fullname.keys().map(|k| k.as_str())
    }
}

pub fn find_by_name<'a>(definitions: &'a [Definition], name: &str) -> Option<&'a Definition> {
    definitions.iter().find(|d| d.name() == name)
}

pub fn find_by_fullname<'a>(definitions: &'a [Definition], fullname: &str) -> Option<&'a Definition> {
    definitions.iter().find(|d| d.fullname() == fullname)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{EnumDefinition, TypeReference, TypedefDefinition};

    fn sample() -> Vec<Definition> {
        vec![
            Definition::Class(CompositeDefinition::new("Node", 8, 4).with_namespace(&["net"])),
            Definition::Typedef(TypedefDefinition::new("Node", TypeReference::with_namespace("Node", &["net"]))),
            Definition::Enum(EnumDefinition::new("", 4)),
            Definition::Enum(EnumDefinition::new("", 4)),
        ]
    }

    #[test]
    fn test_index_lookup() {
        let defs = sample();
        let index = DefinitionIndex::new(&defs);

        assert_eq!(index.len(), 3);
        assert!(index.contains("net::Node"));
        assert!(index.composite("net::Node").is_some());
        assert!(index.composite("Node").is_none());
        assert_eq!(index.get_all("").count(), 2);
        assert!(index.is_known("uint16_t"));
        assert!(!index.is_known("Missing"));
    }

    #[test]
    fn test_find_helpers() {
        let defs = sample();
        assert_eq!(find_by_name(&defs, "Node").map(|d| d.fullname()), Some("net::Node".to_string()));
        assert!(find_by_fullname(&defs, "Node").is_some());
        assert!(find_by_fullname(&defs, "other::Node").is_none());
    }
}
