// Tue Jan 20 2026 - Alex

use crate::graph::GraphError;
use crate::ir::Definition;
use indexmap::{IndexMap, IndexSet};

/// Fullname to the fullnames it references. Builtins appear only as targets.
pub type Adjacency = IndexMap<String, IndexSet<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Reference graph over one definition list, built per call.
pub struct DependencyGraph<'a> {
    definitions: &'a [Definition],
    edges: Adjacency,
}

impl<'a> DependencyGraph<'a> {
    pub fn new(definitions: &'a [Definition]) -> Self {
        let mut edges = Adjacency::new();
        for def in definitions {
            let targets = edges.entry(def.fullname()).or_default();
            for reference in def.referenced_types() {
                targets.insert(reference.fullname());
            }
        }
        Self { definitions, edges }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn contains(&self, fullname: &str) -> bool {
        self.edges.contains_key(fullname)
    }

    pub fn dependencies(&self, fullname: &str) -> impl Iterator<Item = &str> {
        self.edges.get(fullname).into_iter().flatten().map(|s| s.as_str())
    }

    pub fn edges(&self) -> &Adjacency {
        &self.edges
    }

    pub fn into_edges(self) -> Adjacency {
        self.edges
    }

    /// Fullnames with every dependency listed before its dependents.
    pub fn sorted_names(&self) -> Result<Vec<String>, GraphError> {
        let mut marks: IndexMap<&str, Mark> = IndexMap::new();
        let mut order = Vec::with_capacity(self.edges.len());
        let mut path = Vec::new();

        for node in self.edges.keys() {
            self.visit(node, &mut marks, &mut path, &mut order)?;
        }
        Ok(order)
    }

    fn visit<'g>(
        &'g self,
        node: &'g str,
        marks: &mut IndexMap<&'g str, Mark>,
        path: &mut Vec<String>,
        order: &mut Vec<String>,
    ) -> Result<(), GraphError> {
        let Some((key, targets)) = self.edges.get_key_value(node) else {
            return Ok(());
        };
        match marks.get(key.as_str()) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => {
                path.push(key.clone());
                return Err(GraphError::CyclicDependency {
                    node: key.clone(),
                    path: path.clone(),
                });
            }
            None => {}
        }

        marks.insert(key.as_str(), Mark::Visiting);
        path.push(key.clone());
        for target in targets {
            self.visit(target.as_str(), marks, path, order)?;
        }
        path.pop();
        marks.insert(key.as_str(), Mark::Done);
        order.push(key.clone());
        Ok(())
    }

    /// Every definition in dependency order. Definitions sharing a fullname
    /// stay together in input order.
    pub fn topological_order(&self) -> Result<Vec<&'a Definition>, GraphError> {
        let names = self.sorted_names()?;
        let mut grouped: IndexMap<String, Vec<&'a Definition>> = IndexMap::new();
        for def in self.definitions {
            grouped.entry(def.fullname()).or_default().push(def);
        }

        let mut ordered = Vec::with_capacity(self.definitions.len());
        for name in names {
            if let Some(group) = grouped.swap_remove(&name) {
                ordered.extend(group);
            }
        }
        Ok(ordered)
    }

    /// Fullnames reachable from `roots`, roots included.
    pub fn reachable_names<S: AsRef<str>>(&self, roots: &[S]) -> Result<IndexSet<String>, GraphError> {
        let mut stack: Vec<&str> = Vec::new();
        for root in roots {
            let root = root.as_ref();
            if self.contains(root) {
                stack.push(root);
            } else {
                log::warn!("Root '{}' is not defined", root);
            }
        }
        if stack.is_empty() {
            return Err(GraphError::NoMatch {
                roots: roots.iter().map(|r| r.as_ref().to_string()).collect(),
            });
        }

        let mut reached = IndexSet::new();
        while let Some(node) = stack.pop() {
            if !reached.insert(node.to_string()) {
                continue;
            }
            for target in self.dependencies(node) {
                if self.contains(target) && !reached.contains(target) {
                    stack.push(target);
                }
            }
        }
        Ok(reached)
    }

    /// Definitions reachable from `roots`, in input order.
    pub fn reachable_from<S: AsRef<str>>(&self, roots: &[S]) -> Result<Vec<&'a Definition>, GraphError> {
        let reached = self.reachable_names(roots)?;
        let kept: Vec<&'a Definition> = self
            .definitions
            .iter()
            .filter(|d| reached.contains(&d.fullname()))
            .collect();
        log::debug!("Reachability kept {} of {} definitions", kept.len(), self.definitions.len());
        Ok(kept)
    }
}

pub fn build_graph(definitions: &[Definition]) -> Adjacency {
    DependencyGraph::new(definitions).into_edges()
}

pub fn topological_order(definitions: &[Definition]) -> Result<Vec<Definition>, GraphError> {
    let graph = DependencyGraph::new(definitions);
    Ok(graph.topological_order()?.into_iter().cloned().collect())
}

pub fn reachable_from<S: AsRef<str>>(definitions: &[Definition], roots: &[S]) -> Result<Vec<Definition>, GraphError> {
    let graph = DependencyGraph::new(definitions);
    Ok(graph.reachable_from(roots)?.into_iter().cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{CompositeDefinition, Field, TypeReference, TypedefDefinition};

    fn class(name: &str, deps: &[&str]) -> Definition {
        let fields = deps
            .iter()
            .enumerate()
            .map(|(i, dep)| Field::new(&format!("f{}", i), TypeReference::new(dep), i as u64 * 32, 32))
            .collect();
        Definition::Class(
            CompositeDefinition::new(name, 4 * deps.len().max(1) as u64, 4)
                .with_source("g.h:1")
                .with_fields(fields),
        )
    }

    fn chain() -> Vec<Definition> {
        vec![
            class("Main", &["Payload", "int32_t"]),
            class("Unused", &["float"]),
            class("Payload", &["Wrapper"]),
            class("Wrapper", &["Nested"]),
            class("Nested", &["uint8_t"]),
        ]
    }

    fn names(defs: &[Definition]) -> Vec<String> {
        defs.iter().map(|d| d.fullname()).collect()
    }

    #[test]
    fn test_build_graph() {
        let graph = build_graph(&chain());
        assert_eq!(graph.len(), 5);
        let main: Vec<&str> = graph["Main"].iter().map(|s| s.as_str()).collect();
        assert_eq!(main, vec!["Payload", "int32_t"]);
        assert!(!graph.contains_key("int32_t"));
    }

    #[test]
    fn test_topological_order_puts_dependencies_first() {
        let ordered = names(&topological_order(&chain()).unwrap());
        let pos = |n: &str| ordered.iter().position(|x| x == n).unwrap();
        assert!(pos("Nested") < pos("Wrapper"));
        assert!(pos("Wrapper") < pos("Payload"));
        assert!(pos("Payload") < pos("Main"));
        assert_eq!(ordered.len(), 5);
    }

    #[test]
    fn test_cycle_detected() {
        let defs = vec![class("A", &["B"]), class("B", &["A"])];
        match topological_order(&defs) {
            Err(GraphError::CyclicDependency { node, path }) => {
                assert_eq!(node, "A");
                assert_eq!(path, vec!["A", "B", "A"]);
            }
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_reachable_from_excludes_unrelated() {
        let kept = names(&reachable_from(&chain(), &["Main"]).unwrap());
        assert_eq!(kept, vec!["Main", "Payload", "Wrapper", "Nested"]);
    }

    #[test]
    fn test_reachable_through_typedef() {
        let mut defs = chain();
        defs.push(Definition::Typedef(
            TypedefDefinition::new("Handle", TypeReference::new("Wrapper")).with_source("g.h:9"),
        ));
        let kept = names(&reachable_from(&defs, &["Handle"]).unwrap());
        assert_eq!(kept, vec!["Wrapper", "Nested", "Handle"]);
    }

    #[test]
    fn test_no_match() {
        let err = reachable_from(&chain(), &["Mian"]).unwrap_err();
        assert_eq!(err, GraphError::NoMatch { roots: vec!["Mian".to_string()] });

        let partial = reachable_from(&chain(), &["Mian", "Nested"]).unwrap();
        assert_eq!(names(&partial), vec!["Nested"]);
    }
}
