// Mon Jan 19 2026 - Alex

use crate::dump::error::ResolutionError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type NodeId = String;

/// Name the compiler dump gives the global namespace.
pub const GLOBAL_NAMESPACE: &str = "::";

/// One node of the compiler layout dump. Sizes and alignments are in bits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DumpNode {
    pub id: NodeId,
    #[serde(flatten)]
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordNode {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub context: Option<NodeId>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub align: Option<u64>,
    #[serde(default)]
    pub members: Vec<NodeId>,
    #[serde(default)]
    pub file: Option<NodeId>,
    #[serde(default)]
    pub line: Option<u64>,
    #[serde(default)]
    pub incomplete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumValueNode {
    pub name: String,
    pub init: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum NodeKind {
    FundamentalType {
        name: String,
        size: u64,
        align: u64,
    },
    Typedef {
        name: String,
        #[serde(rename = "type")]
        target: NodeId,
        #[serde(default)]
        context: Option<NodeId>,
        #[serde(default)]
        file: Option<NodeId>,
        #[serde(default)]
        line: Option<u64>,
    },
    PointerType {
        #[serde(rename = "type")]
        pointee: NodeId,
        size: u64,
        align: u64,
    },
    CvQualifiedType {
        #[serde(rename = "type")]
        target: NodeId,
    },
    ElaboratedType {
        #[serde(rename = "type")]
        target: NodeId,
    },
    ArrayType {
        #[serde(rename = "type")]
        element: NodeId,
        /// Highest valid index; absent for flexible arrays.
        #[serde(default)]
        max: Option<i64>,
    },
    Struct(RecordNode),
    Class(RecordNode),
    Union(RecordNode),
    Enumeration {
        #[serde(default)]
        name: String,
        #[serde(default)]
        context: Option<NodeId>,
        size: u64,
        align: u64,
        #[serde(default)]
        values: Vec<EnumValueNode>,
        #[serde(default)]
        file: Option<NodeId>,
        #[serde(default)]
        line: Option<u64>,
    },
    Field {
        name: String,
        #[serde(rename = "type")]
        ty: NodeId,
        offset: u64,
        #[serde(default)]
        bits: Option<u64>,
        #[serde(default)]
        context: Option<NodeId>,
    },
    Variable {
        name: String,
        #[serde(rename = "type")]
        ty: NodeId,
        #[serde(default)]
        init: Option<String>,
        #[serde(default)]
        context: Option<NodeId>,
        #[serde(default)]
        file: Option<NodeId>,
        #[serde(default)]
        line: Option<u64>,
    },
    Namespace {
        name: String,
        #[serde(default)]
        context: Option<NodeId>,
    },
    File {
        name: String,
    },
    /// Any node kind the layout model has no use for (functions, methods...).
    Unsupported {
        tag: String,
    },
}

impl NodeKind {
    pub fn tag(&self) -> &str {
        match self {
            Self::FundamentalType { .. } => "FundamentalType",
            Self::Typedef { .. } => "Typedef",
            Self::PointerType { .. } => "PointerType",
            Self::CvQualifiedType { .. } => "CvQualifiedType",
            Self::ElaboratedType { .. } => "ElaboratedType",
            Self::ArrayType { .. } => "ArrayType",
            Self::Struct(_) => "Struct",
            Self::Class(_) => "Class",
            Self::Union(_) => "Union",
            Self::Enumeration { .. } => "Enumeration",
            Self::Field { .. } => "Field",
            Self::Variable { .. } => "Variable",
            Self::Namespace { .. } => "Namespace",
            Self::File { .. } => "File",
            Self::Unsupported { tag } => tag.as_str(),
        }
    }

    pub fn as_record(&self) -> Option<&RecordNode> {
        match self {
            Self::Struct(r) | Self::Class(r) | Self::Union(r) => Some(r),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::FundamentalType { name, .. }
            | Self::Typedef { name, .. }
            | Self::Enumeration { name, .. }
            | Self::Field { name, .. }
            | Self::Variable { name, .. }
            | Self::Namespace { name, .. }
            | Self::File { name } => Some(name.as_str()),
            Self::Struct(r) | Self::Class(r) | Self::Union(r) => Some(r.name.as_str()),
            _ => None,
        }
    }

    pub fn context(&self) -> Option<&NodeId> {
        match self {
            Self::Typedef { context, .. }
            | Self::Enumeration { context, .. }
            | Self::Field { context, .. }
            | Self::Variable { context, .. }
            | Self::Namespace { context, .. } => context.as_ref(),
            Self::Struct(r) | Self::Class(r) | Self::Union(r) => r.context.as_ref(),
            _ => None,
        }
    }
}

/// Id-indexed view of a dump, in input order.
#[derive(Debug, Clone, Default)]
pub struct NodeTable {
    nodes: IndexMap<NodeId, DumpNode>,
    /// Anonymous record id -> typedef node that names it.
    anonymous_aliases: HashMap<NodeId, NodeId>,
}

impl NodeTable {
    pub fn new(nodes: Vec<DumpNode>) -> Self {
        let mut table = Self::default();
        for node in nodes {
            table.nodes.insert(node.id.clone(), node);
        }
        table.index_anonymous_aliases();
        table
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let nodes: Vec<DumpNode> = serde_json::from_str(text)?;
        Ok(Self::new(nodes))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&DumpNode> {
        self.nodes.get(id)
    }

    pub fn require(&self, id: &str) -> Result<&DumpNode, ResolutionError> {
        self.get(id).ok_or_else(|| ResolutionError::NodeNotFound(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DumpNode> {
        self.nodes.values()
    }

    /// Typedef giving a name to an otherwise anonymous struct/union/enum.
    pub fn anonymous_alias(&self, record_id: &str) -> Option<&DumpNode> {
        self.anonymous_aliases.get(record_id).and_then(|id| self.get(id))
    }

    /// Names of the enclosing namespaces and records, outermost first.
    pub fn namespace_of(&self, node: &DumpNode) -> Vec<String> {
        let mut namespace = Vec::new();
        let mut context = node.kind.context().cloned();
        let mut hops = 0;

        while let Some(id) = context {
            let Some(parent) = self.get(&id) else { break };
            match &parent.kind {
                NodeKind::Namespace { name, .. } if name != GLOBAL_NAMESPACE && !name.is_empty() => {
                    namespace.push(name.clone());
                }
                NodeKind::Struct(r) | NodeKind::Class(r) if !r.name.is_empty() => {
                    namespace.push(r.name.clone());
                }
                _ => {}
            }
            context = parent.kind.context().cloned();
            hops += 1;
            if hops > self.nodes.len() {
                break;
            }
        }

        namespace.reverse();
        namespace
    }

    /// `file:line` for a declaration, if the dump carries both.
    pub fn source_of(&self, file: Option<&NodeId>, line: Option<u64>) -> Option<String> {
        let file_node = self.get(file?)?;
        match &file_node.kind {
            NodeKind::File { name } if !name.is_empty() => Some(format!("{}:{}", name, line?)),
            _ => None,
        }
    }

    fn index_anonymous_aliases(&mut self) {
        let mut aliases = HashMap::new();
        for node in self.nodes.values() {
            let NodeKind::Typedef { target, .. } = &node.kind else { continue };
            let target_id = self.unwrap_elaborated(target);
            let Some(target_node) = self.get(target_id) else { continue };
            let anonymous = match &target_node.kind {
                NodeKind::Struct(r) | NodeKind::Class(r) | NodeKind::Union(r) => r.name.is_empty(),
                NodeKind::Enumeration { name, .. } => name.is_empty(),
                _ => false,
            };
            if anonymous {
                aliases.entry(target_id.to_string()).or_insert_with(|| node.id.clone());
            }
        }
        self.anonymous_aliases = aliases;
    }

    fn unwrap_elaborated<'a>(&'a self, mut id: &'a str) -> &'a str {
        for _ in 0..self.nodes.len() {
            match self.get(id).map(|n| &n.kind) {
                Some(NodeKind::ElaboratedType { target }) | Some(NodeKind::CvQualifiedType { target }) => {
                    id = target.as_str();
                }
                _ => break,
            }
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, kind: NodeKind) -> DumpNode {
        DumpNode { id: id.to_string(), kind }
    }

    #[test]
    fn test_namespace_of_skips_global() {
        let table = NodeTable::new(vec![
            node("_1", NodeKind::Namespace { name: "::".to_string(), context: None }),
            node("_2", NodeKind::Namespace { name: "Outer".to_string(), context: Some("_1".to_string()) }),
            node("_3", NodeKind::Namespace { name: "Inner".to_string(), context: Some("_2".to_string()) }),
            node(
                "_4",
                NodeKind::Struct(RecordNode {
                    name: "B".to_string(),
                    context: Some("_3".to_string()),
                    size: Some(32),
                    align: Some(32),
                    members: Vec::new(),
                    file: None,
                    line: None,
                    incomplete: false,
                }),
            ),
        ]);

        let b = table.get("_4").unwrap();
        assert_eq!(table.namespace_of(b), vec!["Outer".to_string(), "Inner".to_string()]);
    }

    #[test]
    fn test_source_of() {
        let table = NodeTable::new(vec![node("f1", NodeKind::File { name: "types.h".to_string() })]);
        assert_eq!(table.source_of(Some(&"f1".to_string()), Some(12)).as_deref(), Some("types.h:12"));
        assert_eq!(table.source_of(Some(&"f9".to_string()), Some(12)), None);
        assert_eq!(table.source_of(None, Some(12)), None);
    }

    #[test]
    fn test_from_json() {
        let text = r#"[
            {"id": "_1", "kind": "FundamentalType", "name": "int", "size": 32, "align": 32},
            {"id": "_2", "kind": "ArrayType", "type": "_1", "max": 3},
            {"id": "_3", "kind": "Unsupported", "tag": "FunctionType"}
        ]"#;
        let table = NodeTable::from_json(text).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("_2").unwrap().kind.tag(), "ArrayType");
        assert_eq!(table.get("_3").unwrap().kind.tag(), "FunctionType");
    }

    #[test]
    fn test_anonymous_alias() {
        let table = NodeTable::new(vec![
            node(
                "_5",
                NodeKind::Struct(RecordNode {
                    name: String::new(),
                    context: None,
                    size: Some(32),
                    align: Some(32),
                    members: Vec::new(),
                    file: None,
                    line: None,
                    incomplete: false,
                }),
            ),
            node("_6", NodeKind::ElaboratedType { target: "_5".to_string() }),
            node(
                "_7",
                NodeKind::Typedef {
                    name: "Handle".to_string(),
                    target: "_6".to_string(),
                    context: None,
                    file: None,
                    line: None,
                },
            ),
        ]);

        let alias = table.anonymous_alias("_5").unwrap();
        assert_eq!(alias.id, "_7");
    }
}
