// Mon Jan 19 2026 - Alex

use crate::ir::type_ref::qualify;
use crate::ir::{Enumerator, Field, TypeReference};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Struct/class or union layout. Sizes are in bytes, offsets in bits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeDefinition {
    pub name: String,
    #[serde(default)]
    pub namespace: Vec<String>,
    #[serde(default)]
    pub source: String,
    pub alignment: u64,
    pub size: u64,
    #[serde(default)]
    pub fields: Vec<Field>,
}

pub type ClassDefinition = CompositeDefinition;
pub type UnionDefinition = CompositeDefinition;

impl CompositeDefinition {
    pub fn new(name: &str, size: u64, alignment: u64) -> Self {
        Self {
            name: name.to_string(),
            namespace: Vec::new(),
            source: String::new(),
            alignment,
            size,
            fields: Vec::new(),
        }
    }

    pub fn with_namespace(mut self, namespace: &[&str]) -> Self {
        self.namespace = namespace.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }

    pub fn size_in_bits(&self) -> u64 {
        self.size * 8
    }

    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields ordered by bit offset. Ties keep declaration order.
    pub fn sorted_fields(&self) -> Vec<&Field> {
        let mut sorted: Vec<&Field> = self.fields.iter().collect();
        sorted.sort_by_key(|f| f.bit_offset);
        sorted
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDefinition {
    pub name: String,
    #[serde(default)]
    pub namespace: Vec<String>,
    #[serde(default)]
    pub source: String,
    pub size: u64,
    #[serde(default)]
    pub enumerators: Vec<Enumerator>,
}

impl EnumDefinition {
    pub fn new(name: &str, size: u64) -> Self {
        Self {
            name: name.to_string(),
            namespace: Vec::new(),
            source: String::new(),
            size,
            enumerators: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    pub fn with_enumerator(mut self, name: &str, value: i64) -> Self {
        self.enumerators.push(Enumerator::new(name, value));
        self
    }

    /// Fixed-width integer able to hold every enumerator, when the size is a
    /// standard integer width.
    pub fn underlying_type(&self) -> Option<String> {
        let bits = match self.size {
            1 => 8u32,
            2 => 16,
            4 => 32,
            8 => 64,
            _ => return None,
        };
        let signed_max = if bits == 64 { i64::MAX } else { (1i64 << (bits - 1)) - 1 };
        let exceeds_signed = self.enumerators.iter().any(|e| e.value > signed_max);
        let prefix = if exceeds_signed { "u" } else { "" };
        Some(format!("{}int{}_t", prefix, bits))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedefDefinition {
    pub name: String,
    #[serde(default)]
    pub namespace: Vec<String>,
    #[serde(default)]
    pub source: String,
    pub target: TypeReference,
    #[serde(default)]
    pub array_dims: Vec<u64>,
}

impl TypedefDefinition {
    pub fn new(name: &str, target: TypeReference) -> Self {
        Self {
            name: name.to_string(),
            namespace: Vec::new(),
            source: String::new(),
            target,
            array_dims: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    pub fn with_dims(mut self, dims: Vec<u64>) -> Self {
        self.array_dims = dims;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstantValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{:?}", v),
            Self::Text(s) => write!(f, "{:?}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantDefinition {
    pub name: String,
    #[serde(default)]
    pub namespace: Vec<String>,
    #[serde(default)]
    pub source: String,
    #[serde(rename = "type")]
    pub ty: TypeReference,
    pub value: ConstantValue,
}

impl ConstantDefinition {
    pub fn new(name: &str, ty: TypeReference, value: ConstantValue) -> Self {
        Self {
            name: name.to_string(),
            namespace: Vec::new(),
            source: String::new(),
            ty,
            value,
        }
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    Class,
    Union,
    Enum,
    Typedef,
    Constant,
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Class => "class",
            Self::Union => "union",
            Self::Enum => "enum",
            Self::Typedef => "typedef",
            Self::Constant => "constant",
        };
        write!(f, "{}", s)
    }
}

/// One declaration of the layout IR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Definition {
    Class(ClassDefinition),
    Union(UnionDefinition),
    Enum(EnumDefinition),
    Typedef(TypedefDefinition),
    Constant(ConstantDefinition),
}

impl Definition {
    pub fn kind(&self) -> DefinitionKind {
        match self {
            Self::Class(_) => DefinitionKind::Class,
            Self::Union(_) => DefinitionKind::Union,
            Self::Enum(_) => DefinitionKind::Enum,
            Self::Typedef(_) => DefinitionKind::Typedef,
            Self::Constant(_) => DefinitionKind::Constant,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Class(d) | Self::Union(d) => &d.name,
            Self::Enum(d) => &d.name,
            Self::Typedef(d) => &d.name,
            Self::Constant(d) => &d.name,
        }
    }

    pub fn namespace(&self) -> &[String] {
        match self {
            Self::Class(d) | Self::Union(d) => &d.namespace,
            Self::Enum(d) => &d.namespace,
            Self::Typedef(d) => &d.namespace,
            Self::Constant(d) => &d.namespace,
        }
    }

    pub fn source(&self) -> &str {
        match self {
            Self::Class(d) | Self::Union(d) => &d.source,
            Self::Enum(d) => &d.source,
            Self::Typedef(d) => &d.source,
            Self::Constant(d) => &d.source,
        }
    }

    pub fn fullname(&self) -> String {
        qualify(self.namespace(), self.name())
    }

    pub fn type_ref(&self) -> TypeReference {
        TypeReference {
            name: self.name().to_string(),
            namespace: self.namespace().to_vec(),
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeDefinition> {
        match self {
            Self::Class(d) | Self::Union(d) => Some(d),
            _ => None,
        }
    }

    pub fn is_composite(&self) -> bool {
        self.as_composite().is_some()
    }

    pub fn fields(&self) -> &[Field] {
        self.as_composite().map(|c| c.fields.as_slice()).unwrap_or(&[])
    }

    /// Every type this definition refers to, in declaration order.
    pub fn referenced_types(&self) -> Vec<&TypeReference> {
        match self {
            Self::Class(d) | Self::Union(d) => d.fields.iter().map(|f| &f.ty).collect(),
            Self::Typedef(d) => vec![&d.target],
            Self::Constant(d) => vec![&d.ty],
            Self::Enum(_) => Vec::new(),
        }
    }

    /// Copy of this definition with its own name and namespace replaced.
    pub fn renamed(&self, to: &TypeReference) -> Definition {
        let mut renamed = self.clone();
        let (name, namespace) = match &mut renamed {
            Self::Class(d) | Self::Union(d) => (&mut d.name, &mut d.namespace),
            Self::Enum(d) => (&mut d.name, &mut d.namespace),
            Self::Typedef(d) => (&mut d.name, &mut d.namespace),
            Self::Constant(d) => (&mut d.name, &mut d.namespace),
        };
        *name = to.name.clone();
        *namespace = to.namespace.clone();
        renamed
    }

    /// Copy of this definition with every embedded type reference passed
    /// through `rewrite`.
    pub fn map_type_refs<F>(&self, mut rewrite: F) -> Definition
    where
        F: FnMut(&TypeReference) -> TypeReference,
    {
        let mut mapped = self.clone();
        match &mut mapped {
            Self::Class(d) | Self::Union(d) => {
                for field in &mut d.fields {
                    field.ty = rewrite(&field.ty);
                }
            }
            Self::Typedef(d) => d.target = rewrite(&d.target),
            Self::Constant(d) => d.ty = rewrite(&d.ty),
            Self::Enum(_) => {}
        }
        mapped
    }
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.fullname())?;
        match self {
            Self::Class(d) | Self::Union(d) => {
                write!(f, " (size {}, align {}, {} fields)", d.size, d.alignment, d.fields.len())
            }
            Self::Enum(d) => write!(f, " (size {}, {} enumerators)", d.size, d.enumerators.len()),
            Self::Typedef(d) => write!(f, " = {}", d.target),
            Self::Constant(d) => write!(f, ": {} = {}", d.ty, d.value),
        }
    }
}
