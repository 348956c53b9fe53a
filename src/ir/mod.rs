// Mon Jan 19 2026 - Alex

pub mod type_ref;
pub mod field;
pub mod definition;
pub mod builtins;
pub mod lookup;

pub use type_ref::TypeReference;
pub use field::{Field, Enumerator};
pub use definition::{
    Definition, DefinitionKind, ClassDefinition, UnionDefinition, CompositeDefinition,
    EnumDefinition, TypedefDefinition, ConstantDefinition, ConstantValue,
};
pub use builtins::{is_builtin, OPAQUE_POINTER, PAD_TYPE};
pub use lookup::{DefinitionIndex, find_by_name, find_by_fullname};
