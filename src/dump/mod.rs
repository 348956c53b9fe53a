// Mon Jan 19 2026 - Alex

pub mod node;
pub mod error;
pub mod normalize;
pub mod resolver;
pub mod builder;

pub use node::{DumpNode, NodeKind, NodeTable, NodeId, RecordNode, EnumValueNode};
pub use error::{ResolutionError, BuildError};
pub use normalize::normalize_integral;
pub use resolver::{TypeResolver, ResolvedType};
pub use builder::{DefinitionBuilder, BuilderOptions, ResolutionPolicy, parse_constant_value};
