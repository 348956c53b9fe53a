// Tue Jan 20 2026 - Alex

pub mod error;
pub mod typedefs;
pub mod namespaces;
pub mod padding;
pub mod flatten;
pub mod enums;
pub mod filter;
pub mod unknown;

pub use error::TransformError;
pub use typedefs::{resolve_typedefs, ResolvedAlias, TypedefMap};
pub use namespaces::{flatten_namespaces, flatten_namespaces_matching, DEFAULT_SEPARATOR};
pub use padding::{fill_bitfield_holes, fill_struct_holes_with_bytes, PadCounter};
pub use flatten::{flatten_structs, FlattenOptions};
pub use enums::{remove_enums, remove_enums_strict, DEFAULT_ENUM_TYPE};
pub use filter::{
    compile_patterns, exclude_system_headers, filter_by_name, filter_by_source, is_system_source,
    system_include_patterns, PatternFilter,
};
pub use unknown::prune_unknown_types;
