// Mon Jan 19 2026 - Alex

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Name every pointer type is erased to.
pub const OPAQUE_POINTER: &str = "void*";

/// Type used for synthesized padding members.
pub const PAD_TYPE: &str = "uint8_t";

static BUILTIN_TYPES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "int8_t",
        "int16_t",
        "int32_t",
        "int64_t",
        "int128_t",
        "uint8_t",
        "uint16_t",
        "uint32_t",
        "uint64_t",
        "uint128_t",
        "float",
        "double",
        "long double",
        "bool",
        OPAQUE_POINTER,
    ]
    .into_iter()
    .collect()
});

/// True for terminal types that never need a definition.
pub fn is_builtin(fullname: &str) -> bool {
    BUILTIN_TYPES.contains(fullname)
}

pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    BUILTIN_TYPES.iter().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_set() {
        assert!(is_builtin("int128_t"));
        assert!(is_builtin("uint64_t"));
        assert!(is_builtin("long double"));
        assert!(is_builtin("void*"));
        assert!(!is_builtin("int"));
        assert!(!is_builtin("MyStruct"));
        assert_eq!(builtin_names().count(), 15);
    }
}
