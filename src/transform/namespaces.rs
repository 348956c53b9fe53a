// Tue Jan 20 2026 - Alex

use crate::ir::Definition;

pub const DEFAULT_SEPARATOR: &str = "__";

/// Fold every namespace into the definition name.
pub fn flatten_namespaces(definitions: &[Definition], separator: &str) -> Vec<Definition> {
    flatten_namespaces_matching(definitions, separator, |_| true)
}

/// Fold namespaces only for definitions accepted by `select`.
///
/// The rewrite of a definition touches nothing but that definition: its own
/// name and the references it embeds. A subset can therefore be flattened
/// without a global rename table.
pub fn flatten_namespaces_matching<F>(definitions: &[Definition], separator: &str, select: F) -> Vec<Definition>
where
    F: Fn(&Definition) -> bool,
{
    let mut flattened = 0usize;
    let result: Vec<Definition> = definitions
        .iter()
        .map(|def| {
            if !select(def) {
                return def.clone();
            }
            flattened += 1;
            def.renamed(&def.type_ref().flattened(separator))
                .map_type_refs(|reference| reference.flattened(separator))
        })
        .collect();
    log::debug!("Flattened namespaces of {} definitions", flattened);
    result
}
