// Tue Jan 20 2026 - Alex

use crate::ir::{Definition, DefinitionIndex};

/// Remove definitions that reference a type neither builtin nor defined,
/// repeating until nothing else drops out.
pub fn prune_unknown_types(definitions: &[Definition]) -> Vec<Definition> {
    let mut current = definitions.to_vec();
    let mut rounds = 0usize;

    loop {
        let index = DefinitionIndex::new(&current);
        let (kept, dropped): (Vec<&Definition>, Vec<&Definition>) = current
            .iter()
            .partition(|d| d.referenced_types().iter().all(|r| index.is_known(&r.fullname())));
        if dropped.is_empty() {
            break;
        }
        rounds += 1;
        for def in &dropped {
            log::trace!("Dropping {} (unknown referenced type)", def.fullname());
        }
        current = kept.into_iter().cloned().collect();
    }

    log::debug!(
        "Pruned {} definitions with unknown types in {} rounds",
        definitions.len() - current.len(),
        rounds
    );
    current
}
