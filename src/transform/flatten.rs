// Tue Jan 20 2026 - Alex

use crate::ir::{Definition, DefinitionIndex, Field};
use crate::transform::TransformError;

/// Options for [`flatten_structs`].
#[derive(Debug, Clone)]
pub struct FlattenOptions {
    pub separator: String,
    pub unroll_arrays: bool,
}

impl FlattenOptions {
    pub fn new() -> Self {
        Self {
            separator: "__".to_string(),
            unroll_arrays: false,
        }
    }

    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }

    pub fn with_unroll_arrays(mut self, unroll: bool) -> Self {
        self.unroll_arrays = unroll;
        self
    }
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self::new()
    }
}

struct Flattener<'a> {
    index: DefinitionIndex<'a>,
    options: &'a FlattenOptions,
    owner: String,
    stack: Vec<String>,
}

impl<'a> Flattener<'a> {
    /// Emit `field` under `name` at `offset`, inlining it when its type is a
    /// struct or union of the set.
    fn expand(&mut self, field: &Field, name: String, offset: u64, out: &mut Vec<Field>) -> Result<(), TransformError> {
        let type_name = field.ty.fullname();
        let Some(nested) = self.index.composite(&type_name) else {
            out.push(Field {
                name,
                bit_offset: offset,
                ..field.clone()
            });
            return Ok(());
        };

        if field.is_array() {
            let count = field.element_count();
            if !self.options.unroll_arrays || count == 0 {
                out.push(Field {
                    name,
                    bit_offset: offset,
                    ..field.clone()
                });
                return Ok(());
            }
            let stride = nested.size_in_bits();
            for linear in 0..count {
                let suffix = unravel(linear, &field.array_dims)
                    .iter()
                    .map(|i| i.to_string())
                    .collect::<Vec<_>>()
                    .join(&self.options.separator);
                let element_name = format!("{}{}{}", name, self.options.separator, suffix);
                let element = Field {
                    array_dims: Vec::new(),
                    ..field.clone()
                };
                self.expand(&element, element_name, offset + linear * stride, out)?;
            }
            return Ok(());
        }

        if self.stack.contains(&type_name) {
            return Err(TransformError::RecursiveComposite {
                definition: self.owner.clone(),
                composite: type_name,
            });
        }

        self.stack.push(type_name);
        for inner in &nested.fields {
            let inner_name = format!("{}{}{}", name, self.options.separator, inner.name);
            self.expand(inner, inner_name, offset + inner.bit_offset, out)?;
        }
        self.stack.pop();
        Ok(())
    }
}

/// Row-major indices of element `linear` in an array of `dims`.
fn unravel(mut linear: u64, dims: &[u64]) -> Vec<u64> {
    let mut indices = vec![0; dims.len()];
    for (slot, &dim) in indices.iter_mut().zip(dims).rev() {
        *slot = linear % dim;
        linear /= dim;
    }
    indices
}

/// Inline nested struct/union members into each targeted definition.
///
/// Offsets add up, so the physical layout is untouched. Targets are matched by
/// fullname; at least one of them must exist.
pub fn flatten_structs<S: AsRef<str>>(
    definitions: &[Definition],
    targets: &[S],
    options: &FlattenOptions,
) -> Result<Vec<Definition>, TransformError> {
    let index = DefinitionIndex::new(definitions);
    let wanted: Vec<&str> = targets.iter().map(|t| t.as_ref()).collect();
    if !wanted.iter().any(|t| index.composite(t).is_some()) {
        return Err(TransformError::NoMatch {
            targets: wanted.iter().map(|t| t.to_string()).collect(),
        });
    }

    let mut flattener = Flattener {
        index,
        options,
        owner: String::new(),
        stack: Vec::new(),
    };
    let mut result = Vec::with_capacity(definitions.len());

    for def in definitions {
        let fullname = def.fullname();
        let composite = match def {
            Definition::Class(c) | Definition::Union(c) if wanted.contains(&fullname.as_str()) => c,
            _ => {
                result.push(def.clone());
                continue;
            }
        };

        flattener.owner = fullname.clone();
        flattener.stack = vec![fullname];
        let mut fields = Vec::with_capacity(composite.fields.len());
        for field in &composite.fields {
            flattener.expand(field, field.name.clone(), field.bit_offset, &mut fields)?;
        }
        log::debug!(
            "Flattened {}: {} -> {} fields",
            flattener.owner,
            composite.fields.len(),
            fields.len()
        );

        let mut flattened = composite.clone();
        flattened.fields = fields;
        result.push(match def {
            Definition::Union(_) => Definition::Union(flattened),
            _ => Definition::Class(flattened),
        });
    }

    Ok(result)
}
