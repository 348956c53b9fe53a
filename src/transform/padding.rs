// Tue Jan 20 2026 - Alex

use crate::ir::{CompositeDefinition, Definition, Field, TypeReference, PAD_TYPE};
use crate::transform::TransformError;
use std::convert::Infallible;

/// Hands out `__pad0`, `__pad1`, ... for one pass invocation.
#[derive(Debug, Default)]
pub struct PadCounter {
    next: usize,
}

impl PadCounter {
    pub fn new() -> Self {
        Self { next: 0 }
    }

    pub fn next_name(&mut self) -> String {
        let name = format!("__pad{}", self.next);
        self.next += 1;
        name
    }

    pub fn issued(&self) -> usize {
        self.next
    }
}

/// Cover every hole with a `uint8_t` bitfield of exactly the gap width.
pub fn fill_bitfield_holes(definitions: &[Definition]) -> Vec<Definition> {
    let mut counter = PadCounter::new();
    let result = fill_holes(definitions, |_, start, bits| -> Result<Field, Infallible> {
        Ok(Field::new(&counter.next_name(), TypeReference::new(PAD_TYPE), start, bits).with_bitfield())
    });
    log::debug!("Inserted {} bitfield pads", counter.issued());
    match result {
        Ok(padded) => padded,
        Err(never) => match never {},
    }
}

/// Cover every hole with `uint8_t` bytes: a scalar for one byte, an array
/// otherwise. Holes that are not whole bytes are rejected.
pub fn fill_struct_holes_with_bytes(definitions: &[Definition]) -> Result<Vec<Definition>, TransformError> {
    let mut counter = PadCounter::new();
    let result = fill_holes(definitions, |owner, start, bits| {
        if bits % 8 != 0 {
            return Err(TransformError::ByteAlignment {
                definition: owner.to_string(),
                offset: start,
                bits,
            });
        }
        let bytes = bits / 8;
        let pad = Field::new(&counter.next_name(), TypeReference::new(PAD_TYPE), start, 8);
        Ok(if bytes > 1 { pad.with_dims(vec![bytes]) } else { pad })
    })?;
    log::debug!("Inserted {} byte pads", counter.issued());
    Ok(result)
}

fn fill_holes<F, E>(definitions: &[Definition], mut make_pad: F) -> Result<Vec<Definition>, E>
where
    F: FnMut(&str, u64, u64) -> Result<Field, E>,
{
    let mut result = Vec::with_capacity(definitions.len());
    for def in definitions {
        match def {
            Definition::Class(c) if !c.fields.is_empty() => {
                result.push(Definition::Class(pad_class(&def.fullname(), c, &mut make_pad)?));
            }
            Definition::Union(u) if !u.fields.is_empty() => {
                result.push(Definition::Union(pad_union(&def.fullname(), u, &mut make_pad)?));
            }
            _ => result.push(def.clone()),
        }
    }
    Ok(result)
}

fn pad_class<F, E>(owner: &str, class: &CompositeDefinition, make_pad: &mut F) -> Result<CompositeDefinition, E>
where
    F: FnMut(&str, u64, u64) -> Result<Field, E>,
{
    let mut fields = Vec::with_capacity(class.fields.len() + 1);
    let mut covered_end = 0u64;

    for field in class.sorted_fields() {
        if field.bit_offset > covered_end {
            fields.push(make_pad(owner, covered_end, field.bit_offset - covered_end)?);
        }
        fields.push(field.clone());
        covered_end = covered_end.max(field.end_bit());
    }

    let size_bits = class.size_in_bits();
    if size_bits > covered_end {
        fields.push(make_pad(owner, covered_end, size_bits - covered_end)?);
    }

    Ok(CompositeDefinition {
        fields,
        ..class.clone()
    })
}

/// Members all start at bit 0, so the only hole is past the largest one.
/// It is covered by a member spanning the whole union.
fn pad_union<F, E>(owner: &str, union: &CompositeDefinition, make_pad: &mut F) -> Result<CompositeDefinition, E>
where
    F: FnMut(&str, u64, u64) -> Result<Field, E>,
{
    let mut fields = union.sorted_fields().into_iter().cloned().collect::<Vec<_>>();
    let largest = fields.iter().map(|f| f.end_bit()).max().unwrap_or(0);
    let size_bits = union.size_in_bits();
    if size_bits > largest {
        fields.push(make_pad(owner, 0, size_bits)?);
    }

    Ok(CompositeDefinition {
        fields,
        ..union.clone()
    })
}
