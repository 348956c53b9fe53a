// Wed Jan 21 2026 - Alex

use abi_layout_ir::dump::normalize_integral;
use abi_layout_ir::graph::reachable_from;
use abi_layout_ir::ir::{
    is_builtin, CompositeDefinition, ConstantDefinition, ConstantValue, Definition, EnumDefinition, Field,
    TypeReference, TypedefDefinition,
};
use abi_layout_ir::output::{decode, encode, IrCodec};
use abi_layout_ir::transform::{fill_struct_holes_with_bytes, resolve_typedefs};
use abi_layout_ir::validation::validate;
use proptest::prelude::*;

const SCALARS: &[(&str, u64)] = &[("int8_t", 8), ("uint16_t", 16), ("int32_t", 32), ("float", 32), ("uint64_t", 64)];

fn ident() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,6}"
}

fn scalar() -> impl Strategy<Value = (&'static str, u64)> {
    prop::sample::select(SCALARS)
}

/// A class whose fields are laid out back to back with byte-sized gaps.
fn gapped_class() -> impl Strategy<Value = Definition> {
    (ident(), prop::collection::vec((scalar(), 0u64..4, 1u64..3), 1..6), 0u64..4).prop_map(
        |(name, specs, tail_bytes)| {
            let mut offset = 0u64;
            let mut fields = Vec::new();
            for (i, ((ty, bits), gap_bytes, count)) in specs.into_iter().enumerate() {
                offset += gap_bytes * 8;
                let mut field = Field::new(&format!("f{}", i), TypeReference::new(ty), offset, bits);
                if count > 1 {
                    field = field.with_dims(vec![count]);
                }
                offset += field.total_bits();
                fields.push(field);
            }
            let size = offset / 8 + tail_bytes;
            Definition::Class(
                CompositeDefinition::new(&name, size, 1)
                    .with_source("gen.h:1")
                    .with_fields(fields),
            )
        },
    )
}

fn constant_value() -> impl Strategy<Value = ConstantValue> {
    prop_oneof![
        any::<i64>().prop_map(ConstantValue::Int),
        (-4000i32..4000).prop_map(|n| ConstantValue::Float(n as f64 / 4.0)),
        "[a-z ]{0,8}".prop_map(ConstantValue::Text),
    ]
}

fn any_definition() -> impl Strategy<Value = Definition> {
    prop_oneof![
        gapped_class(),
        (ident(), prop::collection::vec((ident(), any::<i32>()), 0..4)).prop_map(|(name, values)| {
            let mut e = EnumDefinition::new(&name, 4).with_source("gen.h:2");
            for (label, value) in values {
                e = e.with_enumerator(&label, value as i64);
            }
            Definition::Enum(e)
        }),
        (ident(), scalar(), prop::collection::vec(1u64..5, 0..3)).prop_map(|(name, (ty, _), dims)| {
            Definition::Typedef(
                TypedefDefinition::new(&name, TypeReference::with_namespace(ty, &[]))
                    .with_source("gen.h:3")
                    .with_dims(dims),
            )
        }),
        (ident(), constant_value()).prop_map(|(name, value)| {
            Definition::Constant(
                ConstantDefinition::new(&name, TypeReference::new("int64_t"), value).with_source("gen.h:4"),
            )
        }),
    ]
}

/// A chain `T0 -> scalar`, `T1 -> T0`, ... plus a holder using the last alias.
fn typedef_chain() -> impl Strategy<Value = Vec<Definition>> {
    (scalar(), prop::collection::vec(prop::collection::vec(1u64..4, 0..2), 1..5)).prop_map(|((base, bits), links)| {
        let mut defs = Vec::new();
        let mut target = base.to_string();
        let mut total_elements = 1u64;
        for (i, dims) in links.into_iter().enumerate() {
            let name = format!("T{}", i);
            total_elements *= dims.iter().product::<u64>();
            defs.push(Definition::Typedef(
                TypedefDefinition::new(&name, TypeReference::new(&target))
                    .with_source("chain.h:1")
                    .with_dims(dims),
            ));
            target = name;
        }
        let size_bytes = bits * total_elements / 8;
        defs.push(Definition::Class(
            CompositeDefinition::new("Holder", size_bytes, 1)
                .with_source("chain.h:9")
                .with_field(Field::new("x", TypeReference::new(&target), 0, bits * total_elements)),
        ));
        defs
    })
}

/// Classes `C0..Cn` where each field points at an earlier class or a builtin.
fn class_dag() -> impl Strategy<Value = Vec<Definition>> {
    prop::collection::vec(prop::collection::vec(prop::option::of(any::<prop::sample::Index>()), 1..4), 1..8).prop_map(
        |classes| {
            classes
                .into_iter()
                .enumerate()
                .map(|(i, refs)| {
                    let fields: Vec<Field> = refs
                        .into_iter()
                        .enumerate()
                        .map(|(j, target)| {
                            let ty = match target {
                                Some(index) if i > 0 => format!("C{}", index.index(i)),
                                _ => "int32_t".to_string(),
                            };
                            Field::new(&format!("m{}", j), TypeReference::new(&ty), j as u64 * 32, 32)
                        })
                        .collect();
                    let size = fields.len() as u64 * 4;
                    Definition::Class(
                        CompositeDefinition::new(&format!("C{}", i), size, 4)
                            .with_source("dag.h:1")
                            .with_fields(fields),
                    )
                })
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn prop_typedef_resolution_idempotent(defs in typedef_chain()) {
        let once = resolve_typedefs(&defs).unwrap();
        let twice = resolve_typedefs(&once).unwrap();
        prop_assert_eq!(&twice, &once);

        let x = &once[0].fields()[0];
        prop_assert!(is_builtin(&x.ty.fullname()));
        let before = defs.last().unwrap().fields()[0].total_bits();
        prop_assert_eq!(x.total_bits(), before);
    }

    #[test]
    fn prop_json_round_trip(defs in prop::collection::vec(any_definition(), 0..6)) {
        let text = encode(&defs).unwrap();
        prop_assert_eq!(&decode(&text).unwrap(), &defs);

        let compact = IrCodec::new().with_pretty_print(false);
        let line = compact.encode(&defs).unwrap();
        prop_assert_eq!(compact.encode(&compact.decode(&line).unwrap()).unwrap(), line);
    }

    #[test]
    fn prop_byte_padding_covers_every_bit(class in gapped_class()) {
        prop_assert!(validate(std::slice::from_ref(&class)).is_ok());

        let padded = fill_struct_holes_with_bytes(std::slice::from_ref(&class)).unwrap();
        let composite = padded[0].as_composite().unwrap();
        let mut cursor = 0u64;
        for field in composite.sorted_fields() {
            prop_assert_eq!(field.bit_offset, cursor);
            cursor = field.end_bit();
        }
        prop_assert_eq!(cursor, composite.size * 8);
        prop_assert!(validate(&padded).is_ok());
    }

    #[test]
    fn prop_accepted_classes_never_overlap(class in gapped_class()) {
        prop_assume!(validate(std::slice::from_ref(&class)).is_ok());
        let fields = class.fields();
        for (i, a) in fields.iter().enumerate() {
            for b in &fields[i + 1..] {
                prop_assert!(a.end_bit() <= b.bit_offset || b.end_bit() <= a.bit_offset);
            }
        }
    }

    #[test]
    fn prop_reachability_is_closed(defs in class_dag(), pick in any::<prop::sample::Index>()) {
        let root = defs[pick.index(defs.len())].fullname();
        let reached = reachable_from(&defs, &[root.as_str()]).unwrap();
        let names: Vec<String> = reached.iter().map(|d| d.fullname()).collect();

        prop_assert!(names.contains(&root));
        for def in &reached {
            for ty in def.referenced_types() {
                let name = ty.fullname();
                prop_assert!(is_builtin(&name) || names.contains(&name), "{} escapes the result", name);
            }
        }
    }

    #[test]
    fn prop_normalization_ignores_token_order(bits in prop::sample::select(vec![8u64, 16, 32, 64, 128])) {
        let a = normalize_integral("unsigned long int", bits, false);
        let b = normalize_integral("long unsigned int", bits, false);
        let c = normalize_integral("int unsigned long", bits, false);
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(&b, &c);
        prop_assert_eq!(a, format!("uint{}_t", bits));
    }
}

#[test]
fn test_normalization_examples() {
    assert_eq!(normalize_integral("unsigned long", 64, false), "uint64_t");
    assert_eq!(normalize_integral("long unsigned", 64, false), "uint64_t");
    assert_eq!(normalize_integral("bool", 8, true), "bool");
    assert_eq!(normalize_integral("bool", 8, false), "uint8_t");
    assert_eq!(normalize_integral("long double", 128, false), "long double");
}
