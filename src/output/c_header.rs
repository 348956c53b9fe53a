// Tue Jan 20 2026 - Alex

use crate::ir::{CompositeDefinition, ConstantValue, Definition, EnumDefinition, Field, TypeReference};

/// Renders definitions as a flat C header. Namespaces collapse into the
/// identifier with `__`.
pub struct CHeaderEmitter {
    indent: String,
    extern_c: bool,
}

impl CHeaderEmitter {
    pub fn new() -> Self {
        Self {
            indent: "    ".to_string(),
            extern_c: true,
        }
    }

    pub fn with_indent(mut self, width: usize) -> Self {
        self.indent = " ".repeat(width);
        self
    }

    pub fn with_extern_c(mut self, enabled: bool) -> Self {
        self.extern_c = enabled;
        self
    }

    pub fn emit(&self, definitions: &[Definition]) -> String {
        let mut lines: Vec<String> = vec!["#pragma once".to_string(), "#include <stdint.h>".to_string()];
        if uses_bool(definitions) {
            lines.push("#include <stdbool.h>".to_string());
        }
        if self.extern_c {
            lines.extend(["#ifdef __cplusplus", "extern \"C\" {", "#endif"].map(String::from));
        }
        lines.push(String::new());

        for def in definitions {
            match def {
                Definition::Class(c) => self.emit_composite("struct", &flat_name(&def.type_ref()), c, &mut lines),
                Definition::Union(u) => self.emit_composite("union", &flat_name(&def.type_ref()), u, &mut lines),
                Definition::Enum(e) => self.emit_enum(&flat_name(&def.type_ref()), e, &mut lines),
                Definition::Typedef(t) => {
                    lines.push(format!(
                        "typedef {} {}{};",
                        flat_name(&t.target),
                        flat_name(&def.type_ref()),
                        dims_suffix(&t.array_dims)
                    ));
                    lines.push(String::new());
                }
                Definition::Constant(c) => {
                    lines.push(format!("#define {} {}", flat_name(&def.type_ref()), constant_literal(&c.value)));
                }
            }
        }

        if self.extern_c {
            lines.push(String::new());
            lines.extend(["#ifdef __cplusplus", "} // extern \"C\"", "#endif"].map(String::from));
        }
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }

    fn emit_composite(&self, keyword: &str, name: &str, composite: &CompositeDefinition, lines: &mut Vec<String>) {
        lines.push(format!("typedef {} {} {{", keyword, name));
        for field in &composite.fields {
            lines.push(format!("{}{};", self.indent, declare_field(field)));
        }
        lines.push(format!("}} {};", name));
        lines.push(String::new());
    }

    fn emit_enum(&self, name: &str, enumeration: &EnumDefinition, lines: &mut Vec<String>) {
        if name.is_empty() {
            lines.push("enum {".to_string());
        } else {
            lines.push(format!("typedef enum {} {{", name));
        }
        for enumerator in &enumeration.enumerators {
            let constant = if name.is_empty() {
                enumerator.name.clone()
            } else {
                format!("{}_{}", name, enumerator.name)
            };
            lines.push(format!("{}{} = {},", self.indent, constant, enumerator.value));
        }
        if name.is_empty() {
            lines.push("};".to_string());
        } else {
            lines.push(format!("}} {};", name));
        }
        lines.push(String::new());
    }
}

impl Default for CHeaderEmitter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn emit_c_header(definitions: &[Definition]) -> String {
    CHeaderEmitter::new().emit(definitions)
}

fn flat_name(reference: &TypeReference) -> String {
    reference.flattened("__").name
}

fn dims_suffix(dims: &[u64]) -> String {
    dims.iter().map(|d| format!("[{}]", d)).collect()
}

fn declare_field(field: &Field) -> String {
    let mut declaration = format!("{} {}{}", flat_name(&field.ty), field.name, dims_suffix(&field.array_dims));
    if field.is_bitfield {
        declaration.push_str(&format!(" : {}", field.size_in_bits));
    }
    declaration
}

fn constant_literal(value: &ConstantValue) -> String {
    match value {
        ConstantValue::Text(s) if s.chars().count() == 1 => format!("'{}'", s.escape_default()),
        ConstantValue::Text(s) => format!("\"{}\"", s.escape_default()),
        other => other.to_string(),
    }
}

fn uses_bool(definitions: &[Definition]) -> bool {
    definitions
        .iter()
        .flat_map(|d| d.referenced_types())
        .any(|t| t.name == "bool" && t.namespace.is_empty())
}
