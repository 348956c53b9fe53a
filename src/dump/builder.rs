// Mon Jan 19 2026 - Alex

use crate::dump::error::BuildError;
use crate::dump::node::{DumpNode, NodeKind, NodeTable, RecordNode};
use crate::dump::resolver::TypeResolver;
use crate::ir::type_ref::qualify;
use crate::ir::{
    CompositeDefinition, ConstantDefinition, ConstantValue, Definition, EnumDefinition, Enumerator,
    Field, TypedefDefinition,
};

/// What to do when a single declaration cannot be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionPolicy {
    /// Abort the whole build on the first failure.
    Strict,
    /// Skip the declaration, log it, and keep going.
    #[default]
    Lenient,
}

#[derive(Debug, Clone, Default)]
pub struct BuilderOptions {
    pub preserve_bool: bool,
    pub keep_typedef_names: bool,
    pub policy: ResolutionPolicy,
}

/// Turns a dump node table into layout definitions.
pub struct DefinitionBuilder<'a> {
    nodes: &'a NodeTable,
    options: BuilderOptions,
}

impl<'a> DefinitionBuilder<'a> {
    pub fn new(nodes: &'a NodeTable) -> Self {
        Self {
            nodes,
            options: BuilderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: BuilderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_policy(mut self, policy: ResolutionPolicy) -> Self {
        self.options.policy = policy;
        self
    }

    pub fn with_preserve_bool(mut self, preserve: bool) -> Self {
        self.options.preserve_bool = preserve;
        self
    }

    pub fn with_keep_typedef_names(mut self, keep: bool) -> Self {
        self.options.keep_typedef_names = keep;
        self
    }

    pub fn build(&self) -> Result<Vec<Definition>, BuildError> {
        self.build_with_diagnostics().map(|(definitions, _)| definitions)
    }

    /// Build every definition, also returning the declarations skipped under
    /// the lenient policy.
    pub fn build_with_diagnostics(&self) -> Result<(Vec<Definition>, Vec<BuildError>), BuildError> {
        let resolver = TypeResolver::new(self.nodes)
            .with_preserve_bool(self.options.preserve_bool)
            .with_stop_at_typedefs(self.options.keep_typedef_names);
        // Typedef targets always stop at the next alias so chains stay
        // visible to typedef resolution.
        let alias_resolver = TypeResolver::new(self.nodes)
            .with_preserve_bool(self.options.preserve_bool)
            .with_stop_at_typedefs(true);

        let mut definitions = Vec::new();
        let mut skipped = Vec::new();

        for node in self.nodes.iter() {
            let built = match &node.kind {
                NodeKind::Struct(record) | NodeKind::Class(record) => {
                    self.build_composite(&resolver, node, record).map(|c| c.map(Definition::Class))
                }
                NodeKind::Union(record) => {
                    self.build_composite(&resolver, node, record).map(|c| c.map(Definition::Union))
                }
                NodeKind::Enumeration { .. } => self.build_enum(&resolver, node),
                NodeKind::Typedef { .. } => self.build_typedef(&alias_resolver, node),
                NodeKind::Variable { .. } => self.build_constant(&resolver, node),
                _ => Ok(None),
            };

            match built {
                Ok(Some(definition)) => {
                    log::trace!("Built {}", definition);
                    definitions.push(definition);
                }
                Ok(None) => {}
                Err(e) => match self.options.policy {
                    ResolutionPolicy::Strict => return Err(e),
                    ResolutionPolicy::Lenient => {
                        log::warn!("Skipping {}: {}", e.definition(), e);
                        skipped.push(e);
                    }
                },
            }
        }

        log::debug!(
            "Built {} definitions from {} nodes ({} skipped)",
            definitions.len(),
            self.nodes.len(),
            skipped.len()
        );
        Ok((definitions, skipped))
    }

    fn build_composite(
        &self,
        resolver: &TypeResolver<'_>,
        node: &DumpNode,
        record: &RecordNode,
    ) -> Result<Option<CompositeDefinition>, BuildError> {
        if record.incomplete {
            return Ok(None);
        }
        let reference = resolver.aggregate_reference(node, &record.name);
        // Anonymous records without a naming typedef get no definition. A
        // parent field typed by one points at `Parent::` and the parent is
        // dropped later as referencing an unknown type.
        if reference.name.is_empty() {
            return Ok(None);
        }
        let label = reference.fullname();

        let size_bits = record.size.ok_or_else(|| BuildError::MissingAttribute {
            definition: label.clone(),
            attribute: "size",
        })?;
        if size_bits % 8 != 0 {
            return Err(BuildError::UnalignedSize {
                definition: label,
                size_bits,
            });
        }
        let alignment = match record.align {
            Some(bits) => bits / 8,
            None => {
                log::warn!("{} has no alignment, defaulting to 0", label);
                0
            }
        };
        let source = self.source_for(&label, record.file.as_ref(), record.line)?;

        let mut fields = Vec::new();
        for member_id in &record.members {
            let Some(member) = self.nodes.get(member_id) else { continue };
            let NodeKind::Field { name, ty, offset, bits, .. } = &member.kind else { continue };

            let resolved = resolver.resolve(ty).map_err(|source| BuildError::FieldType {
                definition: label.clone(),
                field: name.clone(),
                source,
            })?;

            let mut field = Field::new(name, resolved.base, *offset, resolved.size_bits)
                .with_dims(resolved.array_dims);
            if let Some(width) = bits {
                field.size_in_bits = *width;
                field.is_bitfield = true;
            }
            fields.push(field);
        }

        Ok(Some(CompositeDefinition {
            name: reference.name,
            namespace: reference.namespace,
            source,
            alignment,
            size: size_bits / 8,
            fields,
        }))
    }

    fn build_enum(&self, resolver: &TypeResolver<'_>, node: &DumpNode) -> Result<Option<Definition>, BuildError> {
        let NodeKind::Enumeration { name, size, values, file, line, .. } = &node.kind else {
            return Ok(None);
        };
        let reference = resolver.aggregate_reference(node, name);
        let label = reference.fullname();
        let source = self.source_for(&label, file.as_ref(), *line)?;

        Ok(Some(Definition::Enum(EnumDefinition {
            name: reference.name,
            namespace: reference.namespace,
            source,
            size: size / 8,
            enumerators: values.iter().map(|v| Enumerator::new(&v.name, v.init)).collect(),
        })))
    }

    fn build_typedef(&self, aliases: &TypeResolver<'_>, node: &DumpNode) -> Result<Option<Definition>, BuildError> {
        let NodeKind::Typedef { name, target, file, line, .. } = &node.kind else {
            return Ok(None);
        };
        let namespace = self.nodes.namespace_of(node);
        let label = qualify(&namespace, name);

        let aliased = aliases.resolve(target).map_err(|source| BuildError::Resolution {
            definition: label.clone(),
            source,
        })?;

        if aliased.base.name == *name && aliased.base.namespace == namespace {
            log::trace!("Dropping identity typedef {}", label);
            return Ok(None);
        }

        let source = self.source_for(&label, file.as_ref(), *line)?;
        Ok(Some(Definition::Typedef(TypedefDefinition {
            name: name.clone(),
            namespace,
            source,
            target: aliased.base,
            array_dims: aliased.array_dims,
        })))
    }

    fn build_constant(&self, resolver: &TypeResolver<'_>, node: &DumpNode) -> Result<Option<Definition>, BuildError> {
        let NodeKind::Variable { name, ty, init, file, line, .. } = &node.kind else {
            return Ok(None);
        };
        let Some(init) = init else {
            return Ok(None);
        };
        let namespace = self.nodes.namespace_of(node);
        let label = qualify(&namespace, name);

        let resolved = resolver.resolve(ty).map_err(|source| BuildError::Resolution {
            definition: label.clone(),
            source,
        })?;
        let source = self.source_for(&label, file.as_ref(), *line)?;

        Ok(Some(Definition::Constant(ConstantDefinition {
            name: name.clone(),
            namespace,
            source,
            ty: resolved.base,
            value: parse_constant_value(init),
        })))
    }

    fn source_for(&self, label: &str, file: Option<&String>, line: Option<u64>) -> Result<String, BuildError> {
        self.nodes
            .source_of(file, line)
            .ok_or_else(|| BuildError::MissingSource {
                definition: label.to_string(),
            })
    }
}

/// Parse a C initializer into an int, a float, or a string.
pub fn parse_constant_value(init: &str) -> ConstantValue {
    let text = init.trim();

    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return ConstantValue::Text(text[1..text.len() - 1].to_string());
        }
    }

    if let Some(value) = parse_int_literal(text) {
        return ConstantValue::Int(value);
    }

    let float_text = text.trim_end_matches(['f', 'F', 'l', 'L']);
    if float_text.contains(['.', 'e', 'E']) && !float_text.starts_with("0x") {
        match float_text.parse::<f64>() {
            Ok(value) if value.is_finite() => return ConstantValue::Float(value),
            _ => {}
        }
    }

    ConstantValue::Text(text.to_string())
}

fn parse_int_literal(text: &str) -> Option<i64> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let digits = body.trim_end_matches(['u', 'U', 'l', 'L']);
    if digits.is_empty() {
        return None;
    }

    let magnitude = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()?
    } else if digits.len() > 1 && digits.starts_with('0') {
        u64::from_str_radix(&digits[1..], 8).ok()?
    } else {
        digits.parse::<u64>().ok()?
    };

    if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    }
}
