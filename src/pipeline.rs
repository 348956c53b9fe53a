// Tue Jan 20 2026 - Alex

use crate::config::PipelineConfig;
use crate::dump::{BuildError, DefinitionBuilder, NodeTable};
use crate::graph::{reachable_from, topological_order, GraphError};
use crate::ir::Definition;
use crate::transform::{self, TransformError};
use crate::utils::logging::ScopedTimer;
use crate::validation::{LayoutError, LayoutValidator};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One step of the pipeline. Steps run in the order given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Pass {
    ExcludeSystem,
    FilterSources,
    FilterNames,
    PruneUnknown,
    Focus,
    ResolveTypedefs,
    FlattenNamespaces,
    FlattenStructs,
    RemoveEnums,
    FillBitfieldHoles,
    FillStructHolesWithBytes,
    SortTopologically,
    Validate,
}

impl Pass {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ExcludeSystem => "exclude_system",
            Self::FilterSources => "filter_sources",
            Self::FilterNames => "filter_names",
            Self::PruneUnknown => "prune_unknown",
            Self::Focus => "focus",
            Self::ResolveTypedefs => "resolve_typedefs",
            Self::FlattenNamespaces => "flatten_namespaces",
            Self::FlattenStructs => "flatten_structs",
            Self::RemoveEnums => "remove_enums",
            Self::FillBitfieldHoles => "fill_bitfield_holes",
            Self::FillStructHolesWithBytes => "fill_struct_holes_with_bytes",
            Self::SortTopologically => "sort_topologically",
            Self::Validate => "validate",
        }
    }

    /// Whether the pass can move or add fields.
    pub fn touches_layout(&self) -> bool {
        matches!(
            self,
            Self::ResolveTypedefs | Self::FlattenStructs | Self::FillBitfieldHoles | Self::FillStructHolesWithBytes
        )
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error("Layout check failed after {pass}: {source}")]
    Layout {
        pass: String,
        #[source]
        source: LayoutError,
    },
}

/// Runs the configured passes over one definition list.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The explicit pass list, or the selection implied by the config flags.
    pub fn passes(&self) -> Vec<Pass> {
        if !self.config.passes.is_empty() {
            return self.config.passes.clone();
        }

        let mut passes = Vec::new();
        if self.config.exclude_system {
            passes.push(Pass::ExcludeSystem);
        }
        if !self.config.include_sources.is_empty() || !self.config.exclude_sources.is_empty() {
            passes.push(Pass::FilterSources);
        }
        if !self.config.include_names.is_empty() || !self.config.exclude_names.is_empty() {
            passes.push(Pass::FilterNames);
        }
        if self.config.remove_unknown {
            passes.push(Pass::PruneUnknown);
        }
        if !self.config.focus.is_empty() {
            passes.push(Pass::Focus);
        }
        if !self.config.flatten_targets.is_empty() {
            passes.push(Pass::FlattenStructs);
        }
        passes.push(Pass::SortTopologically);
        passes
    }

    /// Build definitions from a dump, then run the passes.
    pub fn run_dump(&self, nodes: &NodeTable) -> Result<Vec<Definition>, PipelineError> {
        let definitions = {
            let _timer = ScopedTimer::new("build");
            DefinitionBuilder::new(nodes)
                .with_options(self.config.builder_options())
                .build()?
        };
        self.run(definitions)
    }

    pub fn run(&self, definitions: Vec<Definition>) -> Result<Vec<Definition>, PipelineError> {
        let mut current = definitions;
        let mut checked = false;

        for pass in self.passes() {
            let _timer = ScopedTimer::new(pass.name());
            let before = current.len();
            current = self.apply(pass, &current)?;
            log::debug!("{}: {} -> {} definitions", pass, before, current.len());

            checked = pass == Pass::Validate;
            if self.config.validate && pass.touches_layout() {
                self.check(&current, pass.name())?;
                checked = true;
            }
        }

        if self.config.validate && !checked {
            self.check(&current, "pipeline")?;
        }
        Ok(current)
    }

    pub fn apply(&self, pass: Pass, definitions: &[Definition]) -> Result<Vec<Definition>, PipelineError> {
        let config = &self.config;
        let result = match pass {
            Pass::ExcludeSystem => transform::exclude_system_headers(definitions),
            Pass::FilterSources => transform::filter_by_source(
                definitions,
                config.include_sources.as_slice(),
                config.exclude_sources.as_slice(),
            )?,
            Pass::FilterNames => transform::filter_by_name(
                definitions,
                config.include_names.as_slice(),
                config.exclude_names.as_slice(),
            )?,
            Pass::PruneUnknown => transform::prune_unknown_types(definitions),
            Pass::Focus => reachable_from(definitions, config.focus.as_slice())?,
            Pass::ResolveTypedefs => transform::resolve_typedefs(definitions)?,
            Pass::FlattenNamespaces => transform::flatten_namespaces(definitions, &config.separator),
            Pass::FlattenStructs => transform::flatten_structs(
                definitions,
                config.flatten_targets.as_slice(),
                &config.flatten_options(),
            )?,
            Pass::RemoveEnums => transform::remove_enums_strict(definitions, &config.fallback_enum_type)?,
            Pass::FillBitfieldHoles => transform::fill_bitfield_holes(definitions),
            Pass::FillStructHolesWithBytes => transform::fill_struct_holes_with_bytes(definitions)?,
            Pass::SortTopologically => topological_order(definitions)?,
            Pass::Validate => {
                self.check(definitions, "validate")?;
                definitions.to_vec()
            }
        };
        Ok(result)
    }

    fn check(&self, definitions: &[Definition], after: &str) -> Result<(), PipelineError> {
        LayoutValidator::new()
            .validate(definitions)
            .map_err(|source| PipelineError::Layout {
                pass: after.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{CompositeDefinition, EnumDefinition, Field, TypeReference, TypedefDefinition};

    fn sample() -> Vec<Definition> {
        vec![
            Definition::Class(
                CompositeDefinition::new("Main", 8, 4)
                    .with_namespace(&["app"])
                    .with_source("app.h:1")
                    .with_field(Field::new("mode", TypeReference::new("Mode"), 0, 32))
                    .with_field(Field::new("count", TypeReference::new("Count"), 32, 16)),
            ),
            Definition::Enum(EnumDefinition::new("Mode", 4).with_source("app.h:5").with_enumerator("On", 1)),
            Definition::Typedef(TypedefDefinition::new("Count", TypeReference::new("uint16_t")).with_source("app.h:7")),
            Definition::Class(
                CompositeDefinition::new("Orphan", 4, 4)
                    .with_source("app.h:9")
                    .with_field(Field::new("x", TypeReference::new("Missing"), 0, 32)),
            ),
        ]
    }

    #[test]
    fn test_default_passes() {
        let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
        assert_eq!(pipeline.passes(), vec![Pass::PruneUnknown, Pass::SortTopologically]);

        let out = pipeline.run(sample()).unwrap();
        let names: Vec<String> = out.iter().map(|d| d.fullname()).collect();
        assert_eq!(names, vec!["Mode", "Count", "app::Main"]);
    }

    #[test]
    fn test_explicit_pass_order() {
        let config = PipelineConfig::new().with_passes(vec![
            Pass::PruneUnknown,
            Pass::ResolveTypedefs,
            Pass::RemoveEnums,
            Pass::FlattenNamespaces,
            Pass::FillStructHolesWithBytes,
        ]);
        let out = Pipeline::new(config).unwrap().run(sample()).unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].fullname(), "app__Main");
        let fields: Vec<(String, String)> = out[0]
            .fields()
            .iter()
            .map(|f| (f.name.clone(), f.ty.fullname()))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("mode".to_string(), "int32_t".to_string()),
                ("count".to_string(), "uint16_t".to_string()),
                ("__pad0".to_string(), "uint8_t".to_string()),
            ]
        );
    }

    #[test]
    fn test_validation_failure_names_pass() {
        let config = PipelineConfig::new().with_passes(vec![Pass::ResolveTypedefs]);
        let err = Pipeline::new(config).unwrap().run(sample()).unwrap_err();
        match err {
            PipelineError::Layout { pass, source } => {
                assert_eq!(pass, "resolve_typedefs");
                assert!(matches!(source, LayoutError::UnknownType { .. }));
            }
            other => panic!("expected layout error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PipelineConfig::new().with_passes(vec![Pass::Focus]);
        assert!(matches!(Pipeline::new(config), Err(PipelineError::Config(_))));
    }
}
