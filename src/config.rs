// Tue Jan 20 2026 - Alex

use crate::dump::{BuilderOptions, ResolutionPolicy};
use crate::pipeline::Pass;
use crate::transform::{compile_patterns, FlattenOptions};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub preserve_bool: bool,
    pub keep_typedef_names: bool,
    pub lenient: bool,
    pub separator: String,
    pub fallback_enum_type: String,
    pub unroll_arrays: bool,
    pub flatten_targets: Vec<String>,
    pub focus: Vec<String>,
    pub include_sources: Vec<String>,
    pub exclude_sources: Vec<String>,
    pub include_names: Vec<String>,
    pub exclude_names: Vec<String>,
    pub exclude_system: bool,
    pub remove_unknown: bool,
    pub validate: bool,
    pub passes: Vec<Pass>,
    pub jobs: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            preserve_bool: false,
            keep_typedef_names: false,
            lenient: true,
            separator: "__".to_string(),
            fallback_enum_type: "int".to_string(),
            unroll_arrays: false,
            flatten_targets: Vec::new(),
            focus: Vec::new(),
            include_sources: Vec::new(),
            exclude_sources: Vec::new(),
            include_names: Vec::new(),
            exclude_names: Vec::new(),
            exclude_system: false,
            remove_unknown: true,
            validate: true,
            passes: Vec::new(),
            jobs: num_cpus::get(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        Ok(config)
    }

    pub fn with_passes(mut self, passes: Vec<Pass>) -> Self {
        self.passes = passes;
        self
    }

    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }

    pub fn with_focus(mut self, roots: Vec<String>) -> Self {
        self.focus = roots;
        self
    }

    pub fn with_flatten_targets(mut self, targets: Vec<String>) -> Self {
        self.flatten_targets = targets;
        self
    }

    pub fn with_unroll_arrays(mut self, unroll: bool) -> Self {
        self.unroll_arrays = unroll;
        self
    }

    pub fn with_preserve_bool(mut self, preserve: bool) -> Self {
        self.preserve_bool = preserve;
        self
    }

    pub fn with_keep_typedef_names(mut self, keep: bool) -> Self {
        self.keep_typedef_names = keep;
        self
    }

    pub fn with_lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    pub fn with_remove_unknown(mut self, remove: bool) -> Self {
        self.remove_unknown = remove;
        self
    }

    pub fn with_validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    pub fn with_exclude_system(mut self, exclude: bool) -> Self {
        self.exclude_system = exclude;
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn builder_options(&self) -> BuilderOptions {
        BuilderOptions {
            preserve_bool: self.preserve_bool,
            keep_typedef_names: self.keep_typedef_names,
            policy: if self.lenient {
                ResolutionPolicy::Lenient
            } else {
                ResolutionPolicy::Strict
            },
        }
    }

    pub fn flatten_options(&self) -> FlattenOptions {
        FlattenOptions::new()
            .with_separator(&self.separator)
            .with_unroll_arrays(self.unroll_arrays)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.separator.is_empty() {
            return Err("separator must not be empty".to_string());
        }
        if self.fallback_enum_type.is_empty() {
            return Err("fallback_enum_type must not be empty".to_string());
        }
        if self.jobs == 0 {
            return Err("jobs must be greater than 0".to_string());
        }
        if self.passes.contains(&Pass::FlattenStructs) && self.flatten_targets.is_empty() {
            return Err("flatten_structs requires at least one flatten target".to_string());
        }
        if self.passes.contains(&Pass::Focus) && self.focus.is_empty() {
            return Err("focus requires at least one root".to_string());
        }
        for patterns in [
            &self.include_sources,
            &self.exclude_sources,
            &self.include_names,
            &self.exclude_names,
        ] {
            compile_patterns(patterns.as_slice()).map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}
