// Tue Jan 20 2026 - Alex

use crate::config::PipelineConfig;
use crate::pipeline::Pass;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "abi-layout")]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Build and reshape ABI layout definitions from compiler dumps", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// JSON pipeline configuration; command line flags override it.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Dump JSON to layout IR JSON.
    Build(BuildArgs),
    /// Layout IR JSON through the pass pipeline.
    Transform(TransformArgs),
    /// Report every layout issue.
    Validate(ValidateArgs),
    /// Layout IR JSON to a flat C header.
    Header(HeaderArgs),
}

/// Input/output selection shared by every subcommand.
#[derive(clap::Args, Debug, Clone)]
pub struct IoArgs {
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output file; only valid with a single input. Defaults to stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write one output per input into this directory.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

impl IoArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.output.is_some() && self.inputs.len() > 1 {
            return Err("--output takes a single input; use --out-dir".to_string());
        }
        if self.output.is_some() && self.out_dir.is_some() {
            return Err("--output and --out-dir are mutually exclusive".to_string());
        }
        for input in &self.inputs {
            if !input.exists() {
                return Err(format!("Input file does not exist: {:?}", input));
            }
        }
        Ok(())
    }

    /// Where the result for `input` goes; `None` means stdout.
    pub fn destination(&self, input: &Path, extension: &str) -> Option<PathBuf> {
        if let Some(output) = &self.output {
            return Some(output.clone());
        }
        let dir = self.out_dir.as_ref()?;
        let stem = input.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        Some(dir.join(format!("{}.{}", stem, extension)))
    }
}

/// Pipeline switches that override the configuration file.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PipelineArgs {
    /// Passes to run, in order.
    #[arg(short, long = "pass", value_enum)]
    pub passes: Vec<Pass>,

    #[arg(long)]
    pub separator: Option<String>,

    /// Keep only what these fullnames reach.
    #[arg(long)]
    pub focus: Vec<String>,

    #[arg(long = "flatten")]
    pub flatten_targets: Vec<String>,

    #[arg(long)]
    pub unroll_arrays: bool,

    #[arg(long)]
    pub fallback_enum_type: Option<String>,

    #[arg(long)]
    pub include_source: Vec<String>,

    #[arg(long)]
    pub exclude_source: Vec<String>,

    #[arg(long)]
    pub include_name: Vec<String>,

    #[arg(long)]
    pub exclude_name: Vec<String>,

    #[arg(long)]
    pub exclude_system: bool,

    #[arg(long)]
    pub keep_unknown: bool,

    #[arg(long)]
    pub no_validate: bool,

    #[arg(short, long)]
    pub jobs: Option<usize>,

    #[arg(long)]
    pub compact: bool,
}

impl PipelineArgs {
    pub fn apply(&self, mut config: PipelineConfig) -> PipelineConfig {
        if !self.passes.is_empty() {
            config.passes = self.passes.clone();
        }
        if let Some(separator) = &self.separator {
            config.separator = separator.clone();
        }
        if !self.focus.is_empty() {
            config.focus = self.focus.clone();
        }
        if !self.flatten_targets.is_empty() {
            config.flatten_targets = self.flatten_targets.clone();
        }
        if let Some(fallback) = &self.fallback_enum_type {
            config.fallback_enum_type = fallback.clone();
        }
        config.include_sources.extend(self.include_source.iter().cloned());
        config.exclude_sources.extend(self.exclude_source.iter().cloned());
        config.include_names.extend(self.include_name.iter().cloned());
        config.exclude_names.extend(self.exclude_name.iter().cloned());
        config.unroll_arrays |= self.unroll_arrays;
        config.exclude_system |= self.exclude_system;
        if self.keep_unknown {
            config.remove_unknown = false;
        }
        if self.no_validate {
            config.validate = false;
        }
        if let Some(jobs) = self.jobs {
            config.jobs = jobs;
        }
        config
    }
}

#[derive(Parser, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub io: IoArgs,

    #[command(flatten)]
    pub pipeline: PipelineArgs,

    /// Keep `bool` instead of rewriting it to `uint8_t`.
    #[arg(long)]
    pub preserve_bool: bool,

    /// Leave typedef names on fields for a later resolve_typedefs pass.
    #[arg(long)]
    pub keep_typedef_names: bool,

    /// Abort on the first declaration that cannot be resolved.
    #[arg(long)]
    pub strict: bool,
}

impl BuildArgs {
    pub fn apply(&self, config: PipelineConfig) -> PipelineConfig {
        let mut config = self.pipeline.apply(config);
        config.preserve_bool |= self.preserve_bool;
        config.keep_typedef_names |= self.keep_typedef_names;
        if self.strict {
            config.lenient = false;
        }
        config
    }
}

#[derive(Parser, Debug)]
pub struct TransformArgs {
    #[command(flatten)]
    pub io: IoArgs,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Skip the known-type check.
    #[arg(long)]
    pub no_type_check: bool,
}

#[derive(Parser, Debug)]
pub struct HeaderArgs {
    #[command(flatten)]
    pub io: IoArgs,

    #[arg(long)]
    pub no_extern_c: bool,
}
