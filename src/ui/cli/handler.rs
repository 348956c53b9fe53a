// Tue Jan 20 2026 - Alex

use super::args::{Args, BuildArgs, Command, HeaderArgs, IoArgs, TransformArgs, ValidateArgs};
use crate::config::PipelineConfig;
use crate::dump::NodeTable;
use crate::ir::Definition;
use crate::output::{CHeaderEmitter, IrCodec};
use crate::pipeline::Pipeline;
use crate::utils::{pluralize, LoggingUtils};
use crate::validation::{LayoutReport, LayoutValidator};
use anyhow::Context;
use colored::Colorize;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

pub struct CommandHandler {
    quiet: bool,
}

impl CommandHandler {
    pub fn new() -> Self {
        Self { quiet: false }
    }

    pub fn execute(&mut self, args: Args) -> anyhow::Result<()> {
        self.quiet = args.quiet;
        self.setup_logging(&args);

        let config = match &args.config {
            Some(path) => PipelineConfig::from_file(path)
                .with_context(|| format!("Failed to load configuration {:?}", path))?,
            None => PipelineConfig::default(),
        };

        match args.command {
            Command::Build(build_args) => self.handle_build(build_args, config),
            Command::Transform(transform_args) => self.handle_transform(transform_args, config),
            Command::Validate(validate_args) => self.handle_validate(validate_args, config),
            Command::Header(header_args) => self.handle_header(header_args, config),
        }
    }

    fn setup_logging(&self, args: &Args) {
        let level = if args.quiet {
            log::LevelFilter::Error
        } else {
            LoggingUtils::level_from_str(&args.log_level)
        };
        LoggingUtils::init_logger(level);
    }

    fn handle_build(&self, args: BuildArgs, config: PipelineConfig) -> anyhow::Result<()> {
        args.io.validate().map_err(|e| anyhow::anyhow!(e))?;
        let config = args.apply(config);
        let codec = IrCodec::new().with_pretty_print(!args.pipeline.compact);
        let pipeline = Pipeline::new(config)?;

        self.status(&format!("Building layouts from {}...", pluralize(args.io.inputs.len(), "dump", "dumps")));
        self.for_each_input(&args.io, pipeline.config().jobs, "json", |input| {
            let text = std::fs::read_to_string(input)?;
            let nodes = NodeTable::from_json(&text).with_context(|| format!("Malformed dump {:?}", input))?;
            let definitions = pipeline.run_dump(&nodes)?;
            Ok(codec.encode(&definitions)?)
        })
    }

    fn handle_transform(&self, args: TransformArgs, config: PipelineConfig) -> anyhow::Result<()> {
        args.io.validate().map_err(|e| anyhow::anyhow!(e))?;
        let config = args.pipeline.apply(config);
        let codec = IrCodec::new().with_pretty_print(!args.pipeline.compact);
        let pipeline = Pipeline::new(config)?;

        self.status(&format!("Running {}...", pluralize(pipeline.passes().len(), "pass", "passes")));
        self.for_each_input(&args.io, pipeline.config().jobs, "json", |input| {
            let definitions = read_definitions(&codec, input)?;
            let transformed = pipeline.run(definitions)?;
            Ok(codec.encode(&transformed)?)
        })
    }

    fn handle_validate(&self, args: ValidateArgs, config: PipelineConfig) -> anyhow::Result<()> {
        let mut validator = LayoutValidator::new();
        if args.no_type_check {
            validator = validator.without_type_check();
        }
        let codec = IrCodec::new();

        let reports: Vec<(PathBuf, anyhow::Result<LayoutReport>)> = self.pool(config.jobs)?.install(|| {
            args.inputs
                .par_iter()
                .map(|input| {
                    let report = read_definitions(&codec, input).map(|defs| LayoutReport::generate(&validator, &defs));
                    (input.clone(), report)
                })
                .collect()
        });

        let mut failed = 0usize;
        for (input, report) in reports {
            let report = report?;
            if !report.is_valid() {
                failed += 1;
            }
            if args.json {
                println!("{}", report.to_json());
            } else {
                println!("{}", format!("{}", input.display()).bold());
                print!("{}", report.format_report());
            }
        }

        if failed > 0 {
            anyhow::bail!("{} failed layout validation", pluralize(failed, "input", "inputs"));
        }
        self.success("All layouts valid");
        Ok(())
    }

    fn handle_header(&self, args: HeaderArgs, config: PipelineConfig) -> anyhow::Result<()> {
        args.io.validate().map_err(|e| anyhow::anyhow!(e))?;
        let codec = IrCodec::new();
        let emitter = CHeaderEmitter::new().with_extern_c(!args.no_extern_c);

        self.for_each_input(&args.io, config.jobs, "h", |input| {
            let definitions = read_definitions(&codec, input)?;
            Ok(emitter.emit(&definitions))
        })
    }

    /// Run `render` over every input in parallel and write each result.
    fn for_each_input<F>(&self, io: &IoArgs, jobs: usize, extension: &str, render: F) -> anyhow::Result<()>
    where
        F: Fn(&Path) -> anyhow::Result<String> + Send + Sync,
    {
        let rendered: Vec<(PathBuf, anyhow::Result<String>)> = self.pool(jobs)?.install(|| {
            io.inputs
                .par_iter()
                .map(|input| (input.clone(), render(input.as_path()).with_context(|| format!("Failed to process {:?}", input))))
                .collect()
        });

        for (input, text) in rendered {
            let text = text?;
            match io.destination(&input, extension) {
                Some(path) => {
                    std::fs::write(&path, text.as_bytes()).with_context(|| format!("Failed to write {:?}", path))?;
                    self.success(&format!("Output written to: {}", path.display()));
                }
                None => println!("{}", text.trim_end()),
            }
        }
        Ok(())
    }

    fn pool(&self, jobs: usize) -> anyhow::Result<rayon::ThreadPool> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs.max(1))
            .build()
            .context("Failed to start worker threads")
    }

    fn status(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message.cyan());
        }
    }

    fn success(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message.green());
        }
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn read_definitions(codec: &IrCodec, input: &Path) -> anyhow::Result<Vec<Definition>> {
    codec
        .decode_file(input)
        .with_context(|| format!("Failed to read layout IR {:?}", input))
}
