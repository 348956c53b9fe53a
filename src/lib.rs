// Tue Jan 15 2026 - Alex

pub mod ir;
pub mod dump;
pub mod validation;
pub mod graph;
pub mod transform;
pub mod config;
pub mod pipeline;
pub mod output;
pub mod ui;
pub mod utils;

pub use ir::{Definition, DefinitionKind, Field, TypeReference};
pub use dump::{DefinitionBuilder, NodeTable};
pub use config::PipelineConfig;
pub use pipeline::{Pass, Pipeline, PipelineError};
pub use validation::{LayoutError, LayoutValidator};
pub use output::{CHeaderEmitter, IrCodec};
