// Tue Jan 20 2026 - Alex

use crate::ir::Definition;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads and writes definition lists as a JSON array of records tagged by
/// `"kind"`. Field order is fixed, so encoding a decoded document reproduces
/// it byte for byte.
pub struct IrCodec {
    pretty_print: bool,
}

impl IrCodec {
    pub fn new() -> Self {
        Self { pretty_print: true }
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn encode(&self, definitions: &[Definition]) -> Result<String, CodecError> {
        let text = if self.pretty_print {
            serde_json::to_string_pretty(definitions)?
        } else {
            serde_json::to_string(definitions)?
        };
        Ok(text)
    }

    pub fn decode(&self, text: &str) -> Result<Vec<Definition>, CodecError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn encode_to_file<P: AsRef<Path>>(&self, definitions: &[Definition], path: P) -> Result<(), CodecError> {
        let text = self.encode(definitions)?;
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        writer.write_all(text.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    pub fn decode_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Definition>, CodecError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        self.decode(&text)
    }
}

impl Default for IrCodec {
    fn default() -> Self {
        Self::new()
    }
}

pub fn encode(definitions: &[Definition]) -> Result<String, CodecError> {
    IrCodec::new().encode(definitions)
}

pub fn decode(text: &str) -> Result<Vec<Definition>, CodecError> {
    IrCodec::new().decode(text)
}
