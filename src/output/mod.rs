// Tue Jan 20 2026 - Alex

pub mod json;
pub mod c_header;

pub use json::{IrCodec, CodecError, encode, decode};
pub use c_header::{CHeaderEmitter, emit_c_header};
