// Tue Jan 20 2026 - Alex

pub mod error;
pub mod layout;
pub mod report;

pub use error::LayoutError;
pub use layout::{validate, LayoutValidator};
pub use report::LayoutReport;
