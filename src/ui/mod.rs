// Tue Jan 14 2026 - Alex

pub mod cli;
