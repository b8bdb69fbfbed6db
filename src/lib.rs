pub mod api;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;

pub use error::ScanError;
