//! perfref Common Library
//!
//! The I/O-free core of the performance reftest harness: manifest parsing,
//! the comparison policy, configuration presets and report rendering.

pub mod compare;
pub mod config;
pub mod error;
pub mod manifest;
pub mod report;
pub mod types;

// Re-export commonly used types
pub use compare::{classify, timings_pass};
pub use config::{CachePolicy, ComparisonProfile, ConfigFile, HarnessConfig, ProfileName};
pub use error::{Error, Result};
pub use manifest::Manifest;
pub use report::{Report, ReportBuilder, ReportRow};
pub use types::*;

/// perfref version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
