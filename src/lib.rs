// rmc - selectively strip comments and docstrings from a source tree
// Re-export public modules and types

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod processing;
pub mod utils;

// Re-export main types for convenience
pub use config::LevelsConfig;
pub use error::{Error, Result};
pub use models::job::FileJob;
pub use models::options::{DEFAULT_EXTENSION, RemovalConfig};
pub use processing::batch::{BatchOptions, BatchReport, run, run_with_options};
pub use processing::file::{FileReport, process_file};
pub use processing::line::LineProcessor;
