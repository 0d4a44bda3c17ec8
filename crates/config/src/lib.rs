//! Configuration for quarry
//!
//! Loads the repository-local `.quarry/config.toml` and provides logging
//! initialization for the CLI.

pub mod config;
pub mod logging;

pub use config::{AdviceConfig, Config, CoreConfig};
pub use quarry_core::{Error, Result};
