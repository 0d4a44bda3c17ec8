//! CLI command implementations
//!
//! This module contains all command implementations for the quarry CLI.

pub mod hook;
