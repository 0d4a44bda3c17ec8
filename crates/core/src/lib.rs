//! Core types and utilities for quarry
//!
//! This is the foundation crate (Layer 0) that all other quarry crates depend on.
//! It provides:
//! - Base error types
//! - Platform detection (including the platform executable extension)
//!
//! This crate has no dependencies on other quarry crates.

pub mod error;
pub mod platform;

pub use error::{Error, Result};
