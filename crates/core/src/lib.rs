//! Core types and configuration for the flowrank system.
//!
//! This crate provides shared types used across all other crates:
//! - Market and security record types
//! - Highlight classification
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use types::*;
