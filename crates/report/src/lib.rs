//! Report emission for the flowrank system.
//!
//! This crate provides:
//! - The styled four-quadrant xlsx report, one sheet per market
//! - The ranked console summary

pub mod console;
pub mod xlsx;

pub use console::{format_value, print_summary};
pub use xlsx::{report_filename, write_report};
