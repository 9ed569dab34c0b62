//! Segment tracker CLI library.
//!
//! This crate provides the `seg` command-line interface.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, ExportFormatArg};
pub use config::{Config, UploadConfig};
