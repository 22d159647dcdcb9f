//! Parsing and validation of `comet.toml`, the host configuration telling
//! the `comet` CLI which program to edit and where to write the result.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
mod file;
mod manifest;
mod validate;

pub use error::{Error, Result};
pub use file::CometToml;
pub use manifest::{Manifest, OutputConfig, PipelineConfig, ProjectConfig};
