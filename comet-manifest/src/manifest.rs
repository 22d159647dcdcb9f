//! Manifest types for comet.toml files.

use std::{path::PathBuf, str::FromStr};

use serde::Deserialize;

use crate::{Error, Result, validate::ParseContext};

/// Root manifest for comet.toml
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Project metadata and input
    pub project: ProjectConfig,

    /// Where results are written
    #[serde(default)]
    pub output: OutputConfig,

    /// Pipeline behavior
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// `[project]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Project name, used in reports.
    pub name: String,
    /// Path to the program representation (JSON), relative to comet.toml.
    pub program: PathBuf,
}

/// `[output]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Path of the edited program. Defaults to `<program>.edited.json`.
    pub program: Option<PathBuf>,
    /// Directory receiving one JSON snapshot per rewrite.
    pub snapshots: Option<PathBuf>,
}

/// `[pipeline]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Treat warnings as a failed run.
    #[serde(default)]
    pub deny_warnings: bool,
}

impl FromStr for Manifest {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_with_filename(s, "comet.toml")
    }
}

impl Manifest {
    /// Parse a comet.toml from a string with a custom filename for error reporting
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        let manifest: Self =
            toml::from_str(content).map_err(|e| Error::parse(e, content, filename))?;
        manifest.validate(content, filename)?;
        Ok(manifest)
    }

    /// Validate the manifest after parsing
    fn validate(&self, src: &str, filename: &str) -> Result<()> {
        let ctx = ParseContext::new(src, filename);

        ctx.validate_name(&self.project.name)?;
        ctx.require_path("project", "program", &self.project.program)?;
        if let Some(program) = &self.output.program {
            ctx.require_path("output", "program", program)?;
            if *program == self.project.program {
                return Err(Error::validation(
                    "output program would overwrite the input program",
                    src,
                    filename,
                    None,
                ));
            }
        }
        Ok(())
    }
}
