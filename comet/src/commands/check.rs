use std::path::PathBuf;

use clap::Args;
use comet_manifest::CometToml;
use eyre::Result;

use super::UnwrapOrExit;
use crate::{
    host::Host,
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    /// Path to comet.toml (defaults to ./comet.toml)
    #[arg(short, long, default_value = "comet.toml")]
    pub config: PathBuf,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let comet_toml = CometToml::open(&self.config).unwrap_or_exit();
        let host = Host::new();

        let program = host.load_program(&comet_toml.program_path())?;
        let markers = host.resolve(&program).unwrap_or_exit();

        let report = ops::check(&program, &markers, &self.config);
        report.render(&mut TerminalOutput::new());

        if !report.is_valid() {
            std::process::exit(1);
        }
        Ok(())
    }
}
