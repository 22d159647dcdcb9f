use std::path::PathBuf;

use clap::Args;
use comet_manifest::CometToml;
use eyre::Result;

use super::UnwrapOrExit;
use crate::{
    host::Host,
    ops::{self, RunOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct RunCommand {
    /// Path to comet.toml (defaults to ./comet.toml)
    #[arg(short, long, default_value = "comet.toml")]
    pub config: PathBuf,

    /// Run the pipeline without writing the edited program or snapshots
    #[arg(long)]
    pub dry_run: bool,

    /// Print the edited program
    #[arg(long)]
    pub print: bool,
}

impl RunCommand {
    /// Run the pipeline command
    pub fn run(&self) -> Result<()> {
        let comet_toml = CometToml::open(&self.config).unwrap_or_exit();
        let host = Host::new();

        let program = host.load_program(&comet_toml.program_path())?;
        let markers = host.resolve(&program).unwrap_or_exit();

        let options = RunOptions {
            dry_run: self.dry_run,
            print: self.print,
        };
        let report = ops::run(&comet_toml, program, &markers, &options)?;
        report.render(&mut TerminalOutput::new());

        if !report.is_success() {
            std::process::exit(1);
        }
        Ok(())
    }
}
