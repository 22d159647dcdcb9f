use clap::Args;
use eyre::Result;

use crate::{
    host::Host,
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct ListCommand {}

impl ListCommand {
    pub fn run(&self) -> Result<()> {
        let host = Host::new();
        ops::list(&host).render(&mut TerminalOutput::new());
        Ok(())
    }
}
