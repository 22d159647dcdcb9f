//! Report data structures for commands.
//!
//! This module provides data structures that separate data collection from rendering.
//! Commands build reports, then render them to an Output target.

mod check;
mod list;
mod output;
mod run;

use std::error::Error;

pub use check::CheckReport;
pub use list::ListReport;
pub use output::{Output, Report, TerminalOutput};
pub use run::{RunReport, RunStatus};

/// Flatten an error and its sources into a single line.
pub(crate) fn error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use comet_pipeline::{MarkerOrigin, PipelineError};

    use super::*;

    #[test]
    fn test_error_chain_includes_sources() {
        let err = PipelineError::RewriteFailure {
            stage: "breaking".to_string(),
            index: 0,
            source: eyre::eyre!("boom").into(),
        };
        assert_eq!(
            error_chain(&err),
            "rewrite #0 registered by 'breaking' failed: boom"
        );

        let err = PipelineError::StageInitialization {
            marker: MarkerOrigin {
                index: 2,
                kind: "break-on".to_string(),
            },
            stage: None,
            source: "bad payload".into(),
        };
        assert!(error_chain(&err).ends_with(": bad payload"));
    }
}
