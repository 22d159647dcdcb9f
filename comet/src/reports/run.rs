//! Run command report data structures.

use std::path::PathBuf;

use comet_pipeline::{Diagnostic, StageInfo};

use super::output::{Output, Report};

/// How the pipeline run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Every rewrite was applied.
    Completed,
    /// Initialization or a rewrite failed, with the error chain.
    Failed(String),
}

/// Report data from a pipeline run.
#[derive(Debug)]
pub struct RunReport {
    /// Project name from manifest.
    pub project: String,
    pub status: RunStatus,
    /// Stages that took part, in execution order.
    pub stages: Vec<StageInfo>,
    /// Diagnostics in stage order, then emission order.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether warnings fail the run.
    pub deny_warnings: bool,
    /// Where the edited program was written.
    pub output: Option<PathBuf>,
    /// Where rewrite snapshots were written.
    pub snapshots: Option<PathBuf>,
    /// Rendered edited program, when requested.
    pub rendered: Option<String>,
}

impl RunReport {
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity.is_error())
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity.is_warning())
            .count()
    }

    /// Whether the edited program is usable.
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Completed
            && self.error_count() == 0
            && !(self.deny_warnings && self.warning_count() > 0)
    }
}

impl Report for RunReport {
    fn render(&self, out: &mut dyn Output) {
        for diagnostic in &self.diagnostics {
            out.diagnostic(diagnostic);
        }
        if !self.diagnostics.is_empty() {
            out.newline();
        }

        if let Some(rendered) = &self.rendered {
            out.divider("Edited program");
            out.preformatted(rendered.trim_end());
            out.newline();
        }

        match &self.status {
            RunStatus::Completed => {}
            RunStatus::Failed(error) => {
                out.error(error);
                return;
            }
        }

        if self.deny_warnings && self.warning_count() > 0 {
            out.error(&format!(
                "{} warning(s) denied by [pipeline] deny_warnings",
                self.warning_count()
            ));
        }

        out.key_value(
            "Stages",
            &format!(
                "{} ({} error(s), {} warning(s))",
                self.stages.len(),
                self.error_count(),
                self.warning_count()
            ),
        );
        if let Some(output) = &self.output {
            out.key_value("Written", &output.display().to_string());
        }
        if let Some(snapshots) = &self.snapshots {
            out.key_value("Snapshots", &snapshots.display().to_string());
        }
        if self.is_success() && self.output.is_none() {
            out.preformatted(&format!("✓ {} ran without writing output", self.project));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::output::tests::BufferOutput;

    fn report(diagnostics: Vec<Diagnostic>, deny_warnings: bool) -> RunReport {
        RunReport {
            project: "demo".to_string(),
            status: RunStatus::Completed,
            stages: Vec::new(),
            diagnostics,
            deny_warnings,
            output: None,
            snapshots: None,
            rendered: None,
        }
    }

    #[test]
    fn test_warnings_allowed_by_default() {
        let report = report(vec![Diagnostic::warning("breaking", "nothing matched")], false);
        assert!(report.is_success());
    }

    #[test]
    fn test_deny_warnings() {
        let report = report(vec![Diagnostic::warning("breaking", "nothing matched")], true);
        assert!(!report.is_success());

        let mut out = BufferOutput::default();
        report.render(&mut out);
        assert!(
            out.lines
                .contains(&"error: 1 warning(s) denied by [pipeline] deny_warnings".to_string())
        );
    }

    #[test]
    fn test_failed_run() {
        let mut report = report(Vec::new(), false);
        report.status = RunStatus::Failed("rewrite #0 registered by 'x' failed: boom".into());
        assert!(!report.is_success());

        let mut out = BufferOutput::default();
        report.render(&mut out);
        assert_eq!(
            out.lines,
            vec!["error: rewrite #0 registered by 'x' failed: boom".to_string()]
        );
    }
}
