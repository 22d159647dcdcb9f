//! Check command report data structures.

use std::path::PathBuf;

use comet_pipeline::{Diagnostic, StageInfo};

use super::output::{Output, Report};

/// Report data from marker validation and editor initialization.
#[derive(Debug)]
pub struct CheckReport {
    /// Path to the config file.
    pub config_path: PathBuf,
    /// Name of the checked program.
    pub program: String,
    /// Stages discovered, in execution order.
    pub stages: Vec<StageInfo>,
    /// Diagnostics reported during initialization.
    pub diagnostics: Vec<Diagnostic>,
    /// Initialization failure, if any.
    pub error: Option<String>,
}

impl CheckReport {
    /// Whether the check passed (no failure and no error diagnostics).
    pub fn is_valid(&self) -> bool {
        self.error.is_none() && !self.diagnostics.iter().any(|d| d.severity.is_error())
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for diagnostic in &self.diagnostics {
            out.diagnostic(diagnostic);
        }
        if let Some(error) = &self.error {
            out.error(error);
        }
        if !self.diagnostics.is_empty() || self.error.is_some() {
            out.newline();
        }

        if !self.stages.is_empty() {
            out.section(&format!("Stages ({})", self.stages.len()));
            for (i, stage) in self.stages.iter().enumerate() {
                out.numbered_item(
                    i + 1,
                    &format!(
                        "{} from {}, {} rewrite(s)",
                        stage.name, stage.marker, stage.rewrites
                    ),
                );
            }
            out.newline();
        }

        if self.is_valid() {
            out.preformatted(&format!(
                "✓ {} is valid ({})",
                self.config_path.display(),
                self.program
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use comet_pipeline::MarkerOrigin;

    use super::*;
    use crate::reports::output::tests::BufferOutput;

    fn stage() -> StageInfo {
        StageInfo {
            name: "breaking".to_string(),
            marker: MarkerOrigin {
                index: 0,
                kind: "break-on".to_string(),
            },
            rewrites: 1,
        }
    }

    #[test]
    fn test_render_valid() {
        let report = CheckReport {
            config_path: PathBuf::from("comet.toml"),
            program: "Demo".to_string(),
            stages: vec![stage()],
            diagnostics: Vec::new(),
            error: None,
        };
        let mut out = BufferOutput::default();
        report.render(&mut out);

        assert_eq!(
            out.lines,
            vec![
                "Stages (1):".to_string(),
                "  1. breaking from marker #0 (break-on), 1 rewrite(s)".to_string(),
                String::new(),
                "✓ comet.toml is valid (Demo)".to_string(),
            ]
        );
    }

    #[test]
    fn test_error_diagnostic_invalidates() {
        let report = CheckReport {
            config_path: PathBuf::from("comet.toml"),
            program: "Demo".to_string(),
            stages: vec![stage()],
            diagnostics: vec![Diagnostic::error("breaking", "nope")],
            error: None,
        };
        assert!(!report.is_valid());
    }
}
