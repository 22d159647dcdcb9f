//! Check operation - marker validation and editor initialization.

use std::path::Path;

use comet_ir::Program;
use comet_pipeline::{CancellationToken, Marker, Pipeline};

use crate::reports::{CheckReport, error_chain};

/// Execute the check operation.
///
/// Discovers and initializes editors without applying any rewrite.
pub fn check(program: &Program, markers: &[Box<dyn Marker>], config_path: &Path) -> CheckReport {
    let pipeline = Pipeline::new();

    match pipeline.collect(program, markers, &CancellationToken::new()) {
        Ok((stages, diagnostics)) => CheckReport {
            config_path: config_path.to_path_buf(),
            program: program.name.clone(),
            stages,
            diagnostics,
            error: None,
        },
        Err(aborted) => CheckReport {
            config_path: config_path.to_path_buf(),
            program: program.name.clone(),
            error: Some(error_chain(&aborted.error)),
            stages: aborted.stages,
            diagnostics: aborted.diagnostics,
        },
    }
}

#[cfg(test)]
mod tests {
    use comet_ir::{MarkerDecl, TypeDecl};
    use serde_json::json;

    use super::*;
    use crate::host::Host;

    #[test]
    fn test_check_lists_stages() {
        let program = Program::new("Demo")
            .with_type(TypeDecl::attribute("Demo.TraceAttribute"))
            .with_marker(MarkerDecl::new(
                "break-on",
                json!({ "types": ["Demo.TraceAttribute"] }),
            ));
        let markers = Host::new().resolve(&program).unwrap();

        let report = check(&program, &markers, Path::new("comet.toml"));

        assert!(report.is_valid());
        assert_eq!(report.stages.len(), 1);
        assert_eq!(report.stages[0].name, "breaking");
        assert_eq!(report.stages[0].rewrites, 1);
    }
}
