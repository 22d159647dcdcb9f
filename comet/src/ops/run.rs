//! Run operation - execute the pipeline and write the edited program.

use std::{fs, path::Path, sync::Arc};

use comet_ir::Program;
use comet_manifest::CometToml;
use comet_pipeline::{CancellationToken, Marker, Pipeline, RunOutcome, SnapshotPlugin};
use eyre::{Result, WrapErr};
use tracing::info;

use crate::reports::{RunReport, RunStatus, error_chain};

/// Options for the run operation.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Skip writing the edited program and snapshots.
    pub dry_run: bool,
    /// Include the rendered program in the report.
    pub print: bool,
}

/// Execute the run operation.
///
/// Runs the pipeline over `program` and, when the run succeeds and this is
/// not a dry run, writes the edited program where the manifest says.
pub fn run(
    comet_toml: &CometToml,
    program: Program,
    markers: &[Box<dyn Marker>],
    options: &RunOptions,
) -> Result<RunReport> {
    let manifest = comet_toml.manifest();
    let snapshots = match comet_toml.snapshots_dir() {
        Some(dir) if !options.dry_run => Some((dir, Arc::new(SnapshotPlugin::new()))),
        _ => None,
    };
    let mut pipeline = Pipeline::new();
    if let Some((_, plugin)) = &snapshots {
        pipeline = pipeline.plugin(plugin.clone());
    }

    let outcome = pipeline.run(program, markers, &CancellationToken::new());

    let mut report = RunReport {
        project: manifest.project.name.clone(),
        status: RunStatus::Completed,
        stages: Vec::new(),
        diagnostics: Vec::new(),
        deny_warnings: manifest.pipeline.deny_warnings,
        output: None,
        snapshots: None,
        rendered: None,
    };

    let program = match outcome {
        RunOutcome::Completed(done) => {
            report.stages = done.stages;
            report.diagnostics = done.diagnostics;
            done.program
        }
        RunOutcome::Aborted(aborted) => {
            report.status = RunStatus::Failed(error_chain(&aborted.error));
            report.stages = aborted.stages;
            report.diagnostics = aborted.diagnostics;
            return Ok(report);
        }
    };

    if options.print {
        report.rendered = Some(program.to_string());
    }

    if options.dry_run || !report.is_success() {
        return Ok(report);
    }

    let output = comet_toml.output_path();
    write_program(&output, &program)?;
    info!(path = %output.display(), "wrote edited program");
    report.output = Some(output);

    if let Some((dir, plugin)) = snapshots {
        plugin
            .write_to_dir(&dir)
            .wrap_err_with(|| format!("failed to write snapshots to '{}'", dir.display()))?;
        report.snapshots = Some(dir);
    }

    Ok(report)
}

fn write_program(path: &Path, program: &Program) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(program)?;
    fs::write(path, json).wrap_err_with(|| format!("failed to write '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use comet_pipeline::testing::{FnEditor, single};
    use serde_json::json;

    use super::*;
    use crate::host::Host;

    const PROGRAM: &str = r#"{
        "name": "Demo",
        "markers": [{ "kind": "break-on", "args": { "types": ["Demo.TraceAttribute"] } }],
        "types": [
            { "id": "Demo.TraceAttribute", "base": "System.Attribute" },
            {
                "id": "Demo.Service",
                "methods": [
                    { "name": "Foo", "attributes": [{ "type": "Demo.TraceAttribute" }], "body": [{ "return": null }] },
                    { "name": "Bar", "body": [{ "return": null }] }
                ]
            }
        ]
    }"#;

    fn project(extra: &str) -> (tempfile::TempDir, CometToml) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("program.json"), PROGRAM).unwrap();
        fs::write(
            dir.path().join("comet.toml"),
            format!("[project]\nname = \"demo\"\nprogram = \"program.json\"\n{extra}"),
        )
        .unwrap();
        let toml = CometToml::open(dir.path().join("comet.toml")).unwrap();
        (dir, toml)
    }

    fn execute(toml: &CometToml, options: &RunOptions) -> RunReport {
        let host = Host::new();
        let program = host.load_program(&toml.program_path()).unwrap();
        let markers = host.resolve(&program).unwrap();
        run(toml, program, &markers, options).unwrap()
    }

    #[test]
    fn test_writes_edited_program() {
        let (_dir, toml) = project("\n[output]\nsnapshots = \"debug\"\n");

        let report = execute(&toml, &RunOptions::default());

        assert!(report.is_success());
        let output = report.output.expect("output should be written");
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
        let foo = &written["types"][1]["methods"][0];
        assert_eq!(foo["body"][0], json!({ "intrinsic": "debugger_break" }));
        assert_eq!(foo["tags"], json!(["comet.debugging.break"]));
        assert!(toml.snapshots_dir().unwrap().join("000-breaking.json").exists());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let (_dir, toml) = project("");

        let report = execute(
            &toml,
            &RunOptions {
                dry_run: true,
                print: true,
            },
        );

        assert!(report.is_success());
        assert!(report.output.is_none());
        assert!(!toml.output_path().exists());
        assert!(report.rendered.unwrap().contains("Debugger.Break()"));
    }

    #[test]
    fn test_aborted_run_writes_nothing() {
        let (_dir, toml) = project("");
        let program = Host::new().load_program(&toml.program_path()).unwrap();
        let markers = vec![single("flaky", || {
            FnEditor::new("flaky", |_, _, _| Err(eyre::eyre!("boom")))
        })];

        let report = run(&toml, program, &markers, &RunOptions::default()).unwrap();

        match &report.status {
            RunStatus::Failed(error) => assert!(error.ends_with(": boom")),
            other => panic!("unexpected status: {other:?}"),
        }
        assert!(!report.is_success());
        assert!(report.output.is_none());
        assert!(!toml.output_path().exists());
    }
}
