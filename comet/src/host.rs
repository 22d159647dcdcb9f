//! Host session state.

use std::path::Path;

use comet_ir::Program;
use comet_pipeline::{Marker, MarkerRegistry, ValidationError};
use eyre::{Result, WrapErr};
use tracing::debug;

/// State shared by everything the CLI does in one process.
///
/// Holds the marker registry, populated once at startup and only read
/// afterwards. Each pipeline run still gets its own executor state.
pub struct Host {
    registry: MarkerRegistry,
}

impl Host {
    /// Create a host with every built-in marker kind registered.
    pub fn new() -> Self {
        let mut registry = MarkerRegistry::new();
        comet_debugging::register(&mut registry);
        Self { registry }
    }

    pub fn registry(&self) -> &MarkerRegistry {
        &self.registry
    }

    /// Read a program representation from a JSON file.
    pub fn load_program(&self, path: &Path) -> Result<Program> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read program '{}'", path.display()))?;
        let program: Program = serde_json::from_str(&content)
            .wrap_err_with(|| format!("'{}' is not a valid program", path.display()))?;
        debug!(
            program = %program.name,
            types = program.types.len(),
            markers = program.markers.len(),
            "loaded program"
        );
        Ok(program)
    }

    /// Validate the program's markers.
    pub fn resolve(&self, program: &Program) -> Result<Vec<Box<dyn Marker>>, ValidationError> {
        self.registry.resolve(program)
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registers_break_on() {
        assert!(Host::new().registry().contains("break-on"));
    }

    #[test]
    fn test_load_program() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("program.json");
        std::fs::write(
            &path,
            r#"{ "name": "Demo", "types": [{ "id": "Demo.TraceAttribute", "base": "System.Attribute" }] }"#,
        )
        .unwrap();

        let program = Host::new().load_program(&path).unwrap();
        assert_eq!(program.name, "Demo");
        assert!(program.markers.is_empty());
    }

    #[test]
    fn test_load_invalid_program() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("program.json");
        std::fs::write(&path, "{ \"types\": [] }").unwrap();

        let err = Host::new().load_program(&path).unwrap_err();
        assert!(err.to_string().contains("is not a valid program"));
    }
}
