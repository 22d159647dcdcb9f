use std::path::{Path, PathBuf};

use crate::{Error, Manifest, Result};

/// Represents a comet.toml file with both raw content and parsed manifest.
///
/// Relative paths in the manifest are resolved against the file's directory.
pub struct CometToml {
    path: PathBuf,
    content: String,
    manifest: Manifest,
}

impl CometToml {
    /// Open and parse a comet.toml file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Box::new(Error::Io {
                path: path.clone(),
                source: e,
            })
        })?;
        let filename = path.display().to_string();
        let manifest = Manifest::from_str_with_filename(&content, &filename)?;

        Ok(Self {
            path,
            content,
            manifest,
        })
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the raw content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the parsed manifest.
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Directory relative paths are resolved against.
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }

    /// Resolved path of the input program.
    pub fn program_path(&self) -> PathBuf {
        self.base_dir().join(&self.manifest.project.program)
    }

    /// Resolved path the edited program is written to.
    pub fn output_path(&self) -> PathBuf {
        match &self.manifest.output.program {
            Some(path) => self.base_dir().join(path),
            None => self.program_path().with_extension("edited.json"),
        }
    }

    /// Resolved snapshot directory, if configured.
    pub fn snapshots_dir(&self) -> Option<PathBuf> {
        self.manifest
            .output
            .snapshots
            .as_ref()
            .map(|dir| self.base_dir().join(dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_paths_against_manifest_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comet.toml");
        std::fs::write(
            &path,
            "[project]\nname = \"demo\"\nprogram = \"program.json\"\n\n[output]\nsnapshots = \"debug\"\n",
        )
        .unwrap();

        let toml = CometToml::open(&path).unwrap();

        assert_eq!(toml.program_path(), dir.path().join("program.json"));
        assert_eq!(toml.output_path(), dir.path().join("program.edited.json"));
        assert_eq!(toml.snapshots_dir(), Some(dir.path().join("debug")));
    }

    #[test]
    fn test_missing_file() {
        let err = CometToml::open("does/not/exist/comet.toml").err().unwrap();
        assert!(matches!(*err, Error::Io { .. }));
    }
}
