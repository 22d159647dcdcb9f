//! Rewrite snapshot plugin for visualization and debugging.
//!
//! This module provides a plugin that captures the program after each
//! rewrite, so the effect of every editor can be inspected.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};

use comet_ir::Program;
use eyre::Result;
use serde::Serialize;

use crate::{Plugin, RewriteInfo};

/// The program as produced by one rewrite.
#[derive(Debug, Clone, Serialize)]
pub struct RewriteSnapshot {
    /// Position of the rewrite in the chain.
    pub index: usize,
    /// Editor that registered the rewrite.
    pub stage: String,
    /// The program after the rewrite.
    pub program: Program,
}

impl RewriteSnapshot {
    fn file_name(&self) -> String {
        format!("{:03}-{}.json", self.index, self.stage)
    }
}

/// A plugin that captures the program after each rewrite.
///
/// # Example
///
/// ```ignore
/// let snapshots = Arc::new(SnapshotPlugin::new());
/// let pipeline = Pipeline::new().plugin(snapshots.clone());
/// pipeline.run(program, &markers, &cancel);
///
/// // Write snapshots to disk
/// snapshots.write_to_dir(".comet/debug")?;
/// ```
pub struct SnapshotPlugin {
    /// Collected snapshots.
    snapshots: Mutex<Vec<RewriteSnapshot>>,
    /// Output directory written to after every rewrite.
    output_dir: Option<PathBuf>,
}

impl SnapshotPlugin {
    /// Create a new snapshot plugin.
    pub fn new() -> Self {
        Self {
            snapshots: Mutex::new(Vec::new()),
            output_dir: None,
        }
    }

    /// Create a new snapshot plugin that writes to a directory.
    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            snapshots: Mutex::new(Vec::new()),
            output_dir: Some(output_dir.into()),
        }
    }

    /// Get all collected snapshots.
    pub fn snapshots(&self) -> Vec<RewriteSnapshot> {
        self.lock().clone()
    }

    /// Write all snapshots to `dir`, one JSON file per rewrite.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        for snapshot in self.lock().iter() {
            write_snapshot(dir, snapshot)?;
        }

        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RewriteSnapshot>> {
        self.snapshots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SnapshotPlugin {
    fn default() -> Self {
        Self::new()
    }
}

fn write_snapshot(dir: &Path, snapshot: &RewriteSnapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(dir.join(snapshot.file_name()), json)?;
    Ok(())
}

impl Plugin for SnapshotPlugin {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    fn on_after_rewrite(&self, rewrite: &RewriteInfo<'_>, program: &Program) -> Result<()> {
        let snapshot = RewriteSnapshot {
            index: rewrite.index,
            stage: rewrite.stage.to_string(),
            program: program.clone(),
        };

        // If output directory is configured, write immediately
        if let Some(ref dir) = self.output_dir {
            fs::create_dir_all(dir)?;
            write_snapshot(dir, &snapshot)?;
        }

        self.lock().push(snapshot);
        Ok(())
    }
}
