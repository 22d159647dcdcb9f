//! Marker model.

use std::fmt;

use eyre::Result;
use serde::Serialize;

use crate::Editor;

/// A validated, compilation-level request for an extension.
///
/// Implementations validate their payload when constructed and fail with
/// [`ValidationError`](crate::ValidationError); a constructed marker is
/// read-only and always well formed.
pub trait Marker: fmt::Debug + Send + Sync {
    /// The marker kind (the key it is registered under).
    fn kind(&self) -> &'static str;

    /// Instantiate the editors this marker contributes to a run.
    ///
    /// Called once per run. Editors are returned in the order they should
    /// be initialized.
    ///
    /// # Errors
    ///
    /// Returns an error if the editors cannot be created; the run aborts
    /// before any edit is made.
    fn initialize(&self) -> Result<Vec<Box<dyn Editor>>>;
}

/// Identifies the marker a stage came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MarkerOrigin {
    /// Position of the marker in the compilation's marker list.
    pub index: usize,
    /// The marker kind.
    pub kind: String,
}

impl MarkerOrigin {
    pub fn new(index: usize, kind: impl Into<String>) -> Self {
        Self {
            index,
            kind: kind.into(),
        }
    }
}

impl fmt::Display for MarkerOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "marker #{} ({})", self.index, self.kind)
    }
}
