//! Error taxonomy surfaced to the host.

use comet_ir::TypeId;
use miette::Diagnostic;
use thiserror::Error;

use crate::MarkerOrigin;

/// Boxed error carried from editor and rewrite code.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A marker payload that does not satisfy its extension's declared shape.
///
/// Raised while constructing a marker, before discovery runs.
#[derive(Debug, Error, Diagnostic)]
pub enum ValidationError {
    #[error("unknown marker kind '{kind}'")]
    #[diagnostic(code(comet::unknown_marker), help("registered marker kinds: {known}"))]
    UnknownKind { kind: String, known: String },

    #[error("'{kind}' marker is missing required argument '{field}'")]
    #[diagnostic(code(comet::missing_argument))]
    MissingPayload { kind: String, field: &'static str },

    #[error("'{kind}' marker has an invalid payload: {message}")]
    #[diagnostic(code(comet::invalid_payload))]
    InvalidPayload { kind: String, message: String },

    #[error("'{kind}' marker requires at least one {field}")]
    #[diagnostic(code(comet::empty_payload))]
    Empty { kind: String, field: &'static str },

    #[error("'{kind}' marker: {field}[{index}] names unknown type '{ty}'")]
    #[diagnostic(
        code(comet::unknown_type),
        help("type identifiers must be fully qualified and declared in the compilation")
    )]
    UnknownType {
        kind: String,
        field: &'static str,
        index: usize,
        ty: TypeId,
    },

    #[error("'{kind}' marker: {field}[{index}] expected a marker type, found '{ty}'")]
    #[diagnostic(
        code(comet::not_a_marker_type),
        help("'{ty}' must be System.Attribute or derive from it")
    )]
    NotAMarkerType {
        kind: String,
        field: &'static str,
        index: usize,
        ty: TypeId,
    },
}

/// Why a pipeline run aborted.
#[derive(Debug, Error, Diagnostic)]
pub enum PipelineError {
    /// A marker or one of its editors failed to initialize. No edit was made.
    #[error("failed to initialize {}", describe_stage(.marker, .stage.as_deref()))]
    #[diagnostic(code(comet::stage_initialization))]
    StageInitialization {
        marker: MarkerOrigin,
        stage: Option<String>,
        #[source]
        source: BoxError,
    },

    /// The run observed a cancellation request. Not a failure.
    #[error("pipeline run was cancelled")]
    #[diagnostic(code(comet::cancelled))]
    Cancelled,

    /// A rewrite function failed; later rewrites were not applied.
    #[error("rewrite #{index} registered by '{stage}' failed")]
    #[diagnostic(code(comet::rewrite_failure))]
    RewriteFailure {
        stage: String,
        index: usize,
        #[source]
        source: BoxError,
    },
}

impl PipelineError {
    /// Whether the run stopped on request rather than because of a fault.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, PipelineError::Cancelled)
    }

    /// The stage the error originated from, if any.
    pub fn stage(&self) -> Option<&str> {
        match self {
            PipelineError::StageInitialization { stage, .. } => stage.as_deref(),
            PipelineError::RewriteFailure { stage, .. } => Some(stage),
            PipelineError::Cancelled => None,
        }
    }
}

fn describe_stage(marker: &MarkerOrigin, stage: Option<&str>) -> String {
    match stage {
        Some(stage) => format!("editor '{stage}' of {marker}"),
        None => marker.to_string(),
    }
}
