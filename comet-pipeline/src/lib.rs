//! Marker-driven editor pipeline.
//!
//! Producers attach compilation-level markers to a [`Program`]. At build time
//! the pipeline turns those markers into editors, lets every editor register
//! rewrite functions, and applies the rewrites in order:
//!
//! - [`MarkerRegistry`] maps marker kinds to validating factories
//! - [`discover`] asks every [`Marker`] for its editors, in declaration order
//! - [`Editor`]s register rewrites through an [`EditorContext`]
//! - [`Pipeline`] runs the chain under a single [`CancellationToken`]
//!
//! # Example
//!
//! ```ignore
//! use comet_pipeline::{CancellationToken, MarkerRegistry, Pipeline, RunOutcome};
//!
//! let mut registry = MarkerRegistry::new();
//! comet_debugging::register(&mut registry);
//!
//! let markers = registry.resolve(&program)?;
//! match Pipeline::new().run(program, &markers, &CancellationToken::new()) {
//!     RunOutcome::Completed(done) => emit(done.program),
//!     RunOutcome::Aborted(aborted) => report(aborted.error),
//! }
//! ```
//!
//! [`Program`]: comet_ir::Program

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod cancel;
mod diagnostic;
mod editor;
mod error;
mod marker;
mod plugin;
mod registry;
mod runner;
mod snapshot;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use cancel::{Cancelled, CancellationToken};
pub use diagnostic::{Diagnostic, Severity};
pub use editor::{Editor, EditorContext, Outbox, RewriteFn};
pub use error::{PipelineError, ValidationError};
pub use marker::{Marker, MarkerOrigin};
pub use plugin::{Plugin, RewriteInfo};
pub use registry::{DiscoveredStage, MarkerFactory, MarkerRegistry, discover};
pub use runner::{Aborted, Completed, Pipeline, PipelineState, RunOutcome, StageInfo};
pub use snapshot::{RewriteSnapshot, SnapshotPlugin};
