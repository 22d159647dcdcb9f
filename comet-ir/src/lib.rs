//! Program representation for the Comet editor pipeline.
//!
//! This crate defines the immutable snapshot of a compilation unit that
//! editors rewrite. The host compiler is responsible for producing it: type
//! identifiers arrive fully resolved and the pipeline never parses source
//! text.
//!
//! # Architecture
//!
//! ```text
//! host compiler → Program (comet-ir) → editor pipeline → Program → host emit
//! ```
//!
//! The types are designed to be:
//! - Owned snapshots (a rewrite consumes one `Program` and returns the next)
//! - Deterministic (ordered maps and sets only, stable rendering)
//! - Serializable so hosts can hand them over as JSON

mod display;
mod program;
mod types;

pub use program::{Attribute, Intrinsic, MarkerDecl, Method, Program, Stmt};
pub use types::{ATTRIBUTE_BASE, TypeDecl, TypeId, TypeTable};
