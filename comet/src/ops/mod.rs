//! Core operations.
//!
//! This module contains the business logic for comet commands,
//! separated from CLI argument parsing and output rendering.

pub mod check;
pub mod list;
pub mod run;

pub use check::check;
pub use list::list;
pub use run::{RunOptions, run};
