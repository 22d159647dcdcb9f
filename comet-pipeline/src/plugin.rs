//! Pipeline plugin trait for observing runs.

use std::sync::Arc;

use comet_ir::Program;
use eyre::Result;

use crate::PipelineState;

/// Identifies the rewrite a hook is called for.
#[derive(Debug, Clone, Copy)]
pub struct RewriteInfo<'a> {
    /// Position of the rewrite in the chain.
    pub index: usize,
    /// Name of the editor that registered it.
    pub stage: &'a str,
}

/// A plugin that can hook into pipeline runs.
///
/// Plugins see every state transition and every rewrite application. They
/// observe; edits belong in editors.
///
/// # Example
///
/// ```ignore
/// struct TimingPlugin {
///     start: Mutex<Option<Instant>>,
/// }
///
/// impl Plugin for TimingPlugin {
///     fn name(&self) -> &'static str { "timing" }
///
///     fn on_before_rewrite(&self, _: &RewriteInfo<'_>, _: &Program) -> Result<()> {
///         *self.start.lock().unwrap() = Some(Instant::now());
///         Ok(())
///     }
///
///     fn on_after_rewrite(&self, rewrite: &RewriteInfo<'_>, _: &Program) -> Result<()> {
///         if let Some(start) = *self.start.lock().unwrap() {
///             println!("{} took {:?}", rewrite.stage, start.elapsed());
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Plugin: Send + Sync {
    /// The name of this plugin (for debugging and logging).
    fn name(&self) -> &'static str;

    /// Called when the run enters `state`.
    #[allow(unused_variables)]
    fn on_state(&self, state: PipelineState) {}

    /// Called before a rewrite is applied to `program`.
    ///
    /// # Errors
    ///
    /// Return an error to abort the run as a rewrite failure.
    #[allow(unused_variables)]
    fn on_before_rewrite(&self, rewrite: &RewriteInfo<'_>, program: &Program) -> Result<()> {
        Ok(())
    }

    /// Called with the program a rewrite produced.
    ///
    /// # Errors
    ///
    /// Return an error to abort the run as a rewrite failure.
    #[allow(unused_variables)]
    fn on_after_rewrite(&self, rewrite: &RewriteInfo<'_>, program: &Program) -> Result<()> {
        Ok(())
    }
}

/// Lets a caller keep a handle on a plugin (e.g. to read snapshots) after
/// handing it to a pipeline.
impl<P: Plugin + ?Sized> Plugin for Arc<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn on_state(&self, state: PipelineState) {
        (**self).on_state(state)
    }

    fn on_before_rewrite(&self, rewrite: &RewriteInfo<'_>, program: &Program) -> Result<()> {
        (**self).on_before_rewrite(rewrite, program)
    }

    fn on_after_rewrite(&self, rewrite: &RewriteInfo<'_>, program: &Program) -> Result<()> {
        (**self).on_after_rewrite(rewrite, program)
    }
}
