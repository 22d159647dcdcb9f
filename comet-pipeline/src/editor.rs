//! Editor (transformation stage) contract.

use comet_ir::Program;
use eyre::Result;

use crate::{CancellationToken, Diagnostic};

/// A rewrite function: consumes one program snapshot and returns the next.
///
/// Diagnostics go to the owning editor's [`Outbox`].
pub type RewriteFn =
    Box<dyn FnMut(Program, &CancellationToken, &mut Outbox) -> Result<Program> + Send>;

/// A unit of work that edits the program through registered rewrites.
///
/// `initialize` sees the original program read-only. Its only effects are
/// registering rewrites and reporting diagnostics through the
/// [`EditorContext`]; every program edit happens inside a rewrite.
///
/// # Example
///
/// ```ignore
/// struct RenameEditor;
///
/// impl Editor for RenameEditor {
///     fn name(&self) -> &str { "rename" }
///
///     fn initialize(
///         &mut self,
///         _program: &Program,
///         cx: &mut EditorContext<'_>,
///         _cancel: &CancellationToken,
///     ) -> Result<()> {
///         cx.register(|mut program, _cancel, outbox| {
///             program.name.push_str(".Edited");
///             outbox.info("renamed assembly");
///             Ok(program)
///         });
///         Ok(())
///     }
/// }
/// ```
pub trait Editor: Send {
    /// The name of this editor (used as the origin of its diagnostics).
    fn name(&self) -> &str;

    /// Register rewrites for this run.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor cannot take part in the run. The run
    /// aborts before any rewrite is applied.
    fn initialize(
        &mut self,
        program: &Program,
        cx: &mut EditorContext<'_>,
        cancel: &CancellationToken,
    ) -> Result<()>;
}

/// Per-editor diagnostic sink.
#[derive(Debug, Clone)]
pub struct Outbox {
    stage: String,
    diagnostics: Vec<Diagnostic>,
}

impl Outbox {
    pub fn new(stage: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            diagnostics: Vec::new(),
        }
    }

    /// Name of the editor owning this outbox.
    pub fn stage(&self) -> &str {
        &self.stage
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::error(&self.stage, message));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::warning(&self.stage, message));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::info(&self.stage, message));
    }

    /// Push a prepared diagnostic, e.g. one with a location.
    ///
    /// The diagnostic's origin is always this outbox's editor.
    pub fn push(&mut self, mut diagnostic: Diagnostic) {
        diagnostic.stage.clone_from(&self.stage);
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

/// A registered rewrite and the index of the stage owning it.
pub(crate) struct Rewrite {
    pub(crate) stage: usize,
    pub(crate) func: RewriteFn,
}

/// Builder handed to [`Editor::initialize`].
///
/// Appends rewrites to the run's shared chain, in call order, and gives
/// access to the editor's outbox.
pub struct EditorContext<'a> {
    stage: usize,
    chain: &'a mut Vec<Rewrite>,
    outbox: &'a mut Outbox,
}

impl<'a> EditorContext<'a> {
    pub(crate) fn new(stage: usize, chain: &'a mut Vec<Rewrite>, outbox: &'a mut Outbox) -> Self {
        Self {
            stage,
            chain,
            outbox,
        }
    }

    /// Append a rewrite to the chain.
    pub fn register<F>(&mut self, rewrite: F) -> &mut Self
    where
        F: FnMut(Program, &CancellationToken, &mut Outbox) -> Result<Program> + Send + 'static,
    {
        self.chain.push(Rewrite {
            stage: self.stage,
            func: Box::new(rewrite),
        });
        self
    }

    /// Number of rewrites this editor has registered so far.
    pub fn registered(&self) -> usize {
        self.chain.iter().filter(|r| r.stage == self.stage).count()
    }

    pub fn report_error(&mut self, message: impl Into<String>) {
        self.outbox.error(message);
    }

    pub fn report_warning(&mut self, message: impl Into<String>) {
        self.outbox.warning(message);
    }

    pub fn report_info(&mut self, message: impl Into<String>) {
        self.outbox.info(message);
    }

    pub fn outbox(&mut self) -> &mut Outbox {
        self.outbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_rewrites_origin() {
        let mut outbox = Outbox::new("breaking");
        outbox.push(Diagnostic::warning("someone-else", "careful").at("Demo.Foo"));
        outbox.info("done");

        let diags = outbox.into_diagnostics();
        assert_eq!(diags.len(), 2);
        assert!(diags.iter().all(|d| d.stage == "breaking"));
        assert_eq!(diags[0].location.as_deref(), Some("Demo.Foo"));
    }

    #[test]
    fn test_context_registers_in_order() {
        let mut chain = Vec::new();
        let mut first = Outbox::new("first");
        let mut second = Outbox::new("second");

        let mut cx = EditorContext::new(0, &mut chain, &mut first);
        cx.register(|p, _, _| Ok(p)).register(|p, _, _| Ok(p));
        assert_eq!(cx.registered(), 2);

        let mut cx = EditorContext::new(1, &mut chain, &mut second);
        cx.register(|p, _, _| Ok(p));
        cx.report_warning("only one");
        assert_eq!(cx.registered(), 1);

        let stages: Vec<_> = chain.iter().map(|r| r.stage).collect();
        assert_eq!(stages, [0, 0, 1]);
        assert_eq!(second.diagnostics().len(), 1);
    }
}
