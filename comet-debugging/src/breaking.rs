//! Editor inserting debugger breaks.

use std::collections::BTreeSet;

use comet_ir::{Intrinsic, Method, Program, Stmt, TypeId};
use comet_pipeline::{CancellationToken, Editor, EditorContext, Outbox};
use eyre::Result;
use tracing::debug;

/// Sentinel tag left on instrumented methods.
pub const BREAK_TAG: &str = "comet.debugging.break";

/// Prepends a debugger break to every method decorated with a tracked
/// marker type.
///
/// Methods carrying [`BREAK_TAG`] are skipped, so applying the rewrite to an
/// already-instrumented program changes nothing.
#[derive(Debug, Clone)]
pub struct BreakingEditor {
    tracked: BTreeSet<TypeId>,
}

impl BreakingEditor {
    pub fn new(tracked: impl IntoIterator<Item = TypeId>) -> Self {
        Self {
            tracked: tracked.into_iter().collect(),
        }
    }

    fn rewrite(tracked: &BTreeSet<TypeId>, program: Program, outbox: &mut Outbox) -> Program {
        let mut matched = 0usize;
        let mut instrumented = Vec::new();

        let program = program.map_methods(|owner, method| {
            if !method.is_decorated_with(|ty| tracked.contains(ty)) {
                return method;
            }
            matched += 1;
            if method.has_tag(BREAK_TAG) {
                return method;
            }
            instrumented.push(format!("{owner}.{}", method.name));
            instrument(method)
        });

        debug!(matched, instrumented = instrumented.len(), "debugger breaks");
        if matched == 0 {
            outbox.warning("no methods are decorated with a tracked marker type");
        } else if instrumented.is_empty() {
            outbox.info(format!("{matched} method(s) already break into the debugger"));
        } else {
            outbox.info(format!(
                "instrumented {} method(s) with debugger breaks: {}",
                instrumented.len(),
                instrumented.join(", ")
            ));
        }

        program
    }
}

fn instrument(mut method: Method) -> Method {
    method
        .body
        .insert(0, Stmt::Intrinsic(Intrinsic::DebuggerBreak));
    method.tags.insert(BREAK_TAG.to_string());
    method
}

impl Editor for BreakingEditor {
    fn name(&self) -> &str {
        "breaking"
    }

    fn initialize(
        &mut self,
        _program: &Program,
        cx: &mut EditorContext<'_>,
        _cancel: &CancellationToken,
    ) -> Result<()> {
        let tracked = self.tracked.clone();
        cx.register(move |program, _cancel, outbox| Ok(Self::rewrite(&tracked, program, outbox)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use comet_ir::{Attribute, TypeDecl};

    use super::*;

    fn program() -> Program {
        Program::new("Demo")
            .with_type(TypeDecl::attribute("Demo.TraceAttribute"))
            .with_type(TypeDecl::attribute("Demo.OtherAttribute"))
            .with_type(
                TypeDecl::new("Demo.Service")
                    .method(
                        Method::new("Foo")
                            .attribute(Attribute::new("Demo.TraceAttribute"))
                            .stmt(Stmt::Expr("Work()".into())),
                    )
                    .method(
                        Method::new("Bar")
                            .attribute(Attribute::new("Demo.OtherAttribute"))
                            .stmt(Stmt::Expr("Work()".into())),
                    ),
            )
    }

    fn tracked() -> BTreeSet<TypeId> {
        BTreeSet::from([TypeId::from("Demo.TraceAttribute")])
    }

    #[test]
    fn test_instruments_decorated_method_only() {
        let mut outbox = Outbox::new("breaking");
        let edited = BreakingEditor::rewrite(&tracked(), program(), &mut outbox);

        let owner = TypeId::from("Demo.Service");
        let foo = edited.method(&owner, "Foo").unwrap();
        assert_eq!(foo.body[0], Stmt::Intrinsic(Intrinsic::DebuggerBreak));
        assert_eq!(foo.body[1], Stmt::Expr("Work()".into()));
        assert!(foo.has_tag(BREAK_TAG));
        assert_eq!(
            edited.method(&owner, "Bar"),
            program().method(&owner, "Bar")
        );
        assert_eq!(outbox.diagnostics().len(), 1);
    }

    #[test]
    fn test_second_application_is_noop() {
        let mut outbox = Outbox::new("breaking");
        let once = BreakingEditor::rewrite(&tracked(), program(), &mut outbox);
        let twice = BreakingEditor::rewrite(&tracked(), once.clone(), &mut outbox);

        assert_eq!(once, twice);
        assert!(outbox.diagnostics()[1].message.contains("already"));
    }

    #[test]
    fn test_warns_when_nothing_matches() {
        let mut outbox = Outbox::new("breaking");
        let untouched = BreakingEditor::rewrite(
            &BTreeSet::from([TypeId::from("Demo.UnusedAttribute")]),
            program(),
            &mut outbox,
        );

        assert_eq!(untouched, program());
        assert!(outbox.diagnostics()[0].severity.is_warning());
    }
}
