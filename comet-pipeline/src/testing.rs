//! Test utilities for editors and markers.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

use std::fmt;

use comet_ir::Program;
use eyre::Result;

use crate::{CancellationToken, Editor, EditorContext, Marker};

type MakeEditors = Box<dyn Fn() -> Result<Vec<Box<dyn Editor>>> + Send + Sync>;
type InitFn =
    Box<dyn FnMut(&Program, &mut EditorContext<'_>, &CancellationToken) -> Result<()> + Send>;

/// A marker whose editors come from a closure.
pub struct StaticMarker {
    kind: &'static str,
    make: MakeEditors,
}

impl StaticMarker {
    pub fn new<F>(kind: &'static str, make: F) -> Self
    where
        F: Fn() -> Result<Vec<Box<dyn Editor>>> + Send + Sync + 'static,
    {
        Self {
            kind,
            make: Box::new(make),
        }
    }

    pub fn boxed(self) -> Box<dyn Marker> {
        Box::new(self)
    }
}

impl fmt::Debug for StaticMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticMarker")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl Marker for StaticMarker {
    fn kind(&self) -> &'static str {
        self.kind
    }

    fn initialize(&self) -> Result<Vec<Box<dyn Editor>>> {
        (self.make)()
    }
}

/// An editor whose `initialize` is a closure.
pub struct FnEditor {
    name: String,
    init: InitFn,
}

impl FnEditor {
    pub fn new<F>(name: impl Into<String>, init: F) -> Self
    where
        F: FnMut(&Program, &mut EditorContext<'_>, &CancellationToken) -> Result<()>
            + Send
            + 'static,
    {
        Self {
            name: name.into(),
            init: Box::new(init),
        }
    }

    /// An editor that registers nothing.
    pub fn noop(name: impl Into<String>) -> Self {
        Self::new(name, |_, _, _| Ok(()))
    }

    /// An editor registering one rewrite per suffix, each appending it to
    /// the program name. The resulting name records the application order.
    pub fn appending(name: impl Into<String>, suffixes: &[&str]) -> Self {
        let suffixes: Vec<String> = suffixes.iter().map(|s| s.to_string()).collect();
        Self::new(name, move |_, cx, _| {
            for suffix in &suffixes {
                let suffix = suffix.clone();
                cx.register(move |mut program, _, _| {
                    program.name.push_str(&suffix);
                    Ok(program)
                });
            }
            Ok(())
        })
    }

    pub fn boxed(self) -> Box<dyn Editor> {
        Box::new(self)
    }
}

impl Editor for FnEditor {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(
        &mut self,
        program: &Program,
        cx: &mut EditorContext<'_>,
        cancel: &CancellationToken,
    ) -> Result<()> {
        (self.init)(program, cx, cancel)
    }
}

/// A marker contributing a single editor built by `make`.
pub fn single<F>(kind: &'static str, make: F) -> Box<dyn Marker>
where
    F: Fn() -> FnEditor + Send + Sync + 'static,
{
    StaticMarker::new(kind, move || Ok(vec![make().boxed()])).boxed()
}
