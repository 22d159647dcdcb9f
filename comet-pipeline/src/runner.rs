//! Pipeline executor.

use std::fmt;

use comet_ir::Program;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    Cancelled, CancellationToken, Diagnostic, Marker, MarkerOrigin, Outbox, PipelineError,
    Plugin, RewriteInfo,
    editor::{EditorContext, Rewrite},
    error::BoxError,
    registry::{DiscoveredStage, discover},
};

/// Execution state of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineState {
    /// Discovering editors and letting them register rewrites.
    Collecting,
    /// Applying the rewrite chain.
    Executing,
    /// Terminal: the run completed or aborted.
    Done,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineState::Collecting => write!(f, "collecting"),
            PipelineState::Executing => write!(f, "executing"),
            PipelineState::Done => write!(f, "done"),
        }
    }
}

/// Summary of one editor taking part in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageInfo {
    /// Editor name.
    pub name: String,
    /// The marker that contributed the editor.
    pub marker: MarkerOrigin,
    /// Number of rewrites the editor registered.
    pub rewrites: usize,
}

/// A successful run.
#[derive(Debug)]
pub struct Completed {
    /// The edited program.
    pub program: Program,
    /// Diagnostics in stage order, then emission order.
    pub diagnostics: Vec<Diagnostic>,
    /// Editors that took part, in initialization order.
    pub stages: Vec<StageInfo>,
}

/// A run that stopped before completing. No edit may be applied.
#[derive(Debug)]
pub struct Aborted {
    /// Why the run stopped.
    pub error: PipelineError,
    /// Diagnostics collected up to the abort point.
    pub diagnostics: Vec<Diagnostic>,
    /// Editors initialized before the abort.
    pub stages: Vec<StageInfo>,
}

impl Aborted {
    /// Always `false`: an aborted run never yields a usable program.
    pub fn edit_usable(&self) -> bool {
        false
    }

    /// Whether the run stopped on request rather than because of a fault.
    pub fn is_cancellation(&self) -> bool {
        self.error.is_cancellation()
    }
}

/// Result of [`Pipeline::run`].
#[derive(Debug)]
pub enum RunOutcome {
    Completed(Completed),
    Aborted(Aborted),
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }

    /// Diagnostics of the run, whatever its outcome.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            RunOutcome::Completed(done) => &done.diagnostics,
            RunOutcome::Aborted(aborted) => &aborted.diagnostics,
        }
    }

    pub fn into_result(self) -> Result<Completed, Aborted> {
        match self {
            RunOutcome::Completed(done) => Ok(done),
            RunOutcome::Aborted(aborted) => Err(aborted),
        }
    }
}

/// The editor pipeline.
///
/// A `Pipeline` is configuration only: each call to [`run`](Self::run)
/// builds its own stages and rewrite chain, so runs never share state.
///
/// # Example
///
/// ```ignore
/// let pipeline = Pipeline::new().plugin(SnapshotPlugin::new());
/// let markers = registry.resolve(&program)?;
///
/// match pipeline.run(program, &markers, &CancellationToken::new()) {
///     RunOutcome::Completed(done) => emit(done.program),
///     RunOutcome::Aborted(aborted) => report(&aborted),
/// }
/// ```
pub struct Pipeline {
    plugins: Vec<Box<dyn Plugin>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Add a plugin to receive run lifecycle hooks.
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Run the pipeline over `program`.
    ///
    /// 1. Collecting: discover editors from `markers` and initialize each in
    ///    order. A failure or cancellation ends the run without touching the
    ///    program.
    /// 2. Executing: apply every registered rewrite in registration order,
    ///    checking `cancel` before each one.
    pub fn run(
        &self,
        program: Program,
        markers: &[Box<dyn Marker>],
        cancel: &CancellationToken,
    ) -> RunOutcome {
        let mut run = Run::new(self);

        if let Err(error) = run.collect(&program, markers, cancel) {
            return RunOutcome::Aborted(run.abort(error));
        }

        run.enter(PipelineState::Executing);
        match run.execute(program, cancel) {
            Ok(program) => RunOutcome::Completed(run.complete(program)),
            Err(error) => RunOutcome::Aborted(run.abort(error)),
        }
    }

    /// Discover and initialize editors without applying any rewrite.
    ///
    /// Useful to validate a compilation's markers and preview its stages.
    pub fn collect(
        &self,
        program: &Program,
        markers: &[Box<dyn Marker>],
        cancel: &CancellationToken,
    ) -> Result<(Vec<StageInfo>, Vec<Diagnostic>), Aborted> {
        let mut run = Run::new(self);
        match run.collect(program, markers, cancel) {
            Ok(()) => {
                run.enter(PipelineState::Done);
                let stages = run.stage_infos();
                Ok((stages, run.drain_diagnostics()))
            }
            Err(error) => Err(run.abort(error)),
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

struct Stage {
    name: String,
    origin: MarkerOrigin,
    outbox: Outbox,
}

/// State of a single run. Owns the editors, their outboxes and the chain.
struct Run<'p> {
    pipeline: &'p Pipeline,
    state: PipelineState,
    stages: Vec<Stage>,
    editors: Vec<Box<dyn crate::Editor>>,
    chain: Vec<Rewrite>,
}

impl<'p> Run<'p> {
    fn new(pipeline: &'p Pipeline) -> Self {
        let mut run = Self {
            pipeline,
            state: PipelineState::Collecting,
            stages: Vec::new(),
            editors: Vec::new(),
            chain: Vec::new(),
        };
        run.enter(PipelineState::Collecting);
        run
    }

    fn enter(&mut self, state: PipelineState) {
        debug!(from = %self.state, to = %state, "pipeline state change");
        self.state = state;
        for plugin in &self.pipeline.plugins {
            plugin.on_state(state);
        }
    }

    fn collect(
        &mut self,
        program: &Program,
        markers: &[Box<dyn Marker>],
        cancel: &CancellationToken,
    ) -> Result<(), PipelineError> {
        check(cancel)?;
        let discovered = discover(markers)?;
        info!(
            markers = markers.len(),
            editors = discovered.len(),
            "collecting rewrites"
        );

        for DiscoveredStage { origin, mut editor } in discovered {
            check(cancel)?;

            let index = self.stages.len();
            let name = editor.name().to_string();
            self.stages.push(Stage {
                name: name.clone(),
                origin: origin.clone(),
                outbox: Outbox::new(&name),
            });

            let outbox = &mut self.stages[index].outbox;
            let mut cx = EditorContext::new(index, &mut self.chain, outbox);
            editor
                .initialize(program, &mut cx, cancel)
                .map_err(|report| {
                    if report.downcast_ref::<Cancelled>().is_some() {
                        PipelineError::Cancelled
                    } else {
                        PipelineError::StageInitialization {
                            marker: origin,
                            stage: Some(name.clone()),
                            source: report.into(),
                        }
                    }
                })?;
            debug!(stage = %name, rewrites = cx.registered(), "initialized editor");
            self.editors.push(editor);
        }

        Ok(())
    }

    fn execute(
        &mut self,
        mut program: Program,
        cancel: &CancellationToken,
    ) -> Result<Program, PipelineError> {
        let plugins = &self.pipeline.plugins;

        for (index, rewrite) in self.chain.iter_mut().enumerate() {
            check(cancel)?;

            let stage = &mut self.stages[rewrite.stage];
            let info = RewriteInfo {
                index,
                stage: &stage.name,
            };
            let failure = |source: BoxError| PipelineError::RewriteFailure {
                stage: stage.name.clone(),
                index,
                source,
            };

            for plugin in plugins {
                plugin
                    .on_before_rewrite(&info, &program)
                    .map_err(|e| failure(e.into()))?;
            }

            debug!(index, stage = %stage.name, "applying rewrite");
            program = (rewrite.func)(program, cancel, &mut stage.outbox).map_err(|report| {
                if report.downcast_ref::<Cancelled>().is_some() {
                    PipelineError::Cancelled
                } else {
                    failure(report.into())
                }
            })?;

            for plugin in plugins {
                plugin
                    .on_after_rewrite(&info, &program)
                    .map_err(|e| failure(e.into()))?;
            }
        }

        Ok(program)
    }

    fn stage_infos(&self) -> Vec<StageInfo> {
        self.stages
            .iter()
            .enumerate()
            .map(|(index, stage)| StageInfo {
                name: stage.name.clone(),
                marker: stage.origin.clone(),
                rewrites: self.chain.iter().filter(|r| r.stage == index).count(),
            })
            .collect()
    }

    fn drain_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.stages)
            .into_iter()
            .flat_map(|stage| stage.outbox.into_diagnostics())
            .collect()
    }

    fn complete(mut self, program: Program) -> Completed {
        self.enter(PipelineState::Done);
        let stages = self.stage_infos();
        let diagnostics = self.drain_diagnostics();
        info!(
            editors = self.editors.len(),
            rewrites = self.chain.len(),
            diagnostics = diagnostics.len(),
            "pipeline completed"
        );
        Completed {
            program,
            diagnostics,
            stages,
        }
    }

    fn abort(mut self, error: PipelineError) -> Aborted {
        self.enter(PipelineState::Done);
        if error.is_cancellation() {
            info!("pipeline cancelled; discarding edits");
        } else {
            warn!(%error, "pipeline aborted; discarding edits");
        }
        let stages = self.stage_infos();
        let diagnostics = self.drain_diagnostics();
        Aborted {
            error,
            diagnostics,
            stages,
        }
    }
}

fn check(cancel: &CancellationToken) -> Result<(), PipelineError> {
    cancel.check().map_err(|Cancelled| PipelineError::Cancelled)
}
