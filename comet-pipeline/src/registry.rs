//! Marker registry and stage discovery.

use comet_ir::{MarkerDecl, Program, TypeTable};
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::{Editor, Marker, MarkerOrigin, PipelineError, ValidationError};

/// Validating constructor for one marker kind.
pub type MarkerFactory = fn(&MarkerDecl, &TypeTable) -> Result<Box<dyn Marker>, ValidationError>;

struct Registration {
    description: &'static str,
    factory: MarkerFactory,
}

/// Table mapping marker kinds to their factories.
///
/// Populated once per host session, then only read. Registration order is
/// kept so listings are stable.
///
/// # Example
///
/// ```ignore
/// let mut registry = MarkerRegistry::new();
/// registry.register("break-on", "break when marked methods run", BreakOn::from_decl);
///
/// let markers = registry.resolve(&program)?;
/// ```
#[derive(Default)]
pub struct MarkerRegistry {
    entries: IndexMap<&'static str, Registration>,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for `kind`, replacing any earlier registration.
    pub fn register(
        &mut self,
        kind: &'static str,
        description: &'static str,
        factory: MarkerFactory,
    ) -> &mut Self {
        let previous = self.entries.insert(
            kind,
            Registration {
                description,
                factory,
            },
        );
        if previous.is_some() {
            warn!(kind, "marker kind registered twice; keeping the latest factory");
        }
        self
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.entries.contains_key(kind)
    }

    /// Registered kinds and their descriptions, in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.entries.iter().map(|(kind, reg)| (*kind, reg.description))
    }

    /// Construct and validate a single marker.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownKind`] for unregistered kinds, or
    /// whatever the kind's factory rejects the payload with.
    pub fn resolve_one(
        &self,
        decl: &MarkerDecl,
        types: &TypeTable,
    ) -> Result<Box<dyn Marker>, ValidationError> {
        let Some(registration) = self.entries.get(decl.kind.as_str()) else {
            return Err(ValidationError::UnknownKind {
                kind: decl.kind.clone(),
                known: self.entries.keys().copied().collect::<Vec<_>>().join(", "),
            });
        };
        (registration.factory)(decl, types)
    }

    /// Construct and validate every marker the program declares.
    ///
    /// Fails on the first invalid marker, before any editor is created.
    pub fn resolve(&self, program: &Program) -> Result<Vec<Box<dyn Marker>>, ValidationError> {
        program
            .markers
            .iter()
            .enumerate()
            .map(|(index, decl)| {
                self.resolve_one(decl, &program.types).inspect_err(|err| {
                    warn!(index, kind = %decl.kind, %err, "marker failed validation");
                })
            })
            .collect()
    }
}

/// An editor produced by discovery, with the marker it came from.
pub struct DiscoveredStage {
    pub origin: MarkerOrigin,
    pub editor: Box<dyn Editor>,
}

/// Ask every marker for its editors.
///
/// Markers are processed in collection order and each marker's editors keep
/// the order it returned them in.
///
/// # Errors
///
/// Returns [`PipelineError::StageInitialization`] for the first marker whose
/// initialization fails.
pub fn discover(markers: &[Box<dyn Marker>]) -> Result<Vec<DiscoveredStage>, PipelineError> {
    let mut stages = Vec::new();
    for (index, marker) in markers.iter().enumerate() {
        let origin = MarkerOrigin::new(index, marker.kind());
        let editors = marker
            .initialize()
            .map_err(|source| PipelineError::StageInitialization {
                marker: origin.clone(),
                stage: None,
                source: source.into(),
            })?;
        debug!(marker = %origin, editors = editors.len(), "discovered editors");
        stages.extend(editors.into_iter().map(|editor| DiscoveredStage {
            origin: origin.clone(),
            editor,
        }));
    }
    Ok(stages)
}
