//! Debugging editors for Comet.
//!
//! The [`BreakOn`] marker makes every method decorated with one of the
//! configured marker types break into the debugger as soon as it is invoked.
//!
//! ```json
//! { "kind": "break-on", "args": { "types": ["Demo.TraceAttribute"] } }
//! ```

mod break_on;
mod breaking;

pub use break_on::BreakOn;
pub use breaking::{BREAK_TAG, BreakingEditor};
use comet_pipeline::MarkerRegistry;

/// Register the debugging marker kinds.
pub fn register(registry: &mut MarkerRegistry) {
    registry.register(
        BreakOn::KIND,
        "break into the debugger when methods with the given marker types run",
        BreakOn::from_decl,
    );
}
