//! List operation - registered marker kinds.

use crate::{host::Host, reports::ListReport};

/// Execute the list operation.
pub fn list(host: &Host) -> ListReport {
    ListReport {
        kinds: host
            .registry()
            .kinds()
            .map(|(kind, description)| (kind.to_string(), description.to_string()))
            .collect(),
    }
}
