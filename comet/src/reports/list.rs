//! List command report data structures.

use super::output::{Output, Report};

/// Marker kinds known to the host.
#[derive(Debug)]
pub struct ListReport {
    /// `(kind, description)` pairs in registration order.
    pub kinds: Vec<(String, String)>,
}

impl Report for ListReport {
    fn render(&self, out: &mut dyn Output) {
        if self.kinds.is_empty() {
            out.preformatted("No marker kinds registered.");
            return;
        }

        out.section(&format!("Marker kinds ({})", self.kinds.len()));
        let width = self.kinds.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (kind, description) in &self.kinds {
            out.list_item(&format!("{:width$}  {}", kind, description));
        }
    }
}
