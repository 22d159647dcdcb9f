//! Validation helpers.

use miette::SourceSpan;

use crate::{Error, Result};

/// Source context used while validating a parsed manifest.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ParseContext<'a> {
    src: &'a str,
    filename: &'a str,
}

impl<'a> ParseContext<'a> {
    pub(crate) fn new(src: &'a str, filename: &'a str) -> Self {
        Self { src, filename }
    }

    /// Validate the project name.
    pub(crate) fn validate_name(&self, name: &str) -> Result<()> {
        if let Some(reason) = validate_name(name) {
            return Err(Error::invalid_name(
                name,
                reason,
                self.src,
                self.filename,
                find_key_span(self.src, "project", "name"),
            ));
        }
        Ok(())
    }

    /// Reject an empty path value for `[section] key`.
    pub(crate) fn require_path(
        &self,
        section: &str,
        key: &str,
        value: &std::path::Path,
    ) -> Result<()> {
        if value.as_os_str().is_empty() {
            return Err(Error::validation(
                format!("'{section}.{key}' must not be empty"),
                self.src,
                self.filename,
                find_key_span(self.src, section, key),
            ));
        }
        Ok(())
    }
}

/// Find the span of `key = value` inside the `[section]` table.
pub(crate) fn find_key_span(src: &str, section: &str, key: &str) -> Option<SourceSpan> {
    let mut current = "";
    for (offset, line) in line_offsets(src) {
        let trimmed = line.trim_start();
        if let Some(header) = trimmed.strip_prefix('[') {
            current = header.split(']').next().unwrap_or_default().trim();
            continue;
        }
        if current != section {
            continue;
        }
        let Some(rest) = trimmed.strip_prefix(key) else {
            continue;
        };
        if !rest.trim_start().starts_with('=') {
            continue;
        }
        let start = offset + (line.len() - trimmed.len());
        return Some(SourceSpan::from((start, trimmed.trim_end().len())));
    }
    None
}

fn line_offsets(src: &str) -> impl Iterator<Item = (usize, &str)> {
    src.split_inclusive('\n').scan(0, |offset, line| {
        let start = *offset;
        *offset += line.len();
        Some((start, line.trim_end_matches(['\r', '\n'])))
    })
}

/// Returns None if valid, Some(reason) if invalid.
pub(crate) fn validate_name(name: &str) -> Option<&'static str> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Some("name cannot be empty");
    };
    if !first.is_ascii_alphabetic() {
        return Some("name must start with a letter");
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')) {
        return Some("name contains invalid characters");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(validate_name("demo").is_none());
        assert!(validate_name("Demo.App-2_x").is_none());
    }

    #[test]
    fn test_invalid_names() {
        assert_eq!(validate_name(""), Some("name cannot be empty"));
        assert_eq!(validate_name("1demo"), Some("name must start with a letter"));
        assert_eq!(validate_name("de mo"), Some("name contains invalid characters"));
    }

    #[test]
    fn test_find_key_span() {
        let src = "[project]\nname = \"demo\"\nprogram = \"p.json\"\n";
        let span = find_key_span(src, "project", "program").unwrap();
        assert_eq!(span.offset(), 24);
        assert_eq!(span.len(), "program = \"p.json\"".len());
        assert!(find_key_span(src, "project", "output").is_none());
    }

    #[test]
    fn test_find_key_span_is_scoped_to_section() {
        let src = "[project]\nname = \"demo\"\nprogram = \"p.json\"\n\n[output]\nprogram = \"\"\n";
        let span = find_key_span(src, "output", "program").unwrap();
        assert_eq!(span.offset(), src.rfind("program").unwrap());
        assert!(find_key_span(src, "pipeline", "program").is_none());
    }
}
