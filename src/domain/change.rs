use std::fmt;

/// A single field rewritten by a run, kept for status reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    /// Human readable file label, e.g. "iOS project.pbxproj"
    pub file: String,
    /// Field kind, "code" or "version"
    pub field: String,
    /// Value before the run; absent when the file had none
    pub previous: Option<String>,
    pub next: String,
}

impl FieldChange {
    pub fn new(
        file: impl Into<String>,
        field: impl Into<String>,
        previous: Option<String>,
        next: impl Into<String>,
    ) -> Self {
        FieldChange {
            file: file.into(),
            field: field.into(),
            previous,
            next: next.into(),
        }
    }
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} -> {}",
            self.file,
            self.field,
            self.previous.as_deref().unwrap_or("(none)"),
            self.next
        )
    }
}
