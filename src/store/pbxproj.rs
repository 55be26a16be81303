use crate::domain::FieldChange;
use crate::error::{BumpError, Result};
use crate::store::{Storage, TextBuffer};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub const LABEL: &str = "iOS project.pbxproj";

static PROJECT_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"CURRENT_PROJECT_VERSION = (\d+);").expect("hardcoded regex must compile")
});

static MARKETING_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"MARKETING_VERSION = (.*?);").expect("hardcoded regex must compile")
});

/// Xcode project descriptor (`project.pbxproj`)
///
/// A project lists both fields once per build configuration, so every
/// occurrence is rewritten with the value derived from the first one.
#[derive(Debug)]
pub struct PbxprojFile<S> {
    text: TextBuffer<S>,
}

impl<S: Storage> PbxprojFile<S> {
    pub fn new(storage: S, path: Option<PathBuf>) -> Self {
        PbxprojFile {
            text: TextBuffer::new(storage, path, LABEL),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.text.path()
    }

    /// In-memory project text, `None` if the file was never touched
    pub fn content(&self) -> Option<&str> {
        self.text.content()
    }

    /// Increment `CURRENT_PROJECT_VERSION` by one
    pub fn bump_project_version(&mut self) -> Result<FieldChange> {
        let field = self
            .text
            .extract_field(&PROJECT_VERSION, "CURRENT_PROJECT_VERSION")?;
        let next = match field.value.parse::<u64>().ok().and_then(|c| c.checked_add(1)) {
            Some(next) => next.to_string(),
            None => {
                return Err(BumpError::InvalidVersionCode {
                    path: self.display_path(),
                    value: field.value,
                })
            }
        };

        self.text.replace_all_fields(
            &PROJECT_VERSION,
            "CURRENT_PROJECT_VERSION",
            &field.substitute(&next),
        )?;

        Ok(FieldChange::new(LABEL, "code", Some(field.value), next))
    }

    /// Set `MARKETING_VERSION` to `next` verbatim
    pub fn set_marketing_version(&mut self, next: &str) -> Result<FieldChange> {
        let field = self.text.extract_field(&MARKETING_VERSION, "MARKETING_VERSION")?;

        self.text.replace_all_fields(
            &MARKETING_VERSION,
            "MARKETING_VERSION",
            &field.substitute(next),
        )?;

        Ok(FieldChange::new(LABEL, "version", Some(field.value), next))
    }

    pub fn reset(&mut self) {
        self.text.reset();
    }

    pub fn write(&self) -> Result<bool> {
        self.text.write()
    }

    fn display_path(&self) -> String {
        self.path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| LABEL.to_string())
    }
}
