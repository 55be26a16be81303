use crate::domain::FieldChange;
use crate::error::{BumpError, Result};
use crate::store::{Storage, TextBuffer};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// JSON manifest variants kept in sync with the native projects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    /// `package.json`, top-level `version`; always required
    Package,
    /// `app.json`, `expo.version`; optional
    App,
}

impl ManifestKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            ManifestKind::Package => "package.json",
            ManifestKind::App => "app.json",
        }
    }

    /// Keys leading to the version string
    pub fn key_path(&self) -> &'static [&'static str] {
        match self {
            ManifestKind::Package => &["version"],
            ManifestKind::App => &["expo", "version"],
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, ManifestKind::App)
    }
}

#[derive(Debug)]
enum Document {
    Unloaded,
    /// Optional manifest that could not be loaded
    Missing,
    Loaded(Value),
}

/// JSON manifest store
///
/// The version is edited on the parsed document and the whole document is
/// re-serialized into the text buffer, with 2-space indentation and the
/// original key order. A manifest that is read but never edited is written
/// back byte for byte.
#[derive(Debug)]
pub struct ManifestFile<S> {
    kind: ManifestKind,
    path: PathBuf,
    text: TextBuffer<S>,
    document: Document,
}

impl<S: Storage> ManifestFile<S> {
    /// Manifest of `kind` located directly under `root`
    pub fn new(storage: S, root: &Path, kind: ManifestKind) -> Self {
        let path = root.join(kind.file_name());
        ManifestFile {
            kind,
            text: TextBuffer::new(storage, Some(path.clone()), kind.file_name()),
            path,
            document: Document::Unloaded,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parsed in-memory document, `None` until loaded or when absent
    pub fn document(&self) -> Option<&Value> {
        match &self.document {
            Document::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// In-memory manifest text, `None` until loaded or when absent
    pub fn content(&self) -> Option<&str> {
        self.text.content()
    }

    /// Current version string, `None` when an optional manifest is absent
    /// or carries no version
    pub fn version(&mut self) -> Result<Option<String>> {
        self.load()?;
        let Document::Loaded(doc) = &self.document else {
            return Ok(None);
        };
        Ok(lookup(doc, self.kind.key_path())
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    /// Set the version, keeping every other key and its position.
    ///
    /// Returns `None` when there is nothing to update: an optional manifest
    /// that is absent or lacks the parent object of the version key.
    pub fn set_version(&mut self, next: &str) -> Result<Option<FieldChange>> {
        self.load()?;
        let Document::Loaded(doc) = &mut self.document else {
            return Ok(None);
        };

        let (parent_keys, key) = match self.kind.key_path() {
            [parents @ .., key] => (parents, *key),
            [] => return Ok(None),
        };
        let parent = match lookup_mut(doc, parent_keys).and_then(Value::as_object_mut) {
            Some(parent) => parent,
            None if self.kind.is_optional() => {
                let parent_name = parent_keys.join(".");
                debug!(path = %self.path.display(), "no {} object; skipping", parent_name);
                return Ok(None);
            }
            None => {
                return Err(BumpError::field_not_found(
                    &self.path,
                    self.kind.key_path().join("."),
                ))
            }
        };

        let previous = parent.get(key).and_then(Value::as_str).map(str::to_string);
        parent.insert(key.to_string(), Value::String(next.to_string()));

        let serialized = self.serialize()?;
        self.text.set_content(serialized);

        Ok(Some(FieldChange::new(
            self.kind.file_name(),
            "version",
            previous,
            next,
        )))
    }

    pub fn reset(&mut self) {
        self.text.reset();
        if let Document::Loaded(_) = self.document {
            self.document = Document::Unloaded;
        }
    }

    pub fn write(&self) -> Result<bool> {
        self.text.write()
    }

    fn load(&mut self) -> Result<()> {
        if !matches!(self.document, Document::Unloaded) {
            return Ok(());
        }

        let parsed = self.text.read().and_then(|raw| {
            serde_json::from_str::<Value>(raw).map_err(|source| BumpError::Json {
                path: self.path.display().to_string(),
                source,
            })
        });

        self.document = match parsed {
            Ok(value) => Document::Loaded(value),
            Err(err) if self.kind.is_optional() => {
                debug!(path = %self.path.display(), error = %err, "optional manifest unavailable");
                Document::Missing
            }
            Err(err) => return Err(err),
        };
        Ok(())
    }

    fn serialize(&self) -> Result<String> {
        let Document::Loaded(doc) = &self.document else {
            return Ok(String::new());
        };
        let mut serialized =
            serde_json::to_string_pretty(doc).map_err(|source| BumpError::Json {
                path: self.path.display().to_string(),
                source,
            })?;
        if self.text.original().is_some_and(|raw| raw.ends_with('\n')) {
            serialized.push('\n');
        }
        Ok(serialized)
    }
}

fn lookup<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(value, |current, key| current.get(*key))
}

fn lookup_mut<'a>(value: &'a mut Value, keys: &[&str]) -> Option<&'a mut Value> {
    keys.iter().try_fold(value, |current, key| current.get_mut(*key))
}
