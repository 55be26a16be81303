use crate::error::{BumpError, Result};
use crate::store::Storage;
use regex::{Captures, NoExpand, Regex};
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::debug;

/// First match of a field pattern
///
/// Holds the captured value and the full matched text so a replacement can
/// be rebuilt with every byte around the value untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    /// Text of the first capture group
    pub value: String,
    /// Text of the whole match
    pub matched: String,
    value_range: Range<usize>,
}

impl FieldMatch {
    fn from_captures(captures: &Captures<'_>) -> Option<Self> {
        let whole = captures.get(0)?;
        let group = captures.get(1)?;
        Some(FieldMatch {
            value: group.as_str().to_string(),
            matched: whole.as_str().to_string(),
            value_range: (group.start() - whole.start())..(group.end() - whole.start()),
        })
    }

    /// The matched text with the captured value swapped for `next`
    pub fn substitute(&self, next: &str) -> String {
        let mut replaced = self.matched.clone();
        replaced.replace_range(self.value_range.clone(), next);
        replaced
    }
}

/// Load-once text buffer backing a single descriptor file.
///
/// The file is read on first access and cached; every edit happens on the
/// cached copy. [TextBuffer::write] only touches storage when the buffer
/// was loaded, so untouched files are never recreated or rewritten.
#[derive(Debug)]
pub struct TextBuffer<S> {
    storage: S,
    path: Option<PathBuf>,
    label: &'static str,
    loaded: Option<String>,
    content: Option<String>,
}

impl<S: Storage> TextBuffer<S> {
    /// `path` may be unresolved; reading then fails with a configuration error
    pub fn new(storage: S, path: Option<PathBuf>, label: &'static str) -> Self {
        TextBuffer {
            storage,
            path,
            label,
            loaded: None,
            content: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.content.is_some()
    }

    /// Current in-memory text, `None` until loaded
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Text as it was read from storage
    pub fn original(&self) -> Option<&str> {
        self.loaded.as_deref()
    }

    /// Return the cached text, loading it from storage on first call
    pub fn read(&mut self) -> Result<&str> {
        let content = match self.content.take() {
            Some(content) => content,
            None => {
                let path = self.path.as_deref().ok_or_else(|| {
                    BumpError::config(format!("no path configured for {}", self.label))
                })?;
                let text = self
                    .storage
                    .read_to_string(path)
                    .map_err(|e| BumpError::read(path, e))?;
                debug!(path = %path.display(), bytes = text.len(), "loaded {}", self.label);
                self.loaded = Some(text.clone());
                text
            }
        };
        Ok(self.content.insert(content).as_str())
    }

    /// Capture group 1 of the first match of `pattern`
    pub fn extract_field(&mut self, pattern: &Regex, field: &str) -> Result<FieldMatch> {
        let found = {
            let content = self.read()?;
            pattern
                .captures(content)
                .and_then(|captures| FieldMatch::from_captures(&captures))
        };
        found.ok_or_else(|| self.not_found(field))
    }

    /// Replace the first match of `pattern` with `literal`, in memory only
    pub fn replace_field(&mut self, pattern: &Regex, field: &str, literal: &str) -> Result<()> {
        self.read()?;
        let range = self
            .content
            .as_deref()
            .and_then(|content| pattern.find(content))
            .map(|m| m.range());

        match (range, self.content.as_mut()) {
            (Some(range), Some(content)) => {
                content.replace_range(range, literal);
                Ok(())
            }
            _ => Err(self.not_found(field)),
        }
    }

    /// Replace every match of `pattern` with `literal`, returning the number replaced
    pub fn replace_all_fields(
        &mut self,
        pattern: &Regex,
        field: &str,
        literal: &str,
    ) -> Result<usize> {
        let (count, replaced) = {
            let content = self.read()?;
            let count = pattern.find_iter(content).count();
            (count, pattern.replace_all(content, NoExpand(literal)).into_owned())
        };
        if count == 0 {
            return Err(self.not_found(field));
        }
        self.content = Some(replaced);
        Ok(count)
    }

    /// Overwrite the cached text, e.g. with a re-serialized document
    pub(crate) fn set_content(&mut self, content: String) {
        self.content = Some(content);
    }

    /// Drop in-memory edits and go back to the text read from storage
    pub fn reset(&mut self) {
        self.content = self.loaded.clone();
    }

    /// Persist the buffer verbatim; a buffer that was never loaded is left alone
    pub fn write(&self) -> Result<bool> {
        let (Some(content), Some(path)) = (self.content.as_deref(), self.path.as_deref()) else {
            debug!("{} was not loaded; nothing to write", self.label);
            return Ok(false);
        };
        self.storage
            .write(path, content)
            .map_err(|e| BumpError::write(path, e))?;
        debug!(path = %path.display(), bytes = content.len(), "wrote {}", self.label);
        Ok(true)
    }

    fn not_found(&self, field: &str) -> BumpError {
        let path = self.path.as_deref().unwrap_or_else(|| Path::new(self.label));
        BumpError::field_not_found(path, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStorage;

    const FILE: &str = "descriptor.txt";

    fn buffer(contents: &str) -> (MemoryStorage, TextBuffer<MemoryStorage>) {
        let storage = MemoryStorage::new();
        storage.insert(FILE, contents);
        let buffer = TextBuffer::new(storage.clone(), Some(PathBuf::from(FILE)), "descriptor");
        (storage, buffer)
    }

    fn code_pattern() -> Regex {
        Regex::new(r"CODE = (\d+);").unwrap()
    }

    #[test]
    fn test_read_loads_once() {
        let (storage, mut buf) = buffer("CODE = 1;");
        buf.read().unwrap();
        buf.read().unwrap();
        buf.extract_field(&code_pattern(), "CODE").unwrap();
        assert_eq!(storage.read_count(FILE), 1);
    }

    #[test]
    fn test_read_missing_file_is_read_error() {
        let storage = MemoryStorage::new();
        let mut buf = TextBuffer::new(storage, Some(PathBuf::from("nope")), "descriptor");
        assert!(matches!(buf.read(), Err(BumpError::Read { .. })));
        assert!(!buf.is_loaded());
    }

    #[test]
    fn test_read_without_path_is_config_error() {
        let mut buf = TextBuffer::new(MemoryStorage::new(), None, "iOS project.pbxproj");
        let err = buf.read().unwrap_err();
        assert!(matches!(err, BumpError::Config(_)));
        assert!(err.to_string().contains("iOS project.pbxproj"));
    }

    #[test]
    fn test_extract_first_match_wins() {
        let (_, mut buf) = buffer("CODE = 7;\nCODE = 9;\n");
        let field = buf.extract_field(&code_pattern(), "CODE").unwrap();
        assert_eq!(field.value, "7");
        assert_eq!(field.matched, "CODE = 7;");
        assert_eq!(field.substitute("8"), "CODE = 8;");
    }

    #[test]
    fn test_extract_missing_field_is_error() {
        let (_, mut buf) = buffer("NOTHING = 1;");
        let err = buf.extract_field(&code_pattern(), "CODE").unwrap_err();
        assert!(matches!(err, BumpError::FieldNotFound { ref field, .. } if field == "CODE"));
    }

    #[test]
    fn test_replace_preserves_bytes_outside_match() {
        let text = "// header\r\n  CODE = 41; // trailing\n\tother = 1;\n";
        let (_, mut buf) = buffer(text);
        let start = text.find("CODE").unwrap();
        let end = start + "CODE = 41;".len();

        buf.replace_field(&code_pattern(), "CODE", "CODE = 1000;").unwrap();

        let content = buf.content().unwrap();
        assert_eq!(&content[..start], &text[..start]);
        assert_eq!(&content[start + "CODE = 1000;".len()..], &text[end..]);
    }

    #[test]
    fn test_replace_only_first_match() {
        let (_, mut buf) = buffer("CODE = 1; CODE = 1;");
        buf.replace_field(&code_pattern(), "CODE", "CODE = 2;").unwrap();
        assert_eq!(buf.content(), Some("CODE = 2; CODE = 1;"));
    }

    #[test]
    fn test_replace_all_fields() {
        let (_, mut buf) = buffer("CODE = 1;\nCODE = 1;\n");
        let count = buf
            .replace_all_fields(&code_pattern(), "CODE", "CODE = $2;")
            .unwrap();
        assert_eq!(count, 2);
        // literal replacement, no capture expansion
        assert_eq!(buf.content(), Some("CODE = $2;\nCODE = $2;\n"));
    }

    #[test]
    fn test_write_without_read_is_noop() {
        let (storage, buf) = buffer("CODE = 1;");
        assert!(!buf.write().unwrap());
        assert!(storage.writes().is_empty());
        assert_eq!(storage.get(FILE).as_deref(), Some("CODE = 1;"));
    }

    #[test]
    fn test_write_is_idempotent() {
        let (storage, mut buf) = buffer("CODE = 1;");
        buf.replace_field(&code_pattern(), "CODE", "CODE = 2;").unwrap();
        assert!(buf.write().unwrap());
        assert!(buf.write().unwrap());
        assert_eq!(storage.writes().len(), 2);
        assert_eq!(storage.get(FILE).as_deref(), Some("CODE = 2;"));
    }

    #[test]
    fn test_reset_restores_loaded_text_without_reading() {
        let (storage, mut buf) = buffer("CODE = 1;");
        buf.replace_field(&code_pattern(), "CODE", "CODE = 2;").unwrap();
        buf.reset();
        assert_eq!(buf.content(), Some("CODE = 1;"));
        assert_eq!(buf.original(), Some("CODE = 1;"));
        assert_eq!(storage.read_count(FILE), 1);
    }
}
