use crate::domain::FieldChange;
use crate::error::{BumpError, Result};
use crate::store::{Storage, TextBuffer};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub const LABEL: &str = "Android build.gradle";

// Groovy `versionCode 3` and Kotlin DSL `versionCode = 3`
static VERSION_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bversionCode(?:\s*=\s*|\s+)(\d+)\b").expect("hardcoded regex must compile")
});

// any assigned value, only consulted when no integer literal is found
static VERSION_CODE_ANY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bversionCode(?:\s*=\s*|\s+)(\S+)").expect("hardcoded regex must compile")
});

static VERSION_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bversionName(?:\s*=\s*|\s+)('[^'\n]*'|"[^"\n]*")"#)
        .expect("hardcoded regex must compile")
});

/// Android module build script (`build.gradle` / `build.gradle.kts`)
#[derive(Debug)]
pub struct GradleFile<S> {
    text: TextBuffer<S>,
}

impl<S: Storage> GradleFile<S> {
    pub fn new(storage: S, path: Option<PathBuf>) -> Self {
        GradleFile {
            text: TextBuffer::new(storage, path, LABEL),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.text.path()
    }

    /// In-memory build script, `None` if the file was never touched
    pub fn content(&self) -> Option<&str> {
        self.text.content()
    }

    /// Increment `versionCode` by one
    ///
    /// The first integer literal assignment wins. Fails with
    /// [BumpError::InvalidVersionCode] when the field only holds something
    /// else, e.g. a property reference, or when the code cannot be incremented.
    pub fn bump_code(&mut self) -> Result<FieldChange> {
        let field = match self.text.extract_field(&VERSION_CODE, "versionCode") {
            Err(BumpError::FieldNotFound { .. }) => {
                let found = self.text.extract_field(&VERSION_CODE_ANY, "versionCode")?;
                return Err(self.invalid_code(found.value));
            }
            found => found?,
        };
        let next = match field.value.parse::<u64>().ok().and_then(|c| c.checked_add(1)) {
            Some(next) => next.to_string(),
            None => return Err(self.invalid_code(field.value)),
        };

        self.text.replace_field(&VERSION_CODE, "versionCode", &field.substitute(&next))?;

        Ok(FieldChange::new(LABEL, "code", Some(field.value), next))
    }

    /// Set `versionName`, keeping whichever quote character the file uses
    pub fn set_version_name(&mut self, next: &str) -> Result<FieldChange> {
        let field = self.text.extract_field(&VERSION_NAME, "versionName")?;
        // the pattern guarantees a quote on both ends
        let quote = &field.value[..1];
        let current = field.value[1..field.value.len() - 1].to_string();

        self.text.replace_field(
            &VERSION_NAME,
            "versionName",
            &field.substitute(&format!("{quote}{next}{quote}")),
        )?;

        Ok(FieldChange::new(LABEL, "version", Some(current), next))
    }

    pub fn reset(&mut self) {
        self.text.reset();
    }

    pub fn write(&self) -> Result<bool> {
        self.text.write()
    }

    fn invalid_code(&self, value: String) -> BumpError {
        BumpError::InvalidVersionCode {
            path: self
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| LABEL.to_string()),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStorage;

    const PATH: &str = "android/app/build.gradle";

    fn gradle(contents: &str) -> GradleFile<MemoryStorage> {
        let storage = MemoryStorage::new();
        storage.insert(PATH, contents);
        GradleFile::new(storage, Some(PathBuf::from(PATH)))
    }

    const DOUBLE: &str = r#"android {
    compileSdkVersion rootProject.ext.compileSdkVersion

    defaultConfig {
        applicationId "com.example.app"
        minSdkVersion rootProject.ext.minSdkVersion
        versionCode 41
        versionName "1.2.3"
    }
}
"#;

    #[test]
    fn test_bump_code() {
        let mut file = gradle(DOUBLE);
        let change = file.bump_code().unwrap();

        assert_eq!(change.previous.as_deref(), Some("41"));
        assert_eq!(change.next, "42");
        assert_eq!(
            file.content().unwrap(),
            DOUBLE.replace("versionCode 41", "versionCode 42")
        );
    }

    #[test]
    fn test_set_version_name_double_quotes() {
        let mut file = gradle(DOUBLE);
        let change = file.set_version_name("1.3.0").unwrap();

        assert_eq!(change.previous.as_deref(), Some("1.2.3"));
        assert_eq!(
            file.content().unwrap(),
            DOUBLE.replace(r#"versionName "1.2.3""#, r#"versionName "1.3.0""#)
        );
    }

    #[test]
    fn test_set_version_name_preserves_single_quotes() {
        let mut file = gradle("defaultConfig {\n    versionName '1.2.3'\n}\n");
        file.set_version_name("1.3.0").unwrap();
        assert_eq!(
            file.content().unwrap(),
            "defaultConfig {\n    versionName '1.3.0'\n}\n"
        );
    }

    #[test]
    fn test_kotlin_dsl_assignment() {
        let mut file = gradle("versionCode = 7\nversionName = \"0.9.0\"\n");
        file.bump_code().unwrap();
        file.set_version_name("1.0.0").unwrap();
        assert_eq!(
            file.content().unwrap(),
            "versionCode = 8\nversionName = \"1.0.0\"\n"
        );
    }

    #[test]
    fn test_non_integer_code_is_rejected() {
        let mut file = gradle("versionCode rootProject.ext.versionCode\n");
        match file.bump_code().unwrap_err() {
            BumpError::InvalidVersionCode { value, .. } => {
                assert_eq!(value, "rootProject.ext.versionCode")
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(file.content(), Some("versionCode rootProject.ext.versionCode\n"));
    }

    #[test]
    fn test_prose_mention_before_code_is_ignored() {
        let text = "// versionCode is bumped by CI
versionCode 41
";
        let mut file = gradle(text);
        let change = file.bump_code().unwrap();

        assert_eq!(change.previous.as_deref(), Some("41"));
        assert_eq!(
            file.content().unwrap(),
            "// versionCode is bumped by CI\nversionCode 42\n"
        );
    }

    #[test]
    fn test_code_with_suffix_is_rejected() {
        let mut file = gradle("versionCode 41abc\n");
        assert!(matches!(
            file.bump_code(),
            Err(BumpError::InvalidVersionCode { ref value, .. }) if value == "41abc"
        ));
    }

    #[test]
    fn test_code_at_limit_is_rejected() {
        let max = u64::MAX.to_string();
        let text = format!("versionCode {max}\n");
        let mut file = gradle(&text);

        let err = file.bump_code().unwrap_err();
        assert!(matches!(err, BumpError::InvalidVersionCode { ref value, .. } if *value == max));
        assert!(err.to_string().contains(PATH));
        assert_eq!(file.content(), Some(text.as_str()));
    }

    #[test]
    fn test_code_too_large_for_u64_is_rejected() {
        let mut file = gradle("versionCode 99999999999999999999\n");
        assert!(matches!(
            file.bump_code(),
            Err(BumpError::InvalidVersionCode { .. })
        ));
    }

    #[test]
    fn test_missing_version_name() {
        let mut file = gradle("versionCode 1\n");
        assert!(matches!(
            file.set_version_name("1.0.0"),
            Err(BumpError::FieldNotFound { .. })
        ));
    }
}
