use crate::error::{BumpError, Result};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Target platform named by the skip flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Platform {
    Android,
    Ios,
    All,
}

impl Platform {
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::All => "all",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = BumpError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "android" => Ok(Platform::Android),
            "ios" => Ok(Platform::Ios),
            "all" => Ok(Platform::All),
            other => Err(BumpError::InvalidPlatform(other.to_string())),
        }
    }
}

/// Platforms excluded from one phase of a run.
///
/// `all` supersedes every other entry: a set containing it skips the whole phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipSet(BTreeSet<Platform>);

impl SkipSet {
    pub fn all() -> Self {
        [Platform::All].into_iter().collect()
    }

    /// True when the whole phase is skipped
    pub fn is_all(&self) -> bool {
        self.0.contains(&Platform::All)
    }

    /// True when `platform` is excluded, directly or through `all`
    pub fn skips(&self, platform: Platform) -> bool {
        self.is_all() || self.0.contains(&platform)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Platform> for SkipSet {
    fn from_iter<I: IntoIterator<Item = Platform>>(iter: I) -> Self {
        SkipSet(iter.into_iter().collect())
    }
}

impl FromStr for SkipSet {
    type Err = BumpError;

    /// Parses a space or comma separated list, e.g. "android ios" or "android,ios"
    fn from_str(s: &str) -> Result<Self> {
        s.split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .map(Platform::from_str)
            .collect()
    }
}

impl fmt::Display for SkipSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(Platform::name).collect();
        write!(f, "{}", names.join(" "))
    }
}
