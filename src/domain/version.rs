use crate::error::{BumpError, Result};
use std::fmt;
use std::str::FromStr;

/// Semantic version representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// Create a new version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a strict `major.minor.patch` string (e.g., "1.2.3" -> Version(1,2,3))
    pub fn parse(text: &str) -> Result<Self> {
        let parts: Vec<&str> = text.split('.').collect();
        if parts.len() != 3 {
            return Err(BumpError::parse(text, "is not in X.Y.Z format"));
        }

        // u32::from_str accepts a leading '+', so digits are checked first
        let component = |name: &str, part: &str| {
            let invalid =
                || BumpError::parse(text, format!("has an invalid {} component '{}'", name, part));
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse::<u32>().map_err(|_| invalid())
        };

        Ok(Version {
            major: component("major", parts[0])?,
            minor: component("minor", parts[1])?,
            patch: component("patch", parts[2])?,
        })
    }

    /// Bump version according to bump kind
    ///
    /// Fails when the bumped component would not fit in a `u32`.
    pub fn bump(&self, kind: BumpKind) -> Result<Self> {
        let increment = |name: &str, value: u32| {
            value.checked_add(1).ok_or_else(|| {
                BumpError::parse(self.to_string(), format!("{name} overflows on {kind} bump"))
            })
        };
        Ok(match kind {
            BumpKind::Major => Version::new(increment("major", self.major)?, 0, 0),
            BumpKind::Minor => Version::new(self.major, increment("minor", self.minor)?, 0),
            BumpKind::Patch => {
                Version::new(self.major, self.minor, increment("patch", self.patch)?)
            }
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = BumpError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

/// Semver release type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpKind {
    Major,
    Minor,
    Patch,
}

impl BumpKind {
    pub fn name(&self) -> &'static str {
        match self {
            BumpKind::Major => "major",
            BumpKind::Minor => "minor",
            BumpKind::Patch => "patch",
        }
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BumpKind {
    type Err = BumpError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "major" => Ok(BumpKind::Major),
            "minor" => Ok(BumpKind::Minor),
            "patch" => Ok(BumpKind::Patch),
            other => Err(BumpError::InvalidBumpKind(other.to_string())),
        }
    }
}
