use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Represents the complete configuration for bump-version.
///
/// Describes where the native projects live and which bumps run by default.
/// Command-line flags take precedence over every value here.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub bump: BumpConfig,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_ios_source_dir() -> PathBuf {
    PathBuf::from("ios")
}

fn default_android_source_dir() -> PathBuf {
    PathBuf::from("android")
}

fn default_android_app_name() -> String {
    "app".to_string()
}

/// Location of the project files.
///
/// Relative paths are resolved against `root`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProjectConfig {
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Explicit path to `project.pbxproj`; skips discovery when set
    #[serde(default)]
    pub pbxproj: Option<PathBuf>,

    /// Xcode project or workspace name, e.g. `App.xcworkspace`
    #[serde(default)]
    pub xcode_project: Option<String>,

    #[serde(default = "default_ios_source_dir")]
    pub ios_source_dir: PathBuf,

    /// Explicit path to the app module build script
    #[serde(default)]
    pub build_gradle: Option<PathBuf>,

    #[serde(default = "default_android_source_dir")]
    pub android_source_dir: PathBuf,

    #[serde(default = "default_android_app_name")]
    pub android_app_name: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            root: default_root(),
            pbxproj: None,
            xcode_project: None,
            ios_source_dir: default_ios_source_dir(),
            build_gradle: None,
            android_source_dir: default_android_source_dir(),
            android_app_name: default_android_app_name(),
        }
    }
}

/// Default bump behavior.
///
/// Values are kept as raw strings and validated when the run is assembled,
/// so a bad entry is reported with the same message as a bad flag.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct BumpConfig {
    /// `major`, `minor` or `patch`
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    #[serde(default)]
    pub skip_semver_for: Vec<String>,

    #[serde(default)]
    pub skip_code_for: Vec<String>,
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `bumpversion.toml` in current directory
/// 3. `~/.config/.bumpversion.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config, Box<dyn std::error::Error>> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./bumpversion.toml").exists() {
        fs::read_to_string("./bumpversion.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".bumpversion.toml");
        if config_path.exists() {
            debug!(path = %config_path.display(), "using user config");
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}

/// Resolved locations of the native project files.
///
/// A path that cannot be determined stays `None`; the run only fails on it
/// when a phase actually needs that file.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub pbxproj: Option<PathBuf>,
    pub build_gradle: Option<PathBuf>,
}

impl ProjectPaths {
    pub fn resolve(project: &ProjectConfig) -> Self {
        let root = project.root.clone();
        ProjectPaths {
            pbxproj: resolve_pbxproj(&root, project),
            build_gradle: resolve_build_gradle(&root, project),
            root,
        }
    }
}

fn resolve_pbxproj(root: &Path, project: &ProjectConfig) -> Option<PathBuf> {
    if let Some(path) = &project.pbxproj {
        return Some(root.join(path));
    }

    let source_dir = root.join(&project.ios_source_dir);
    let xcodeproj = match &project.xcode_project {
        Some(name) => source_dir.join(name.replace(".xcworkspace", ".xcodeproj")),
        None => discover_xcodeproj(&source_dir)?,
    };
    Some(xcodeproj.join("project.pbxproj"))
}

/// First `*.xcodeproj` directory in `dir`, by name
fn discover_xcodeproj(dir: &Path) -> Option<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "cannot scan for an Xcode project");
            return None;
        }
    };

    let mut projects: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir() && path.extension().is_some_and(|ext| ext == "xcodeproj"))
        .collect();
    projects.sort();
    projects.into_iter().next()
}

fn resolve_build_gradle(root: &Path, project: &ProjectConfig) -> Option<PathBuf> {
    if let Some(path) = &project.build_gradle {
        return Some(root.join(path));
    }

    let module_dir = root
        .join(&project.android_source_dir)
        .join(&project.android_app_name);
    let groovy = module_dir.join("build.gradle");
    let kotlin = module_dir.join("build.gradle.kts");
    if !groovy.exists() && kotlin.exists() {
        Some(kotlin)
    } else {
        Some(groovy)
    }
}
