//! Main workflow orchestration logic
//!
//! Merges command-line arguments with the configuration file, resolves the
//! project paths and drives a [VersionSync]. Keeping this out of main.rs lets
//! the workflow be called programmatically without depending on clap.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::config::{Config, ProjectPaths};
use crate::domain::{BumpKind, FieldChange, Platform, SkipSet};
use crate::sync::{SyncConfig, VersionSync};
use crate::ui;

/// Arguments for the bump workflow
///
/// Mirrors the CLI Args in a format suitable for orchestration logic.
/// Unset values fall back to the configuration file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BumpWorkflowArgs {
    /// Semver release type
    pub bump: Option<BumpKind>,

    /// Explicit release version, written verbatim
    pub semver: Option<String>,

    /// Platforms whose version name is left alone
    pub skip_semver_for: Option<SkipSet>,

    /// Platforms whose build code is left alone
    pub skip_code_for: Option<SkipSet>,

    /// Project root directory
    pub root: Option<PathBuf>,

    /// Path to `project.pbxproj`
    pub pbxproj: Option<PathBuf>,

    /// Path to the app module `build.gradle`
    pub build_gradle: Option<PathBuf>,

    /// Preview mode - compute changes without writing files
    pub dry_run: bool,
}

/// Result of a bump workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// Every field rewritten, in application order
    pub changes: Vec<FieldChange>,

    /// Whether files were written
    pub written: bool,

    /// Whether skip flags disabled every phase
    pub skipped: bool,
}

/// Build the run configuration from arguments and file configuration
///
/// Flags win over file values. Invalid bump types or platform names in the
/// file are reported here, before any file is opened.
pub fn build_sync_config(args: &BumpWorkflowArgs, config: &Config) -> Result<SyncConfig> {
    let bump = match args.bump {
        Some(kind) => Some(kind),
        None => config
            .bump
            .kind
            .as_deref()
            .map(str::parse::<BumpKind>)
            .transpose()
            .context("invalid bump type in configuration")?,
    };

    let skip_semver_for = match &args.skip_semver_for {
        Some(set) => set.clone(),
        None => parse_skip_list(&config.bump.skip_semver_for)
            .context("invalid skip_semver_for in configuration")?,
    };
    let skip_code_for = match &args.skip_code_for {
        Some(set) => set.clone(),
        None => parse_skip_list(&config.bump.skip_code_for)
            .context("invalid skip_code_for in configuration")?,
    };

    let mut project = config.project.clone();
    if let Some(root) = &args.root {
        project.root = root.clone();
    }
    if args.pbxproj.is_some() {
        project.pbxproj = args.pbxproj.clone();
    }
    if args.build_gradle.is_some() {
        project.build_gradle = args.build_gradle.clone();
    }
    let paths = ProjectPaths::resolve(&project);
    debug!(?paths, "resolved project paths");
    debug!(%skip_semver_for, %skip_code_for, "resolved skip lists");

    Ok(SyncConfig {
        semver: args.semver.clone(),
        bump,
        skip_semver_for,
        skip_code_for,
        root: paths.root,
        pbxproj_path: paths.pbxproj,
        build_gradle_path: paths.build_gradle,
    })
}

fn parse_skip_list(entries: &[String]) -> crate::Result<SkipSet> {
    entries.iter().map(|entry| entry.parse::<Platform>()).collect()
}

/// Main bump workflow
///
/// Orchestrates one run:
/// 1. Build the run configuration from args and config file
/// 2. Stop early when both phases are skipped
/// 3. Warn about lenient override handling
/// 4. Compute every change, and write unless in dry-run mode
///
/// # Arguments
///
/// * `args` - Workflow arguments
/// * `config` - bump-version configuration
///
/// # Returns
///
/// The computed changes, or the first error that aborted the run
pub fn run_bump_workflow(args: BumpWorkflowArgs, config: Config) -> Result<WorkflowResult> {
    let sync_config = build_sync_config(&args, &config)?;

    if sync_config.skips_everything() {
        ui::display_status("All bumps skipped due to skip flags.");
        return Ok(WorkflowResult {
            changes: Vec::new(),
            written: false,
            skipped: true,
        });
    }

    warn_on_override(&sync_config);

    let mut sync = VersionSync::new(sync_config);
    let changes = if args.dry_run {
        sync.dry_run()
            .context("failed to compute version changes")?
            .changes()
            .to_vec()
    } else {
        sync.run()
            .context("failed to update version fields")?
            .to_vec()
    };

    Ok(WorkflowResult {
        changes,
        written: !args.dry_run,
        skipped: false,
    })
}

/// The override always wins; say so instead of failing
fn warn_on_override(config: &SyncConfig) {
    let Some(semver) = &config.semver else {
        return;
    };

    if let Some(kind) = config.bump {
        warn!(%kind, semver = %semver, "explicit semver given; ignoring bump type");
        ui::display_status(&format!(
            "--semver {} overrides bump type '{}'",
            semver, kind
        ));
    }

    if let Err(e) = semver::Version::parse(semver) {
        warn!(semver = %semver, error = %e, "override is not a valid semantic version");
        ui::display_status(&format!(
            "'{}' is not a valid semantic version; writing it verbatim",
            semver
        ));
    }
}
