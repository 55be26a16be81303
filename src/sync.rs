//! Version synchronization across the native projects and JSON manifests
//!
//! [VersionSync] computes every change against in-memory buffers first
//! ([VersionSync::dry_run]) and only touches storage on [VersionSync::run].
//! A run that fails never writes anything.

use crate::domain::{BumpKind, FieldChange, Platform, SkipSet, Version};
use crate::error::{BumpError, Result};
use crate::store::{FsStorage, GradleFile, ManifestFile, ManifestKind, PbxprojFile, Storage};
use std::path::PathBuf;
use tracing::debug;

/// Resolved options for one run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyncConfig {
    /// Explicit next version, written verbatim
    pub semver: Option<String>,
    /// Bump rule applied to the `package.json` version when no override is given
    pub bump: Option<BumpKind>,
    pub skip_semver_for: SkipSet,
    pub skip_code_for: SkipSet,
    /// Project root holding the JSON manifests
    pub root: PathBuf,
    pub pbxproj_path: Option<PathBuf>,
    pub build_gradle_path: Option<PathBuf>,
}

impl SyncConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SyncConfig {
            root: root.into(),
            ..SyncConfig::default()
        }
    }

    /// Both phases are disabled; the run has nothing to do
    pub fn skips_everything(&self) -> bool {
        self.skip_code_for.is_all() && self.skip_semver_for.is_all()
    }
}

/// Lifecycle of a [VersionSync]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Computed,
    Committed,
}

/// Owns every store of a project and sequences a run over them
#[derive(Debug)]
pub struct VersionSync<S: Storage = FsStorage> {
    config: SyncConfig,
    pbxproj: PbxprojFile<S>,
    gradle: GradleFile<S>,
    package_json: ManifestFile<S>,
    app_json: ManifestFile<S>,
    state: SyncState,
    changes: Vec<FieldChange>,
}

impl VersionSync<FsStorage> {
    pub fn new(config: SyncConfig) -> Self {
        Self::with_storage(config, FsStorage)
    }
}

impl<S: Storage + Clone> VersionSync<S> {
    pub fn with_storage(config: SyncConfig, storage: S) -> Self {
        VersionSync {
            pbxproj: PbxprojFile::new(storage.clone(), config.pbxproj_path.clone()),
            gradle: GradleFile::new(storage.clone(), config.build_gradle_path.clone()),
            package_json: ManifestFile::new(storage.clone(), &config.root, ManifestKind::Package),
            app_json: ManifestFile::new(storage, &config.root, ManifestKind::App),
            config,
            state: SyncState::Idle,
            changes: Vec::new(),
        }
    }
}

impl<S: Storage> VersionSync<S> {
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Changes computed by the last run, in application order
    pub fn changes(&self) -> &[FieldChange] {
        &self.changes
    }

    pub fn pbxproj(&self) -> &PbxprojFile<S> {
        &self.pbxproj
    }

    pub fn gradle(&self) -> &GradleFile<S> {
        &self.gradle
    }

    pub fn package_json(&self) -> &ManifestFile<S> {
        &self.package_json
    }

    pub fn app_json(&self) -> &ManifestFile<S> {
        &self.app_json
    }

    /// Compute every change in memory without writing anything.
    ///
    /// Calling it again recomputes from the text originally read, so repeated
    /// calls produce the same buffers.
    pub fn dry_run(&mut self) -> Result<&Self> {
        self.reset();

        if self.config.skips_everything() {
            debug!("code and semver phases skipped; nothing to compute");
            self.state = SyncState::Computed;
            return Ok(&*self);
        }

        let current = self.package_json.version()?.ok_or_else(|| {
            BumpError::field_not_found(self.package_json.path(), "version")
        })?;
        // resolved before any buffer is touched
        let next = self.resolve_next(&current)?;

        if self.config.skip_code_for.is_all() {
            debug!("build code phase skipped");
        } else {
            self.bump_codes()?;
        }

        match next {
            Some(next) => self.sync_semver(&next)?,
            None => debug!("semver phase skipped"),
        }

        self.state = SyncState::Computed;
        Ok(&*self)
    }

    /// Compute the run, then flush every store in a fixed order
    pub fn run(&mut self) -> Result<&[FieldChange]> {
        self.dry_run()?;

        self.pbxproj.write()?;
        self.gradle.write()?;
        self.package_json.write()?;
        self.app_json.write()?;

        self.state = SyncState::Committed;
        Ok(&self.changes)
    }

    /// Target version for the semver phase, `None` when that phase is skipped
    fn resolve_next(&self, current: &str) -> Result<Option<String>> {
        if self.config.skip_semver_for.is_all() {
            return Ok(None);
        }

        match (&self.config.semver, self.config.bump) {
            (Some(semver), _) => Ok(Some(semver.clone())),
            (None, Some(kind)) => Ok(Some(Version::parse(current)?.bump(kind)?.to_string())),
            (None, None) => Err(BumpError::MissingVersionSpec),
        }
    }

    fn bump_codes(&mut self) -> Result<()> {
        if self.config.skip_code_for.skips(Platform::Ios) {
            debug!(platform = %Platform::Ios, "build code bump skipped");
        } else {
            let change = self.pbxproj.bump_project_version()?;
            self.record(change);
        }

        if self.config.skip_code_for.skips(Platform::Android) {
            debug!(platform = %Platform::Android, "build code bump skipped");
        } else {
            let change = self.gradle.bump_code()?;
            self.record(change);
        }

        Ok(())
    }

    fn sync_semver(&mut self, next: &str) -> Result<()> {
        if self.config.skip_semver_for.skips(Platform::Ios) {
            debug!(platform = %Platform::Ios, "version sync skipped");
        } else {
            let change = self.pbxproj.set_marketing_version(next)?;
            self.record(change);
        }

        if self.config.skip_semver_for.skips(Platform::Android) {
            debug!(platform = %Platform::Android, "version sync skipped");
        } else {
            let change = self.gradle.set_version_name(next)?;
            self.record(change);
        }

        // manifests follow the release version regardless of platform skips
        if let Some(change) = self.package_json.set_version(next)? {
            self.record(change);
        }
        if let Some(change) = self.app_json.set_version(next)? {
            self.record(change);
        }

        Ok(())
    }

    fn record(&mut self, change: FieldChange) {
        debug!(%change, "computed change");
        self.changes.push(change);
    }

    fn reset(&mut self) {
        self.pbxproj.reset();
        self.gradle.reset();
        self.package_json.reset();
        self.app_json.reset();
        self.changes.clear();
    }
}
