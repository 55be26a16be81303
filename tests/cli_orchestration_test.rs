use bump_version::cli::orchestration::{
    build_sync_config, run_bump_workflow, BumpWorkflowArgs, WorkflowResult,
};
use bump_version::config::Config;
use bump_version::domain::{BumpKind, Platform, SkipSet};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("ios/App.xcodeproj")).unwrap();
    fs::create_dir_all(root.join("android/app")).unwrap();
    fs::write(root.join("package.json"), "{\n  \"version\": \"0.4.1\"\n}\n").unwrap();
    fs::write(
        root.join("ios/App.xcodeproj/project.pbxproj"),
        "CURRENT_PROJECT_VERSION = 1;\nMARKETING_VERSION = 0.4.1;\n",
    )
    .unwrap();
    fs::write(
        root.join("android/app/build.gradle"),
        "versionCode 9\nversionName \"0.4.1\"\n",
    )
    .unwrap();
    dir
}

fn args_for(root: &Path) -> BumpWorkflowArgs {
    BumpWorkflowArgs {
        root: Some(root.to_path_buf()),
        ..BumpWorkflowArgs::default()
    }
}

#[test]
fn test_workflow_result_structure() {
    let result = WorkflowResult {
        changes: Vec::new(),
        written: true,
        skipped: false,
    };

    assert!(result.changes.is_empty());
    assert!(result.written);
    assert!(!result.skipped);
}

#[test]
fn test_args_override_config_file() {
    let mut config = Config::default();
    config.bump.kind = Some("major".to_string());
    config.bump.skip_code_for = vec!["ios".to_string()];

    let args = BumpWorkflowArgs {
        bump: Some(BumpKind::Patch),
        root: Some(PathBuf::from("/srv/app")),
        build_gradle: Some(PathBuf::from("android/mobile/build.gradle")),
        ..BumpWorkflowArgs::default()
    };
    let sync = build_sync_config(&args, &config).unwrap();

    assert_eq!(sync.bump, Some(BumpKind::Patch));
    assert!(sync.skip_code_for.skips(Platform::Ios));
    assert!(!sync.skip_code_for.skips(Platform::Android));
    assert_eq!(sync.root, PathBuf::from("/srv/app"));
    assert_eq!(
        sync.build_gradle_path,
        Some(PathBuf::from("/srv/app/android/mobile/build.gradle"))
    );
}

#[test]
fn test_config_values_used_when_flags_absent() {
    let mut config = Config::default();
    config.bump.kind = Some("minor".to_string());
    config.bump.skip_semver_for = vec!["android".to_string()];

    let sync = build_sync_config(&BumpWorkflowArgs::default(), &config).unwrap();

    assert_eq!(sync.bump, Some(BumpKind::Minor));
    assert_eq!(sync.skip_semver_for, "android".parse::<SkipSet>().unwrap());
}

#[test]
fn test_invalid_config_values_are_reported() {
    let mut config = Config::default();
    config.bump.kind = Some("huge".to_string());
    let err = build_sync_config(&BumpWorkflowArgs::default(), &config).unwrap_err();
    assert!(format!("{:#}", err).contains("'huge' is not a semver bump type"));

    let mut config = Config::default();
    config.bump.skip_code_for = vec!["web".to_string()];
    let err = build_sync_config(&BumpWorkflowArgs::default(), &config).unwrap_err();
    assert!(format!("{:#}", err).contains("skip_code_for"));
}

#[test]
fn test_workflow_runs_and_writes() {
    let dir = project();
    let args = BumpWorkflowArgs {
        bump: Some(BumpKind::Patch),
        ..args_for(dir.path())
    };

    let result = run_bump_workflow(args, Config::default()).unwrap();

    assert!(result.written);
    assert!(!result.skipped);
    assert_eq!(result.changes.len(), 5);
    let gradle = fs::read_to_string(dir.path().join("android/app/build.gradle")).unwrap();
    assert_eq!(gradle, "versionCode 10\nversionName \"0.4.2\"\n");
}

#[test]
fn test_workflow_dry_run_leaves_files() {
    let dir = project();
    let args = BumpWorkflowArgs {
        semver: Some("1.0.0".to_string()),
        dry_run: true,
        ..args_for(dir.path())
    };

    let result = run_bump_workflow(args, Config::default()).unwrap();

    assert!(!result.written);
    assert!(result
        .changes
        .iter()
        .any(|c| c.file == "package.json" && c.next == "1.0.0"));
    let package = fs::read_to_string(dir.path().join("package.json")).unwrap();
    assert!(package.contains("0.4.1"));
}

#[test]
fn test_workflow_skip_all_short_circuits() {
    let dir = TempDir::new().unwrap();
    let args = BumpWorkflowArgs {
        skip_code_for: Some(SkipSet::all()),
        skip_semver_for: Some(SkipSet::all()),
        ..args_for(dir.path())
    };

    let result = run_bump_workflow(args, Config::default()).unwrap();

    assert!(result.skipped);
    assert!(result.changes.is_empty());
}

#[test]
fn test_workflow_missing_spec_is_error() {
    let dir = project();
    let err = run_bump_workflow(args_for(dir.path()), Config::default()).unwrap_err();
    assert!(format!("{:#}", err).contains("Bump type and semver value not specified"));
}
