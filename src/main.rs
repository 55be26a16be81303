use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bump_version::cli::orchestration::{run_bump_workflow, BumpWorkflowArgs};
use bump_version::config;
use bump_version::domain::{BumpKind, SkipSet};
use bump_version::ui;

#[derive(clap::Parser)]
#[command(
    name = "bump-version",
    about = "Keep React Native iOS, Android and package.json versions in sync"
)]
struct Args {
    #[arg(
        short = 't',
        long = "type",
        value_name = "major|minor|patch",
        help = "SemVer release type, optional if --skip-semver-for all is passed, ignored when --semver is passed"
    )]
    bump: Option<BumpKind>,

    #[arg(long, help = "Release version if known. Overwrites calculated SemVer")]
    semver: Option<String>,

    #[arg(
        long,
        value_name = "android|ios|all",
        help = "Skip the SemVer bump for the listed platforms (space or comma separated)"
    )]
    skip_semver_for: Option<SkipSet>,

    #[arg(
        long,
        value_name = "android|ios|all",
        help = "Skip the version code bump for the listed platforms (space or comma separated)"
    )]
    skip_code_for: Option<SkipSet>,

    #[arg(short, long, help = "Project root directory")]
    root: Option<PathBuf>,

    #[arg(long, help = "Path to the iOS project.pbxproj")]
    pbxproj: Option<PathBuf>,

    #[arg(long, help = "Path to the Android app build.gradle")]
    build_gradle: Option<PathBuf>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(short, long, help = "Print version information")]
    version: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.version {
        println!("bump-version {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Load configuration
    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let workflow_args = BumpWorkflowArgs {
        bump: args.bump,
        semver: args.semver,
        skip_semver_for: args.skip_semver_for,
        skip_code_for: args.skip_code_for,
        root: args.root,
        pbxproj: args.pbxproj,
        build_gradle: args.build_gradle,
        dry_run: args.dry_run,
    };

    match run_bump_workflow(workflow_args, config) {
        Ok(result) if result.skipped => {}
        Ok(result) => {
            ui::display_changes(&result.changes, result.written);
            if result.written {
                ui::display_success("Version fields updated");
            }
        }
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }

    Ok(())
}
