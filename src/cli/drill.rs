use std::fmt::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;

use crate::cli::ExitStatus;
use crate::constants::{CONFIG_FILE, FIXTURE_DIR, FIXTURE_NESTING_DIR, FIXTURE_STEM, HOOKS_DIR};
use crate::fs::{CWD, Simplified};
use crate::pre_commit::Launcher;
use crate::printer::Printer;
use crate::workspace::Workspace;
use crate::{archive, git, warn_user};

/// Run the whole pipeline: preflight, workspace setup, fixture extraction,
/// hook invocation, and diff reporting.
///
/// The hook runner's own exit code never fails the run; only setup failures
/// do. The workspace is removed on every exit path when the [`Workspace`]
/// drops.
pub(crate) async fn drill(printer: Printer) -> Result<ExitStatus> {
    let project_root = CWD.clone();
    let mut stdout = printer.stdout();

    writeln!(
        stdout,
        "Testing pre-commit hooks for `{}`",
        project_root.simplified_display()
    )?;

    // Preflight: everything required must exist before a workspace is created.
    let fixture_dir = project_root.join(FIXTURE_DIR);
    let Some(fixture) = archive::find_fixture(&fixture_dir, FIXTURE_STEM) else {
        bail!(
            "Fixture archive not found at `{}`",
            fixture_dir.join(format!("{FIXTURE_STEM}.zip")).user_display()
        );
    };
    writeln!(
        stdout,
        "Using fixture archive `{}`",
        fixture.user_display()
    )?;

    if !project_root.join(CONFIG_FILE).is_file() {
        bail!(
            "No `{CONFIG_FILE}` found in `{}`",
            project_root.simplified_display()
        );
    }
    if !project_root.join(HOOKS_DIR).is_dir() {
        bail!(
            "No `{HOOKS_DIR}` hook definitions directory found in `{}`",
            project_root.simplified_display()
        );
    }

    let launcher = Launcher::find()?;
    writeln!(stdout, "Using launcher `{launcher}`")?;

    let workspace = Workspace::create().await?;
    writeln!(
        stdout,
        "Created workspace `{}`",
        workspace.root().simplified_display()
    )?;

    git::init_repo(workspace.root())
        .await
        .context("Failed to initialize the workspace repository")?;
    workspace
        .copy_project_files(&project_root)
        .await
        .context("Failed to copy the hook configuration into the workspace")?;

    writeln!(stdout, "Extracting fixture files into the workspace")?;
    archive::extract(&fixture, workspace.root())
        .await
        .with_context(|| format!("Failed to extract `{}`", fixture.user_display()))?;
    archive::flatten(workspace.root(), FIXTURE_NESTING_DIR)
        .await
        .context("Failed to flatten the fixture layout")?;

    git::add_all(workspace.root())
        .await
        .context("Failed to stage the fixture files")?;

    writeln!(stdout, "Installing pre-commit hooks")?;
    launcher
        .install(workspace.root())
        .await
        .context("Failed to install pre-commit hooks")?;

    writeln!(stdout, "Running `{launcher} run --all-files`")?;
    let output = launcher.run_all_files(workspace.root()).await?;
    let success = output.status.success();

    writeln!(stdout, "Exit code: {}", output.status.code().unwrap_or(-1))?;
    let run_stdout = String::from_utf8_lossy(&output.stdout);
    if !run_stdout.trim().is_empty() {
        writeln!(stdout, "Standard output:")?;
        writeln!(stdout, "{}", run_stdout.trim_end())?;
    }
    let run_stderr = String::from_utf8_lossy(&output.stderr);
    if !run_stderr.trim().is_empty() {
        writeln!(stdout, "Standard error:")?;
        writeln!(stdout, "{}", run_stderr.trim_end())?;
    }

    report_diff(workspace.root(), printer).await?;

    if success {
        writeln!(stdout)?;
        writeln!(
            stdout,
            "{}: Pre-commit run completed successfully",
            "success".green().bold()
        )?;
    } else {
        warn_user!("Pre-commit run completed with issues (expected when hooks modify files)");
    }

    writeln!(stdout)?;
    writeln!(stdout, "Instructions for manual review:")?;
    writeln!(stdout, "1. Review the diff above to see what changes were made")?;
    writeln!(stdout, "2. Check that formatting improvements look correct")?;
    writeln!(stdout, "3. Verify that linting issues were properly identified")?;
    writeln!(stdout, "4. The workspace is removed automatically on exit")?;

    Ok(ExitStatus::Success)
}

/// Print the staged diff (hook changes already in the index) and, separately,
/// any further unstaged changes. Absence of changes is reported explicitly.
async fn report_diff(root: &Path, printer: Printer) -> Result<()> {
    let mut stdout = printer.stdout();

    writeln!(stdout)?;
    writeln!(stdout, "{}", "=".repeat(60))?;
    writeln!(stdout, "Diff: changes applied by pre-commit hooks")?;
    writeln!(stdout, "{}", "=".repeat(60))?;

    let staged = git::diff(root, true).await?;
    if staged.is_empty() {
        writeln!(stdout, "No changes detected in staged files.")?;
    } else {
        write!(stdout, "{staged}")?;
    }

    writeln!(stdout)?;
    writeln!(stdout, "{}", "-".repeat(40))?;
    writeln!(stdout, "Additional unstaged changes")?;
    writeln!(stdout, "{}", "-".repeat(40))?;

    let unstaged = git::diff(root, false).await?;
    if unstaged.is_empty() {
        writeln!(stdout, "No changes detected in unstaged files.")?;
    } else {
        write!(stdout, "{unstaged}")?;
    }

    writeln!(stdout, "{}", "=".repeat(60))?;
    Ok(())
}
