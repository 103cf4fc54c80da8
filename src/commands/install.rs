//! Install command implementation
//!
//! The install process:
//! 1. Check the runtime package is installed
//! 2. Select the registry and read its package indexes
//! 3. Install one artifact, or every node of `murmur.yaml` depth first
//! 4. Report each node and finish with a completed message

use std::path::Path;

use console::Style;

use super::CommandContext;
use crate::auth::CredentialStore;
use crate::cli::InstallArgs;
use crate::error::Result;
use crate::installer::{
    ArtifactInstaller, HttpDependencySource, InstallOutcome, NodeReport, NodeStatus, PipTool,
};
use crate::manifest::{Artifact, InstallManifest};
use crate::registry::select_adapter;

/// Run install command
pub fn run(ctx: &CommandContext, args: InstallArgs) -> Result<()> {
    let options = ctx.registry_options();
    let tool = PipTool::new(options.python.clone(), ctx.verbose);
    let dependencies = HttpDependencySource::new()?;

    let probe = ArtifactInstaller::new(&tool, &dependencies, Vec::new(), ctx.verbose);
    probe.ensure_runtime()?;

    let adapter = select_adapter(&options, Box::new(CredentialStore::from_env()))?;
    let indexes = adapter.get_package_indexes()?;
    let installer = ArtifactInstaller::new(&tool, &dependencies, indexes, ctx.verbose);

    execute(&installer, &ctx.working_dir, args.name.as_deref())
}

/// Install `name`, or everything in `working_dir`'s `murmur.yaml`
pub fn execute(installer: &ArtifactInstaller<'_>, working_dir: &Path, name: Option<&str>) -> Result<()> {
    match name {
        Some(name) => {
            match installer.install_artifact(&Artifact::latest(name))? {
                InstallOutcome::Installed => {
                    super::success(&format!("Successfully installed artifact '{name}'"));
                }
                InstallOutcome::AlreadyInstalled => {
                    super::notice(&format!("Artifact '{name}' is already installed"));
                }
            }
            Ok(())
        }
        None => {
            let manifest = InstallManifest::load(working_dir)?;
            let reports = installer.install_tree(&manifest.artifacts());
            for report in &reports {
                print_report(report);
            }

            let failures = reports.iter().filter(|r| r.is_failure()).count();
            if failures == 0 {
                super::success("Successfully installed all artifacts");
            } else {
                super::notice(&format!(
                    "Install completed with {failures} failed artifact(s)"
                ));
            }
            Ok(())
        }
    }
}

fn print_report(report: &NodeReport) {
    let indent = "  ".repeat(report.depth);
    let label = format!("{} ({})", report.name, report.version);
    match &report.status {
        NodeStatus::Installed => {
            println!("{indent}{} {label}", Style::new().green().apply_to("✓"));
        }
        NodeStatus::AlreadyInstalled => {
            println!(
                "{indent}{} {label} {}",
                Style::new().green().apply_to("✓"),
                Style::new().dim().apply_to("already installed")
            );
        }
        NodeStatus::Failed(e) => {
            println!("{indent}{} {label}: {e}", Style::new().red().apply_to("✗"));
            if let Some(detail) = e.detail() {
                println!("{indent}  {}", Style::new().dim().apply_to(detail));
            }
        }
        NodeStatus::Skipped => {
            println!(
                "{indent}{} {label} {}",
                Style::new().dim().apply_to("-"),
                Style::new().dim().apply_to("skipped")
            );
        }
    }
}
