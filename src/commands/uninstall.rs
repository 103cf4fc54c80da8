//! Uninstall command CLI wrapper
//!
//! Delegates to [`Uninstaller`]; the credential store supplies the username
//! used for scoped package names.

use std::path::Path;

use super::CommandContext;
use crate::auth::{Authenticator, CredentialStore};
use crate::cli::UninstallArgs;
use crate::error::Result;
use crate::installer::{PipTool, UninstallOutcome, Uninstaller};
use crate::manifest::InstallManifest;

/// Run uninstall command
pub fn run(ctx: &CommandContext, args: UninstallArgs) -> Result<()> {
    let options = ctx.registry_options();
    let tool = PipTool::new(options.python, ctx.verbose);
    let username = CredentialStore::from_env().username();
    let uninstaller = Uninstaller::new(&tool, username, ctx.verbose);

    execute(&uninstaller, &ctx.working_dir, args.name.as_deref())
}

/// Uninstall `name`, or every top-level artifact in `murmur.yaml`
pub fn execute(uninstaller: &Uninstaller<'_>, working_dir: &Path, name: Option<&str>) -> Result<()> {
    match name {
        Some(name) => {
            match uninstaller.uninstall(name)? {
                UninstallOutcome::Removed(_) => {
                    super::success(&format!("Successfully uninstalled {name}"));
                }
                UninstallOutcome::NotInstalled => {
                    super::notice(&format!("Artifact '{name}' is not installed"));
                }
            }
            Ok(())
        }
        None => {
            let manifest = InstallManifest::load(working_dir)?;
            let results = uninstaller.uninstall_manifest(&manifest);

            let mut failures = 0;
            for (name, result) in &results {
                match result {
                    Ok(UninstallOutcome::Removed(_)) => println!("Uninstalled {name}"),
                    Ok(UninstallOutcome::NotInstalled) => println!("{name} is not installed"),
                    Err(e) => {
                        failures += 1;
                        super::warning(&format!("Failed to uninstall {name}: {e}"));
                    }
                }
            }

            if failures == 0 {
                super::success("Successfully uninstalled all artifacts from manifest");
            } else {
                super::notice(&format!(
                    "Uninstall completed with {failures} failed artifact(s)"
                ));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{FakePackageTool, create_temp_dir, create_test_files};

    #[test]
    fn test_not_installed_is_not_an_error() {
        let temp = create_temp_dir();
        let fake = FakePackageTool::new(temp.path());
        let uninstaller = Uninstaller::new(&fake, None, false);
        assert!(execute(&uninstaller, temp.path(), Some("ghost")).is_ok());
    }

    #[test]
    fn test_single_failure_fails_command() {
        let temp = create_temp_dir();
        let fake = FakePackageTool::new(temp.path())
            .with_installed("planner", "1.0.0")
            .failing_uninstall("planner");
        let uninstaller = Uninstaller::new(&fake, None, false);
        let err = execute(&uninstaller, temp.path(), Some("planner")).unwrap_err();
        assert_eq!(err.code(), 309);
    }

    #[test]
    fn test_manifest_failures_are_warnings() {
        let temp = create_temp_dir();
        create_test_files(
            temp.path(),
            &[("murmur.yaml", "agents:\n  - name: planner\ntools:\n  - name: clock\n")],
        );
        let fake = FakePackageTool::new(temp.path())
            .with_installed("planner", "1.0.0")
            .with_installed("clock", "1.0.0")
            .failing_uninstall("planner");
        let uninstaller = Uninstaller::new(&fake, None, false);

        execute(&uninstaller, temp.path(), None).unwrap();
        assert_eq!(fake.uninstalls.borrow().as_slice(), ["planner", "clock"]);
        assert!(!fake.is_installed("clock"));
    }
}
