//! The package installer the orchestrator drives
//!
//! [`PackageTool`] is the seam between install orchestration and the actual
//! installer process. [`PipTool`] runs `python -m pip`.

use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use serde::Deserialize;
use tracing::debug;

use crate::error::{MurError, Result};

/// Index flags for one installer invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSelection {
    pub index_url: String,
    pub extra_index_urls: Vec<String>,
    /// When false the installer is told not to pull dependencies
    pub resolve_dependencies: bool,
}

impl IndexSelection {
    pub fn new(index_url: impl Into<String>, extra_index_urls: Vec<String>) -> Self {
        Self {
            index_url: index_url.into(),
            extra_index_urls,
            resolve_dependencies: true,
        }
    }

    pub fn without_dependencies(mut self) -> Self {
        self.resolve_dependencies = false;
        self
    }
}

/// An installed package as reported by the installer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InstalledPackage {
    pub name: String,
    pub version: String,
}

/// Operations the orchestrator needs from a package installer
pub trait PackageTool {
    /// Installed version of `name`, or `None` when it is not installed
    fn installed_version(&self, name: &str) -> Result<Option<String>>;

    /// Install `spec` (`name` or `name==version`) from the given indexes
    fn install(&self, spec: &str, indexes: &IndexSelection) -> Result<()>;

    fn uninstall(&self, name: &str) -> Result<()>;

    fn list_installed(&self) -> Result<Vec<InstalledPackage>>;

    /// Directory holding the import aggregation file
    fn artifacts_dir(&self) -> Result<PathBuf>;
}

/// Map a failed installer run to an error, using known stderr markers
pub fn classify_install_failure(name: &str, stderr: &str) -> MurError {
    if stderr.contains("Connection refused") || stderr.contains("Could not find a version") {
        crate::error::network::registry_unreachable(name, stderr.trim().to_string())
    } else {
        crate::error::install::installer_failed(name, stderr)
    }
}

/// Build the `pip install` argument list
pub fn pip_install_args(spec: &str, indexes: &IndexSelection, verbose: bool) -> Vec<String> {
    let mut args: Vec<String> = ["-m", "pip", "install", "--disable-pip-version-check"]
        .into_iter()
        .map(str::to_string)
        .collect();
    if !indexes.resolve_dependencies {
        args.push("--no-deps".to_string());
    }
    args.push(spec.to_string());
    args.push("--index-url".to_string());
    args.push(indexes.index_url.clone());
    for url in &indexes.extra_index_urls {
        args.push("--extra-index-url".to_string());
        args.push(url.clone());
    }
    if !verbose {
        args.push("--quiet".to_string());
    }
    args
}

/// Parse the `Version:` field of `pip show` output
fn parse_show_version(stdout: &str) -> Option<String> {
    stdout.lines().find_map(|line| {
        line.strip_prefix("Version:")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    })
}

/// [`PackageTool`] backed by `python -m pip`
#[derive(Debug, Clone)]
pub struct PipTool {
    python: PathBuf,
    verbose: bool,
}

impl PipTool {
    pub fn new(python: impl Into<PathBuf>, verbose: bool) -> Self {
        Self {
            python: python.into(),
            verbose,
        }
    }

    fn command<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let mut command = Command::new(&self.python);
        command.args(args);
        command
    }

    /// Run a query whose stdout is parsed
    fn capture<I, S>(&self, args: I) -> std::io::Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let mut command = self.command(args);
        debug!("Running {:?}", command);
        command.output()
    }

    /// Run an install or uninstall; verbose mode shows pip's stdout. Stderr
    /// is always captured for error mapping.
    fn run_streaming<I, S>(&self, args: I) -> std::io::Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let mut command = self.command(args);
        if self.verbose {
            command.stdout(Stdio::inherit()).stderr(Stdio::piped());
        }
        debug!("Running {:?}", command);
        command.output()
    }
}

impl PackageTool for PipTool {
    fn installed_version(&self, name: &str) -> Result<Option<String>> {
        let output = self
            .capture(["-m", "pip", "show", "--disable-pip-version-check", name])
            .map_err(|e| crate::error::install::failed(name, e))?;
        if !output.status.success() {
            return Ok(None);
        }
        Ok(parse_show_version(&String::from_utf8_lossy(&output.stdout)))
    }

    fn install(&self, spec: &str, indexes: &IndexSelection) -> Result<()> {
        let output = self
            .run_streaming(pip_install_args(spec, indexes, self.verbose))
            .map_err(|e| crate::error::install::failed(spec, e))?;
        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("pip install {spec} failed: {stderr}");
        Err(classify_install_failure(spec, &stderr))
    }

    fn uninstall(&self, name: &str) -> Result<()> {
        let output = self
            .run_streaming(["-m", "pip", "uninstall", "-y", name])
            .map_err(|e| crate::error::install::uninstall_failed(name, e))?;
        if output.status.success() {
            return Ok(());
        }
        Err(crate::error::install::uninstall_failed(
            name,
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }

    fn list_installed(&self) -> Result<Vec<InstalledPackage>> {
        let output = self
            .capture(["-m", "pip", "list", "--format=json", "--disable-pip-version-check"])
            .map_err(crate::error::install::status_check_failed)?;
        if !output.status.success() {
            return Err(crate::error::install::status_check_failed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        serde_json::from_slice(&output.stdout).map_err(crate::error::install::status_check_failed)
    }

    fn artifacts_dir(&self) -> Result<PathBuf> {
        let output = self
            .capture(["-c", "import sysconfig; print(sysconfig.get_path('purelib'))"])
            .map_err(|e| {
                crate::error::fs::operation_failed("Failed to locate site-packages", None, e)
            })?;
        let purelib = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !output.status.success() || purelib.is_empty() {
            return Err(crate::error::fs::operation_failed(
                "Failed to locate site-packages",
                None,
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        let dir = PathBuf::from(purelib).join("murmur").join("artifacts");
        std::fs::create_dir_all(&dir).map_err(|e| {
            crate::error::fs::operation_failed(
                format!("Failed to create {}", dir.display()),
                None,
                e,
            )
        })?;
        Ok(dir)
    }
}
