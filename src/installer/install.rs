//! Artifact installation
//!
//! Artifacts from the managed registry are installed in two steps: the
//! artifact itself without dependencies from the managed index, then every
//! dependency it declares in the registry metadata, resolved against the
//! extra indexes. Any other index gets a single installer call with full
//! dependency resolution.
//!
//! [`ArtifactInstaller::install_tree`] walks a manifest tree depth first and
//! reports every node instead of stopping at the first failure.

use tracing::{debug, info, warn};

use super::aggregation::ImportAggregation;
use super::metadata::DependencySource;
use super::tool::{IndexSelection, PackageTool};
use crate::error::{MurError, Result};
use crate::manifest::{Artifact, is_latest};
use crate::progress::Spinner;

/// Package that must be present before any artifact is installed
pub const RUNTIME_PACKAGE: &str = "murmur";

/// Domain of the managed registry
pub const MANAGED_DOMAIN: &str = "murmur.nexus";

/// Whether `index_url` is served by the managed registry
pub fn is_managed_index(index_url: &str) -> bool {
    reqwest::Url::parse(index_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_lowercase))
        .is_some_and(|host| {
            host == MANAGED_DOMAIN || host.ends_with(&format!(".{MANAGED_DOMAIN}"))
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed,
    AlreadyInstalled,
}

/// Result for one node of an install tree
#[derive(Debug)]
pub enum NodeStatus {
    Installed,
    AlreadyInstalled,
    Failed(MurError),
    /// Not attempted because an ancestor failed
    Skipped,
}

#[derive(Debug)]
pub struct NodeReport {
    pub name: String,
    pub version: String,
    /// 0 for manifest top level, 1 for its tools, and so on
    pub depth: usize,
    pub status: NodeStatus,
}

impl NodeReport {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, NodeStatus::Failed(_))
    }
}

/// Installs artifacts through a [`PackageTool`]
pub struct ArtifactInstaller<'a> {
    tool: &'a dyn PackageTool,
    dependencies: &'a dyn DependencySource,
    /// Primary index first, then extras
    indexes: Vec<String>,
    verbose: bool,
}

impl<'a> ArtifactInstaller<'a> {
    pub fn new(
        tool: &'a dyn PackageTool,
        dependencies: &'a dyn DependencySource,
        indexes: Vec<String>,
        verbose: bool,
    ) -> Self {
        Self {
            tool,
            dependencies,
            indexes,
            verbose,
        }
    }

    /// Fail unless the runtime package is installed
    pub fn ensure_runtime(&self) -> Result<()> {
        match self.tool.installed_version(RUNTIME_PACKAGE)? {
            Some(_) => Ok(()),
            None => Err(MurError::RuntimeMissing {
                package: RUNTIME_PACKAGE.to_string(),
            }),
        }
    }

    /// A `latest` request is satisfied by any installed version
    fn is_installed(&self, artifact: &Artifact) -> Result<bool> {
        Ok(match self.tool.installed_version(&artifact.name)? {
            Some(installed) => is_latest(&artifact.version) || installed == artifact.version,
            None => false,
        })
    }

    fn split_indexes(&self) -> Result<(&str, &[String])> {
        let (primary, extras) = self.indexes.split_first().ok_or_else(|| {
            crate::error::config::missing(
                "No package index configured",
                "Set 'index-url' in .murmurrc.",
            )
        })?;
        Ok((primary.as_str(), extras))
    }

    /// Install one artifact (not its tools) and register its import
    pub fn install_artifact(&self, artifact: &Artifact) -> Result<InstallOutcome> {
        let spec = artifact.spec();

        let outcome = if self.is_installed(artifact)? {
            info!("Skipping {spec} - already installed");
            InstallOutcome::AlreadyInstalled
        } else {
            let _spinner = Spinner::start(format!("Installing {spec}"), !self.verbose);
            let (primary, extras) = self.split_indexes()?;
            if is_managed_index(primary) {
                self.install_managed(artifact, &spec, primary, extras)?;
            } else {
                self.tool
                    .install(&spec, &IndexSelection::new(primary, extras.to_vec()))?;
            }
            InstallOutcome::Installed
        };

        let aggregation = ImportAggregation::in_dir(&self.tool.artifacts_dir()?);
        if aggregation.add(&artifact.name)? {
            debug!("Added import for {} to {}", artifact.name, aggregation.path().display());
        }
        Ok(outcome)
    }

    fn install_managed(
        &self,
        artifact: &Artifact,
        spec: &str,
        primary: &str,
        extras: &[String],
    ) -> Result<()> {
        self.tool.install(
            spec,
            &IndexSelection::new(primary, Vec::new()).without_dependencies(),
        )?;

        let dependencies = self.dependencies.requires_dist(primary, &artifact.name)?;
        let selection = dependency_indexes(primary, extras);
        for dependency in dependencies {
            if self.verbose {
                info!("Installing dependency {dependency} of {}", artifact.name);
            }
            if let Err(e) = self.tool.install(&dependency, &selection) {
                warn!("Failed to install dependency {dependency} of {}: {e}", artifact.name);
            }
        }
        Ok(())
    }

    /// Install `artifacts` and their tools depth first, in order.
    ///
    /// A failed node does not stop its siblings; its own tools are skipped.
    pub fn install_tree(&self, artifacts: &[Artifact]) -> Vec<NodeReport> {
        let mut reports = Vec::new();
        self.walk(artifacts, 0, &mut reports);
        reports
    }

    fn walk(&self, artifacts: &[Artifact], depth: usize, reports: &mut Vec<NodeReport>) {
        for artifact in artifacts {
            match self.install_artifact(artifact) {
                Ok(outcome) => {
                    let status = match outcome {
                        InstallOutcome::Installed => NodeStatus::Installed,
                        InstallOutcome::AlreadyInstalled => NodeStatus::AlreadyInstalled,
                    };
                    reports.push(report(artifact, depth, status));
                    self.walk(&artifact.tools, depth + 1, reports);
                }
                Err(e) => {
                    warn!("Failed to install {}: {e}", artifact.name);
                    reports.push(report(artifact, depth, NodeStatus::Failed(e)));
                    skip(&artifact.tools, depth + 1, reports);
                }
            }
        }
    }
}

/// First extra index as primary; the managed index and the other extras as secondaries
fn dependency_indexes(managed: &str, extras: &[String]) -> IndexSelection {
    match extras.split_first() {
        Some((first, rest)) => {
            let mut secondaries = vec![managed.to_string()];
            secondaries.extend(rest.iter().cloned());
            IndexSelection::new(first.clone(), secondaries)
        }
        None => IndexSelection::new(managed, Vec::new()),
    }
}

fn report(artifact: &Artifact, depth: usize, status: NodeStatus) -> NodeReport {
    NodeReport {
        name: artifact.name.clone(),
        version: artifact.version.clone(),
        depth,
        status,
    }
}

fn skip(artifacts: &[Artifact], depth: usize, reports: &mut Vec<NodeReport>) {
    for artifact in artifacts {
        reports.push(report(artifact, depth, NodeStatus::Skipped));
        skip(&artifact.tools, depth + 1, reports);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{ArtifactKind, InstallManifest};
    use crate::test_fixtures::{FakeDependencySource, FakePackageTool, create_temp_dir};

    const MANAGED: &str = "https://artifacts.murmur.nexus/simple";
    const PYPI: &str = "https://pypi.org/simple";
    const PRIVATE: &str = "http://localhost:8080/simple";

    fn indexes(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|u| (*u).to_string()).collect()
    }

    fn agent(name: &str) -> Artifact {
        Artifact::new(name, "latest", ArtifactKind::Agent)
    }

    fn tool(name: &str) -> Artifact {
        Artifact::new(name, "latest", ArtifactKind::Tool)
    }

    fn aggregation_content(dir: &std::path::Path) -> String {
        std::fs::read_to_string(dir.join("__init__.py")).unwrap_or_default()
    }

    #[test]
    fn test_is_managed_index() {
        assert!(is_managed_index(MANAGED));
        assert!(is_managed_index("https://murmur.nexus/simple"));
        assert!(!is_managed_index(PYPI));
        assert!(!is_managed_index("https://murmur.nexus.evil.com/simple"));
        assert!(!is_managed_index("not a url"));
    }

    #[test]
    fn test_already_installed_latest_makes_no_installer_call() {
        let temp = create_temp_dir();
        let fake = FakePackageTool::new(temp.path()).with_installed("planner", "0.3.0");
        let deps = FakeDependencySource::default();
        let installer = ArtifactInstaller::new(&fake, &deps, indexes(&[PRIVATE]), false);

        let outcome = installer.install_artifact(&agent("planner")).unwrap();
        assert_eq!(outcome, InstallOutcome::AlreadyInstalled);
        assert!(fake.installs.borrow().is_empty());
        assert_eq!(aggregation_content(temp.path()), "from .planner.main import planner\n");
    }

    #[test]
    fn test_already_installed_at_pinned_version() {
        let temp = create_temp_dir();
        let fake = FakePackageTool::new(temp.path()).with_installed("planner", "0.3.0");
        let deps = FakeDependencySource::default();
        let installer = ArtifactInstaller::new(&fake, &deps, indexes(&[PRIVATE]), false);

        let artifact = Artifact::new("planner", "0.3.0", ArtifactKind::Agent);
        assert_eq!(installer.install_artifact(&artifact).unwrap(), InstallOutcome::AlreadyInstalled);
        assert!(fake.installs.borrow().is_empty());
    }

    #[test]
    fn test_other_version_installed_reinstalls_pinned() {
        let temp = create_temp_dir();
        let fake = FakePackageTool::new(temp.path()).with_installed("planner", "0.3.0");
        let deps = FakeDependencySource::default();
        let installer = ArtifactInstaller::new(&fake, &deps, indexes(&[PRIVATE]), false);

        let artifact = Artifact::new("planner", "0.4.0", ArtifactKind::Agent);
        assert_eq!(installer.install_artifact(&artifact).unwrap(), InstallOutcome::Installed);
        assert_eq!(fake.installed_specs(), vec!["planner==0.4.0"]);
    }

    #[test]
    fn test_private_index_single_step() {
        let temp = create_temp_dir();
        let fake = FakePackageTool::new(temp.path());
        let deps = FakeDependencySource::default().with("planner", &["requests"]);
        let installer = ArtifactInstaller::new(&fake, &deps, indexes(&[PRIVATE, PYPI]), false);

        installer.install_artifact(&agent("planner")).unwrap();

        let installs = fake.installs.borrow();
        assert_eq!(installs.len(), 1);
        assert_eq!(installs[0].1, IndexSelection::new(PRIVATE, indexes(&[PYPI])));
        assert!(installs[0].1.resolve_dependencies);
        assert!(deps.lookups.borrow().is_empty());
    }

    #[test]
    fn test_managed_index_two_steps() {
        let temp = create_temp_dir();
        let fake = FakePackageTool::new(temp.path());
        let deps = FakeDependencySource::default().with("my_planner", &["requests>=2", "pydantic"]);
        let mirror = "http://mirror/simple";
        let installer =
            ArtifactInstaller::new(&fake, &deps, indexes(&[MANAGED, PYPI, mirror]), false);

        installer.install_artifact(&agent("my_planner")).unwrap();

        let installs = fake.installs.borrow();
        assert_eq!(installs[0].0, "my_planner");
        assert_eq!(
            installs[0].1,
            IndexSelection::new(MANAGED, Vec::new()).without_dependencies()
        );
        assert_eq!(
            deps.lookups.borrow().as_slice(),
            &[(MANAGED.to_string(), "my_planner".to_string())]
        );

        let dependency_indexes = IndexSelection::new(PYPI, indexes(&[MANAGED, mirror]));
        assert_eq!(installs[1], ("requests>=2".to_string(), dependency_indexes.clone()));
        assert_eq!(installs[2], ("pydantic".to_string(), dependency_indexes));
        assert_eq!(installs.len(), 3);
    }

    #[test]
    fn test_managed_dependency_failure_is_warning() {
        let temp = create_temp_dir();
        let fake = FakePackageTool::new(temp.path()).failing_install("broken-dep", "ERROR: bad wheel");
        let deps = FakeDependencySource::default().with("planner", &["broken-dep", "requests"]);
        let installer = ArtifactInstaller::new(&fake, &deps, indexes(&[MANAGED, PYPI]), false);

        assert_eq!(
            installer.install_artifact(&agent("planner")).unwrap(),
            InstallOutcome::Installed
        );
        assert_eq!(fake.installed_specs(), vec!["planner", "broken-dep", "requests"]);
    }

    #[test]
    fn test_managed_metadata_failure_propagates() {
        let temp = create_temp_dir();
        let fake = FakePackageTool::new(temp.path());
        let deps = FakeDependencySource::default().unreachable("planner");
        let installer = ArtifactInstaller::new(&fake, &deps, indexes(&[MANAGED, PYPI]), false);

        let err = installer.install_artifact(&agent("planner")).unwrap_err();
        assert_eq!(err.code(), 806);
        assert_eq!(aggregation_content(temp.path()), "");
    }

    #[test]
    fn test_installer_failure_codes() {
        let temp = create_temp_dir();
        let fake = FakePackageTool::new(temp.path())
            .failing_install("missing", "ERROR: Could not find a version that satisfies the requirement missing")
            .failing_install("broken", "ERROR: build failed");
        let deps = FakeDependencySource::default();
        let installer = ArtifactInstaller::new(&fake, &deps, indexes(&[PRIVATE]), false);

        assert_eq!(installer.install_artifact(&tool("missing")).unwrap_err().code(), 806);
        assert_eq!(installer.install_artifact(&tool("broken")).unwrap_err().code(), 307);
    }

    #[test]
    fn test_tree_isolates_sibling_failures() {
        let temp = create_temp_dir();
        let fake = FakePackageTool::new(temp.path()).failing_install("tool_a", "ERROR: nope");
        let deps = FakeDependencySource::default();
        let installer = ArtifactInstaller::new(&fake, &deps, indexes(&[PRIVATE]), false);

        let tree = vec![agent("planner").with_tools(vec![tool("tool_a"), tool("tool_b")])];
        let reports = installer.install_tree(&tree);

        assert_eq!(fake.installed_specs(), vec!["planner", "tool_a", "tool_b"]);
        let summary: Vec<_> = reports.iter().map(|r| (r.name.as_str(), r.depth)).collect();
        assert_eq!(summary, vec![("planner", 0), ("tool_a", 1), ("tool_b", 1)]);
        assert!(matches!(reports[0].status, NodeStatus::Installed));
        assert!(reports[1].is_failure());
        assert!(matches!(reports[2].status, NodeStatus::Installed));
        assert_eq!(
            aggregation_content(temp.path()),
            "from .planner.main import planner\nfrom .tool_b.main import tool_b\n"
        );
    }

    #[test]
    fn test_tree_skips_children_of_failed_parent() {
        let temp = create_temp_dir();
        let fake = FakePackageTool::new(temp.path()).failing_install("planner", "ERROR: nope");
        let deps = FakeDependencySource::default();
        let installer = ArtifactInstaller::new(&fake, &deps, indexes(&[PRIVATE]), false);

        let tree = vec![
            agent("planner").with_tools(vec![tool("search")]),
            agent("writer"),
        ];
        let reports = installer.install_tree(&tree);

        assert_eq!(fake.installed_specs(), vec!["planner", "writer"]);
        assert!(reports[0].is_failure());
        assert!(matches!(reports[1].status, NodeStatus::Skipped));
        assert_eq!(reports[1].name, "search");
        assert!(matches!(reports[2].status, NodeStatus::Installed));
    }

    #[test]
    fn test_tree_from_manifest_order() {
        let temp = create_temp_dir();
        let fake = FakePackageTool::new(temp.path()).with_installed("search", "1.0.0");
        let deps = FakeDependencySource::default();
        let installer = ArtifactInstaller::new(&fake, &deps, indexes(&[PRIVATE]), false);

        let manifest = InstallManifest::from_yaml(
            "agents:\n  - name: planner\n    version: 1.0.0\n    tools:\n      - name: search\n      - name: calc\ntools:\n  - name: clock\n",
        )
        .unwrap();
        let reports = installer.install_tree(&manifest.artifacts());

        assert_eq!(fake.installed_specs(), vec!["planner==1.0.0", "calc", "clock"]);
        let names: Vec<_> = reports.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["planner", "search", "calc", "clock"]);
        assert!(matches!(reports[1].status, NodeStatus::AlreadyInstalled));
    }

    #[test]
    fn test_runtime_required() {
        let temp = create_temp_dir();
        let deps = FakeDependencySource::default();

        let missing = FakePackageTool::new(temp.path());
        let installer = ArtifactInstaller::new(&missing, &deps, indexes(&[PRIVATE]), false);
        assert_eq!(installer.ensure_runtime().unwrap_err().code(), 308);

        let present = FakePackageTool::new(temp.path()).with_installed("murmur", "0.1.0");
        let installer = ArtifactInstaller::new(&present, &deps, indexes(&[PRIVATE]), false);
        assert!(installer.ensure_runtime().is_ok());
    }

    #[test]
    fn test_no_indexes_is_config_error() {
        let temp = create_temp_dir();
        let fake = FakePackageTool::new(temp.path());
        let deps = FakeDependencySource::default();
        let installer = ArtifactInstaller::new(&fake, &deps, Vec::new(), false);
        assert_eq!(installer.install_artifact(&agent("planner")).unwrap_err().code(), 403);
    }
}
