//! Test fixtures and utilities for reducing test setup duplication.
//!
//! This module provides helper functions to create common test environments
//! (temp directories, `.murmurrc` files, a mock HTTP server, fake installer
//! collaborators) with a single function call.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_fixtures::{create_temp_dir, write_rc, MockHttpServer};
//!
//! #[test]
//! fn my_test() {
//!     let temp = create_temp_dir();
//!     write_rc(&temp.path().join(".murmurrc"), "[murmur-nexus]\nindex-url = http://x\n");
//!
//!     let server = MockHttpServer::start();
//!     server.respond("POST", "/ping", 200, r#"{"ok":true}"#);
//!     // point a client at server.uri() ...
//!     let requests = server.received();
//! }
//! ```

#![allow(clippy::expect_used)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::net::TcpListener;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use crate::error::Result;
use crate::installer::metadata::DependencySource;
use crate::installer::tool::{IndexSelection, InstalledPackage, PackageTool, classify_install_failure};
use crate::manifest::normalize_name;

/// Create a temp directory in the system temp location.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Write an rc file, creating parent directories.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_rc(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(path, content).expect("Failed to write rc file");
}

/// Create test files in a directory.
///
/// Takes a list of (path, content) tuples and creates those files.
/// Paths are relative to the provided base directory.
///
/// # Panics
///
/// Panics if any file cannot be created.
pub fn create_test_files(base: &Path, files: &[(&str, &str)]) -> Vec<PathBuf> {
    files
        .iter()
        .map(|(path, content)| {
            let full_path = base.join(path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent).expect("Failed to create parent directory");
            }
            std::fs::write(&full_path, content).expect("Failed to write test file");
            full_path
        })
        .collect()
}

/// URL of a local port nothing is listening on
#[must_use]
pub fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let port = listener.local_addr().expect("No local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

/// `wiremock` server driven from synchronous tests.
///
/// Owns the tokio runtime the server lives on, so blocking clients can call
/// it from the test thread.
pub struct MockHttpServer {
    server: MockServer,
    runtime: Runtime,
}

impl MockHttpServer {
    /// # Panics
    ///
    /// Panics if the runtime cannot be built.
    #[must_use]
    pub fn start() -> Self {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("Failed to build tokio runtime");
        let server = runtime.block_on(MockServer::start());
        Self { server, runtime }
    }

    #[must_use]
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    /// Answer `verb` requests to `route` with `status` and a JSON `body`
    pub fn respond(&self, verb: &str, route: &str, status: u16, body: &str) {
        self.mount(
            Mock::given(method(verb))
                .and(path(route))
                .respond_with(json_response(status, body)),
        );
    }

    /// Requests received so far, in arrival order
    #[must_use]
    pub fn received(&self) -> Vec<Request> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
    }
}

/// Response with `body` served as `application/json`
#[must_use]
pub fn json_response(status: u16, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(body.as_bytes().to_vec(), "application/json")
}

/// Header value of a received request, if present and ASCII
#[must_use]
pub fn header_value(request: &Request, name: &str) -> Option<String> {
    request
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// In-memory [`PackageTool`] recording every call.
pub struct FakePackageTool {
    artifacts_dir: PathBuf,
    installed: RefCell<Vec<InstalledPackage>>,
    install_failures: HashMap<String, String>,
    uninstall_failures: Vec<String>,
    /// `(spec, indexes)` per install call
    pub installs: RefCell<Vec<(String, IndexSelection)>>,
    /// Names passed to uninstall
    pub uninstalls: RefCell<Vec<String>>,
}

impl FakePackageTool {
    #[must_use]
    pub fn new(artifacts_dir: &Path) -> Self {
        Self {
            artifacts_dir: artifacts_dir.to_path_buf(),
            installed: RefCell::new(Vec::new()),
            install_failures: HashMap::new(),
            uninstall_failures: Vec::new(),
            installs: RefCell::new(Vec::new()),
            uninstalls: RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_installed(self, name: &str, version: &str) -> Self {
        self.installed.borrow_mut().push(InstalledPackage {
            name: name.to_string(),
            version: version.to_string(),
        });
        self
    }

    /// Make installing `spec` fail with `stderr`
    #[must_use]
    pub fn failing_install(mut self, spec: &str, stderr: &str) -> Self {
        self.install_failures.insert(spec.to_string(), stderr.to_string());
        self
    }

    #[must_use]
    pub fn failing_uninstall(mut self, name: &str) -> Self {
        self.uninstall_failures.push(name.to_string());
        self
    }

    /// Specs passed to install, in call order
    #[must_use]
    pub fn installed_specs(&self) -> Vec<String> {
        self.installs.borrow().iter().map(|(spec, _)| spec.clone()).collect()
    }

    #[must_use]
    pub fn is_installed(&self, name: &str) -> bool {
        self.installed
            .borrow()
            .iter()
            .any(|p| normalize_name(&p.name) == normalize_name(name))
    }
}

impl PackageTool for FakePackageTool {
    fn installed_version(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .installed
            .borrow()
            .iter()
            .find(|p| normalize_name(&p.name) == normalize_name(name))
            .map(|p| p.version.clone()))
    }

    fn install(&self, spec: &str, indexes: &IndexSelection) -> Result<()> {
        self.installs
            .borrow_mut()
            .push((spec.to_string(), indexes.clone()));
        if let Some(stderr) = self.install_failures.get(spec) {
            return Err(classify_install_failure(spec, stderr));
        }
        let (name, version) = spec.split_once("==").unwrap_or((spec, "1.0.0"));
        self.installed.borrow_mut().push(InstalledPackage {
            name: name.to_string(),
            version: version.to_string(),
        });
        Ok(())
    }

    fn uninstall(&self, name: &str) -> Result<()> {
        self.uninstalls.borrow_mut().push(name.to_string());
        if self.uninstall_failures.iter().any(|n| n == name) {
            return Err(crate::error::install::uninstall_failed(name, "pip exited with 1"));
        }
        self.installed.borrow_mut().retain(|p| p.name != name);
        Ok(())
    }

    fn list_installed(&self) -> Result<Vec<InstalledPackage>> {
        Ok(self.installed.borrow().clone())
    }

    fn artifacts_dir(&self) -> Result<PathBuf> {
        Ok(self.artifacts_dir.clone())
    }
}

/// In-memory [`DependencySource`]; unknown names have no dependencies.
#[derive(Default)]
pub struct FakeDependencySource {
    dependencies: HashMap<String, Vec<String>>,
    unreachable: Vec<String>,
    /// `(index_url, name)` per lookup
    pub lookups: RefCell<Vec<(String, String)>>,
}

impl FakeDependencySource {
    #[must_use]
    pub fn with(mut self, name: &str, dependencies: &[&str]) -> Self {
        self.dependencies.insert(
            name.to_string(),
            dependencies.iter().map(|d| (*d).to_string()).collect(),
        );
        self
    }

    #[must_use]
    pub fn unreachable(mut self, name: &str) -> Self {
        self.unreachable.push(name.to_string());
        self
    }
}

impl DependencySource for FakeDependencySource {
    fn requires_dist(&self, index_url: &str, name: &str) -> Result<Vec<String>> {
        self.lookups
            .borrow_mut()
            .push((index_url.to_string(), name.to_string()));
        if self.unreachable.iter().any(|n| n == name) {
            return Err(crate::error::network::registry_unreachable(name, "connection refused"));
        }
        Ok(self.dependencies.get(name).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_temp_dir() {
        let temp = create_temp_dir();
        assert!(temp.path().exists());
    }

    #[test]
    fn test_create_test_files() {
        let temp = create_temp_dir();
        let files = create_test_files(temp.path(), &[("dist/a.whl", "x"), ("b.txt", "y")]);
        assert_eq!(files.len(), 2);
        assert!(temp.path().join("dist/a.whl").exists());
    }

    #[test]
    fn test_write_rc_creates_parents() {
        let temp = create_temp_dir();
        let path = temp.path().join("home/.murmurrc");
        write_rc(&path, "[global]\n");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "[global]\n");
    }
}
