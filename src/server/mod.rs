use anyhow::Result;
use async_trait::async_trait;
use std::any::Any;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::build_link::BuildLink;
use crate::core::failure::FailureValue;
use crate::unit::CodeUnit;

/// File-name prefix the framework publishes its documentation archive under.
pub const DOCS_ARCHIVE_PREFIX: &str = "dev-docs";

/// Opaque documentation handler produced by the shim and handed back to it
/// when the server boots.
pub struct DocsHandle(Box<dyn Any + Send + Sync>);

impl DocsHandle {
    pub fn new<T: Any + Send + Sync>(handler: T) -> Self {
        Self(Box::new(handler))
    }

    pub fn downcast<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

/// Entry points into the embedded web framework, one method per call the
/// bridge needs.
///
/// Each supported framework version ships its own implementation, compiled
/// against that version. Picking the shim that matches the framework on the
/// serving artifacts is the build tool's job, done once at session start.
#[async_trait]
pub trait ServerShim: Send + Sync {
    /// Build the framework-native failure value shown on the dev error page.
    fn render_failure(
        &self,
        title: &str,
        detail: &str,
        cause: &anyhow::Error,
    ) -> Result<FailureValue>;

    /// Produce the documentation handler backing the dev docs pages, from
    /// the archive found on `artifacts`.
    fn docs_handler(&self, artifacts: &[PathBuf]) -> Result<DocsHandle>;

    /// Invoke the framework's dev-mode entry point and report the address it
    /// bound.
    async fn serve(
        &self,
        active: Arc<CodeUnit>,
        docs: DocsHandle,
        link: Arc<BuildLink>,
        http_port: u16,
    ) -> Result<SocketAddr>;
}

/// Locate the archive the docs handler is built from: the first entry whose
/// file name starts with `prefix`.
pub fn find_docs_archive<'a>(artifacts: &'a [PathBuf], prefix: &str) -> Option<&'a Path> {
    artifacts.iter().map(PathBuf::as_path).find(|path| {
        path.file_name()
            .and_then(|name| name.to_str())
            .map_or(false, |name| name.starts_with(prefix))
    })
}
