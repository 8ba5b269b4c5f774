use anyhow::Result;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Resources backing a loaded code unit: mapped artifacts, open archives,
/// whatever the loader keeps alive while the unit serves requests.
///
/// Implementations come from the component that loads compiled artifacts
/// into the process; releasing them is the only operation the bridge needs.
pub trait UnitResources: Send + Sync {
    fn close(&self) -> std::io::Result<()>;
}

/// A retired unit failed to release its resources.
#[derive(Debug, thiserror::Error)]
#[error("failed to close code unit {unit}: {source}")]
pub struct CloseError {
    pub unit: Uuid,
    #[source]
    pub source: std::io::Error,
}

/// A loaded, versioned set of compiled artifacts.
///
/// Symbol and asset lookups resolve against `artifacts` in order, then fall
/// back to the parent unit. A unit built without backing resources (the
/// assets-only parent) has nothing to release and is never queued for
/// retirement.
pub struct CodeUnit {
    id: Uuid,
    artifacts: Vec<PathBuf>,
    parent: Option<Arc<CodeUnit>>,
    resources: Option<Box<dyn UnitResources>>,
    closed: AtomicBool,
}

impl CodeUnit {
    pub fn new(
        artifacts: Vec<PathBuf>,
        parent: Option<Arc<CodeUnit>>,
        resources: Option<Box<dyn UnitResources>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            artifacts,
            parent,
            resources,
            closed: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn artifacts(&self) -> &[PathBuf] {
        &self.artifacts
    }

    pub fn parent(&self) -> Option<&Arc<CodeUnit>> {
        self.parent.as_ref()
    }

    /// Whether this unit holds resources that must be released before it is
    /// discarded.
    pub fn is_closable(&self) -> bool {
        self.resources.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Release the unit's resources. Closing twice is a no-op; a unit whose
    /// close attempt failed is not retried.
    pub fn close(&self) -> Result<(), CloseError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        if let Some(resources) = &self.resources {
            resources.close().map_err(|source| CloseError {
                unit: self.id,
                source,
            })?;
            debug!("🧹 Closed code unit {}", self.id);
        }

        Ok(())
    }
}

impl fmt::Debug for CodeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeUnit")
            .field("id", &self.id)
            .field("artifacts", &self.artifacts)
            .field("closable", &self.is_closable())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Drop for CodeUnit {
    fn drop(&mut self) {
        // Last-owner fallback: a unit that was never drained still releases
        // its resources when the final handle goes away.
        if self.is_closable() && !self.is_closed() {
            debug!("♻️  Releasing code unit {} on drop", self.id);
            let _ = self.close();
        }
    }
}

/// Builds a served code unit from freshly compiled artifacts.
pub trait UnitFactory: Send + Sync {
    /// Load `artifacts` into a new unit whose lookups fall back to `parent`.
    fn load(&self, artifacts: &[PathBuf], parent: Arc<CodeUnit>) -> Result<CodeUnit>;
}

/// Builds the assets-only unit every served unit is layered on, so asset
/// lookups never wait on a recompile.
pub trait AssetsUnitFactory: Send + Sync {
    fn load(&self, archive: &Path, dirs: &[PathBuf]) -> Result<CodeUnit>;
}
