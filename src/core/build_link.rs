use anyhow::Result;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::DevConfig;
use crate::core::failure::{translate_build_failure, FailureValue};
use crate::core::lifecycle::UnitLifecycle;
use crate::reload::{ReloadOutcome, Reloader};
use crate::server::ServerShim;
use crate::unit::{AssetsUnitFactory, CloseError, CodeUnit, UnitFactory};

/// A named call arriving from the embedded server.
///
/// The vocabulary is fixed. Framework versions evolve their dev-mode
/// interface, so anything outside it parses to `Unknown` and is answered
/// with [`LinkReply::Nothing`] instead of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildLinkCall {
    ProjectPath,
    Reload,
    Settings,
    Unknown(String),
}

impl BuildLinkCall {
    /// Map a wire-level method name onto the recognized vocabulary.
    pub fn parse(name: &str) -> Self {
        match name {
            "projectPath" => Self::ProjectPath,
            "reload" => Self::Reload,
            "settings" => Self::Settings,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Value returned to the embedded server for one dispatched call.
#[derive(Debug)]
pub enum LinkReply {
    ProjectPath(PathBuf),
    Settings(HashMap<String, String>),
    /// The code changed; serve from this unit from now on.
    Swapped(Arc<CodeUnit>),
    /// The code changed but the build failed; render this value.
    BuildFailure(FailureValue),
    Nothing,
}

/// Dispatch failed before a reply value could be produced.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error(transparent)]
    Close(#[from] CloseError),

    #[error("failed to load code unit: {0}")]
    Load(anyhow::Error),
}

/// The facade the embedded dev server talks to.
///
/// Installed once per dev-server session, it answers the fixed call
/// vocabulary and owns the unit lifecycle behind the `reload` call. It never
/// owns units itself beyond the assets parent; the lifecycle manager holds
/// the active slot and the retirement queue.
pub struct BuildLink {
    project_path: PathBuf,
    serving_artifacts: Vec<PathBuf>,
    assets: Arc<CodeUnit>,
    units: Arc<dyn UnitFactory>,
    reloader: Arc<dyn Reloader>,
    shim: Arc<dyn ServerShim>,
    lifecycle: UnitLifecycle,
}

impl BuildLink {
    /// Wire the adapter for one dev-server session.
    ///
    /// Builds the assets-only parent unit once; every unit produced by later
    /// reloads is layered on top of it.
    pub fn install(
        config: &DevConfig,
        units: Arc<dyn UnitFactory>,
        assets: &dyn AssetsUnitFactory,
        reloader: Arc<dyn Reloader>,
        shim: Arc<dyn ServerShim>,
    ) -> Result<Arc<Self>> {
        let assets_unit = assets.load(&config.assets.archive, &config.assets.dirs)?;
        info!(
            "🔗 Build link installed for {}",
            config.project.root.display()
        );

        Ok(Arc::new(Self {
            project_path: config.project.root.clone(),
            serving_artifacts: config.serving_artifacts(),
            assets: Arc::new(assets_unit),
            units,
            reloader,
            shim,
            lifecycle: UnitLifecycle::new(),
        }))
    }

    /// Parse and dispatch a wire-level call name.
    pub async fn invoke(&self, name: &str) -> Result<LinkReply, LinkError> {
        self.dispatch(BuildLinkCall::parse(name)).await
    }

    pub async fn dispatch(&self, call: BuildLinkCall) -> Result<LinkReply, LinkError> {
        match call {
            BuildLinkCall::ProjectPath => Ok(LinkReply::ProjectPath(self.project_path.clone())),
            BuildLinkCall::Reload => self.reload().await,
            // Not all build settings are surfaced to the server yet.
            BuildLinkCall::Settings => Ok(LinkReply::Settings(HashMap::new())),
            BuildLinkCall::Unknown(name) => {
                debug!("🤷 Ignoring unrecognized build-link call '{name}'");
                Ok(LinkReply::Nothing)
            }
        }
    }

    /// One reload cycle: check, housekeep, then swap or report.
    async fn reload(&self) -> Result<LinkReply, LinkError> {
        let check = self.reloader.require_up_to_date().await;

        // Close units replaced by *earlier* cycles before anything else. The
        // unit swapped out below must survive until the next reload call:
        // requests routed through it may still be unwinding when this call
        // returns, and only the following check marks it safe to release.
        self.lifecycle.drain_retired()?;

        let outcome = if check.changed {
            let unit = self
                .units
                .load(&self.serving_artifacts, Arc::clone(&self.assets))
                .map_err(LinkError::Load)?;
            let unit = Arc::new(unit);
            if let Some(previous) = self.lifecycle.swap_active(Arc::clone(&unit)) {
                self.lifecycle.retire(previous);
            }
            info!("🔄 Swapped in code unit {}", unit.id());
            ReloadOutcome::Changed(unit)
        } else {
            match check.failure {
                Some(failure) => ReloadOutcome::Failed(failure),
                None => ReloadOutcome::Unchanged,
            }
        };

        Ok(match outcome {
            ReloadOutcome::Changed(unit) => LinkReply::Swapped(unit),
            ReloadOutcome::Failed(failure) => {
                LinkReply::BuildFailure(translate_build_failure(self.shim.as_ref(), failure))
            }
            ReloadOutcome::Unchanged => LinkReply::Nothing,
        })
    }

    pub fn lifecycle(&self) -> &UnitLifecycle {
        &self.lifecycle
    }

    pub fn assets_unit(&self) -> &Arc<CodeUnit> {
        &self.assets
    }

    pub fn project_path(&self) -> &PathBuf {
        &self.project_path
    }
}
