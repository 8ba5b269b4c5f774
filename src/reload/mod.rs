use async_trait::async_trait;
use std::sync::Arc;

use crate::unit::CodeUnit;

/// What the build tool reported for one up-to-date check.
///
/// `changed` takes precedence: a check that produced new artifacts reports
/// changed even if earlier attempts failed.
#[derive(Debug)]
pub struct ReloadCheck {
    pub changed: bool,
    pub failure: Option<anyhow::Error>,
}

impl ReloadCheck {
    pub fn unchanged() -> Self {
        Self {
            changed: false,
            failure: None,
        }
    }

    pub fn changed() -> Self {
        Self {
            changed: true,
            failure: None,
        }
    }

    pub fn failed(failure: anyhow::Error) -> Self {
        Self {
            changed: false,
            failure: Some(failure),
        }
    }
}

/// The build tool's up-to-date-check machinery.
///
/// `require_up_to_date` may block on a full compile and may be called
/// concurrently from several serving tasks; timeouts and cancellation are
/// its implementor's concern.
#[async_trait]
pub trait Reloader: Send + Sync {
    async fn require_up_to_date(&self) -> ReloadCheck;
}

/// Tagged result of one reload cycle, derived by the build link from a
/// [`ReloadCheck`] plus unit construction.
#[derive(Debug)]
pub enum ReloadOutcome {
    Unchanged,
    Changed(Arc<CodeUnit>),
    Failed(anyhow::Error),
}
