use tracing::warn;

use crate::server::ServerShim;

/// Title carried by every translated build failure.
pub const BUILD_FAILURE_TITLE: &str = "Build failure";

/// A failure value handed back across the dispatch boundary: either the
/// framework-native value built by the shim, or the raw build error.
pub type FailureValue = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Turn a build failure into something the embedded server renders with its
/// own error-page machinery.
///
/// Construction goes through the shim so the value matches the framework
/// version actually being served. When the shim cannot build it, the raw
/// error is returned instead and a warning is recorded; this function never
/// fails, the reload reply always carries a value.
pub fn translate_build_failure(shim: &dyn ServerShim, failure: anyhow::Error) -> FailureValue {
    let detail = failure.to_string();
    match shim.render_failure(BUILD_FAILURE_TITLE, &detail, &failure) {
        Ok(value) => value,
        Err(render_error) => {
            warn!("⚠️  Could not translate build failure '{detail}': {render_error}");
            failure.into()
        }
    }
}
