pub mod build_link;
pub mod failure;
pub mod lifecycle;

pub use build_link::{BuildLink, BuildLinkCall, LinkError, LinkReply};
pub use failure::{translate_build_failure, FailureValue, BUILD_FAILURE_TITLE};
pub use lifecycle::UnitLifecycle;
