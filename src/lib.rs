#![allow(dead_code, unused_imports)]

//! Devlink - a hot-reload bridge between a build tool and an embedded dev
//! HTTP server
//!
//! This crate lets a long-running development server pick up freshly
//! compiled code without restarting the process: a build link answers the
//! server's "has the code changed" calls, and a unit lifecycle manager swaps
//! the active code unit while deferring the close of the replaced one until
//! in-flight requests can no longer be unwinding through it.

pub mod config;
pub mod core;
pub mod reload;
pub mod server;
pub mod unit;

// Re-export commonly used types
pub use crate::config::DevConfig;
pub use crate::core::build_link::{BuildLink, BuildLinkCall, LinkError, LinkReply};
pub use crate::core::failure::{FailureValue, BUILD_FAILURE_TITLE};
pub use crate::core::lifecycle::UnitLifecycle;
pub use crate::reload::{ReloadCheck, ReloadOutcome, Reloader};
pub use crate::server::{find_docs_archive, DocsHandle, ServerShim, DOCS_ARCHIVE_PREFIX};
pub use crate::unit::{AssetsUnitFactory, CloseError, CodeUnit, UnitFactory, UnitResources};
