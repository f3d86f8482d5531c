//! Keep-alive ping module.
//!
//! Periodically issues an HTTP GET against a health endpoint so that a
//! hosting platform's idle detection never suspends the monitored service.
//! The loop absorbs every failure category; only an explicit stop ends it.
//!
//! Key re-exports:
//! - [`KeepAlive`] - Service handle owning the background ping worker
//! - [`HealthProbe`] - Seam for substituting the HTTP attempt in tests

mod probe;
mod service;
mod worker;

pub use probe::{HealthProbe, HttpProbe, PingError, ProbeError};
pub use service::KeepAlive;
