//! Caffeine - a keep-alive pinger
//!
//! Keeps a hosted service awake by periodically issuing HTTP GET requests
//! against its health endpoint, so that free-tier idle detection never
//! suspends the process. Ping failures are logged and absorbed; only an
//! explicit stop (or process exit) ends the loop.

pub mod config;
pub mod ping;
pub mod shutdown;

pub use ping::KeepAlive;
