//! Logging utilities.
//!
//! Centralizes logger initialization. The engine itself only talks to the
//! `log` facade; `env_logger` is wired up here for binaries that want it.

mod init;

pub use init::{init_logging, LoggingConfig};
