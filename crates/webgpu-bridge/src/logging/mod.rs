//! Logging setup.
//!
//! The bridge itself only talks to the `log` facade. Applications that want the
//! bridge's diagnostics on stderr call [`init_logging`] early in `main`.

mod init;

pub use init::{init_logging, resolve_filter, LoggingConfig, FILTER_ENV_VAR};
