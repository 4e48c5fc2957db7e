//! Logger setup. Code logs through the `log` facade; this installs
//! `env_logger` behind it.

mod init;

pub use init::{init_logging, LoggingConfig};
