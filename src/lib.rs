//! Secret Santa Library
//!
//! Configuration resolution, the confirmation gate, the notifier seam and
//! the results sink behind the `secret-santa` command.

use shadow_rs::shadow;
shadow!(build);

pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod logger;
pub mod services;
pub mod utils;

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}
