//! Confserve Configuration System
//!
//! YAML-based settings for the server binary.
//!
//! # Configuration Loading Priority
//!
//! 1. Compiled-in defaults
//! 2. `/etc/confserve/confserve.yaml` (system-wide)
//! 3. `~/.config/confserve/confserve.yaml` (user)
//! 4. `./confserve.yaml` (project-local)
//! 5. `CONFSERVE_CONFIG=/path/to/config.yaml` (explicit)
//! 6. Environment variables (highest priority)
//!
//! # Example Configuration
//!
//! ```yaml
//! server:
//!   host: "0.0.0.0"
//!   port: 8888
//!
//! repository:
//!   root: "/srv/config-repo"
//!   default_label: master
//!
//! logging:
//!   level: info
//! ```

#![allow(missing_docs)]

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use types::*;

/// Load configuration from default locations.
///
/// Searches for config files in order and merges them.
/// Environment variables override file values.
pub fn load() -> Result<ConfserveConfig, ConfigError> {
    ConfigLoader::new().load()
}

/// Load configuration from a specific file.
pub fn load_from_file(path: &str) -> Result<ConfserveConfig, ConfigError> {
    ConfigLoader::new().with_file(path).load()
}
