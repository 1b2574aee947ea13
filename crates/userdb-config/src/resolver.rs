//! Validated resolver configuration

use crate::paths::default_socket_path;
use crate::schema::RawConfig;
use std::path::{Path, PathBuf};

/// Where to reach the identity service
///
/// Passed by value into the transport; nothing reads a global at query time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    pub socket_path: PathBuf,
}

impl ResolverConfig {
    pub fn new(socket_path: impl AsRef<Path>) -> Self {
        Self {
            socket_path: socket_path.as_ref().to_path_buf(),
        }
    }

    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            socket_path: raw
                .service
                .socket_path
                .unwrap_or_else(default_socket_path),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
        }
    }
}
