//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Identity service settings
    #[serde(default)]
    pub service: RawServiceConfig,
}

/// Identity service settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawServiceConfig {
    /// Unix socket of the identity service (default: systemd-userdbd NSS socket)
    pub socket_path: Option<PathBuf>,
}
