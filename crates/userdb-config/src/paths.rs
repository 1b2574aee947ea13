//! Default paths for the userdb resolver
//!
//! - Socket: `$USERDB_SOCKET` or `/run/systemd/userdb/io.systemd.NameServiceSwitch`
//! - Config: `$XDG_CONFIG_HOME/userdb/config.toml` or `~/.config/userdb/config.toml`

use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable for overriding the socket path
pub const USERDB_SOCKET_ENV: &str = "USERDB_SOCKET";

/// Socket systemd-userdbd listens on for NameServiceSwitch queries
pub const DEFAULT_SOCKET_PATH: &str = "/run/systemd/userdb/io.systemd.NameServiceSwitch";

/// Application subdirectory name
const APP_DIR: &str = "userdb";

/// Config filename within the config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Get the default socket path.
///
/// Order of precedence:
/// 1. `$USERDB_SOCKET` environment variable (if set and non-empty)
/// 2. `/run/systemd/userdb/io.systemd.NameServiceSwitch`
pub fn default_socket_path() -> PathBuf {
    socket_path_from_env(std::env::var_os(USERDB_SOCKET_ENV))
}

fn socket_path_from_env(value: Option<OsString>) -> PathBuf {
    match value {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_SOCKET_PATH),
    }
}

/// Get the default config file path.
///
/// Order of precedence:
/// 1. `$XDG_CONFIG_HOME/userdb/config.toml` (if XDG_CONFIG_HOME is set)
/// 2. `~/.config/userdb/config.toml` (fallback)
pub fn default_config_path() -> PathBuf {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR).join(CONFIG_FILENAME);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILENAME);
    }

    // Last resort
    PathBuf::from("/etc").join(APP_DIR).join(CONFIG_FILENAME)
}
