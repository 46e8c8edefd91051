//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.roomchat/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::connection::endpoint_url;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RoomchatConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub typing: TypingConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub username: Option<String>,
    pub default_room: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    pub origin: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TypingConfig {
    pub idle_ms: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_SERVER_ORIGIN: &str = "http://localhost:8000";
pub const DEFAULT_TYPING_IDLE_MS: u64 = 2000;
const FALLBACK_USERNAME: &str = "guest";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub username: String,
    /// Room joined at startup. `None` waits for `/join`.
    pub default_room: Option<String>,
    pub server_origin: String,
    pub typing_idle: Duration,
}

/// Values given on the command line. `None` = flag not specified.
#[derive(Debug, Default, Clone, Copy)]
pub struct CliOverrides<'a> {
    pub server: Option<&'a str>,
    pub user: Option<&'a str>,
    pub room: Option<&'a str>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    /// Server origin is not an `http(s)://host` URL.
    InvalidOrigin(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::InvalidOrigin(origin) => {
                write!(f, "invalid server origin '{origin}' (expected http://host or https://host)")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.roomchat/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".roomchat").join("config.toml"))
}

/// Load config from `~/.roomchat/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `RoomchatConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<RoomchatConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(RoomchatConfig::default());
        }
    };
    load_config_from(&path)
}

fn load_config_from(path: &Path) -> Result<RoomchatConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(RoomchatConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: RoomchatConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Room Chat Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# username = "alice"                 # Or set ROOMCHAT_USER
# default_room = "1"                 # Or set ROOMCHAT_ROOM

# [server]
# origin = "http://localhost:8000"   # Or set ROOMCHAT_SERVER; https → wss

# [typing]
# idle_ms = 2000                     # Quiet time before "stopped typing"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &RoomchatConfig, cli: CliOverrides<'_>) -> Result<ResolvedConfig, ConfigError> {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

fn resolve_with_env<F>(
    config: &RoomchatConfig,
    cli: CliOverrides<'_>,
    env: F,
) -> Result<ResolvedConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // Username: CLI → env → config → login name → fallback
    let username = cli
        .user
        .map(str::to_string)
        .or_else(|| env("ROOMCHAT_USER"))
        .or_else(|| config.general.username.clone())
        .or_else(|| env("USER"))
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_USERNAME.to_string());

    // Room: CLI → env → config
    let default_room = cli
        .room
        .map(str::to_string)
        .or_else(|| env("ROOMCHAT_ROOM"))
        .or_else(|| config.general.default_room.clone())
        .filter(|room| !room.trim().is_empty());

    // Server origin: CLI → env → config → default
    let server_origin = cli
        .server
        .map(str::to_string)
        .or_else(|| env("ROOMCHAT_SERVER"))
        .or_else(|| config.server.origin.clone())
        .unwrap_or_else(|| DEFAULT_SERVER_ORIGIN.to_string());

    // Fail at startup rather than on the first connect.
    endpoint_url(&server_origin, "0")?;

    let idle_ms = config.typing.idle_ms.unwrap_or(DEFAULT_TYPING_IDLE_MS);

    Ok(ResolvedConfig {
        username,
        default_room,
        server_origin,
        typing_idle: Duration::from_millis(idle_ms),
    })
}
