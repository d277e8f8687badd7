//! Layered configuration
//!
//! Defaults derive from the home directory; an optional YAML file under the
//! data dir can override them, and environment variables win over both.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::paths::{PATH_CONFIG_FILE, PATH_HOME};

/// Default game folder name under steamapps/common
pub const DEFAULT_GAME: &str = "REPO";

/// On-disk config file contents. Every field is optional; unset fields fall
/// through to environment variables and then the built-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dxvk_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dxvk_log_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dxvk_log_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game: Option<String>,
}

impl ConfigFile {
    /// Load the config file, returning defaults if it is missing or invalid
    pub fn load() -> Self {
        std::fs::read_to_string(&*PATH_CONFIG_FILE)
            .ok()
            .and_then(|s| serde_yaml::from_str(&s).ok())
            .unwrap_or_default()
    }
}

/// Environment overrides, captured once so resolution stays a pure function
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub prefix: Option<PathBuf>,
    pub dxvk_dir: Option<PathBuf>,
    pub dxvk_log_path: Option<PathBuf>,
    pub dxvk_log_level: Option<String>,
    pub game: Option<String>,
}

impl EnvOverrides {
    pub fn capture() -> Self {
        let path = |key: &str| env::var(key).ok().map(PathBuf::from);
        EnvOverrides {
            prefix: path("WINEPREFIX"),
            dxvk_dir: path("WINESTRAP_DXVK"),
            dxvk_log_path: path("DXVK_LOG_PATH"),
            dxvk_log_level: env::var("DXVK_LOG_LEVEL").ok(),
            game: env::var("WINESTRAP_GAME").ok(),
        }
    }
}

/// Fully resolved configuration used by every command
#[derive(Debug, Clone)]
pub struct StrapConfig {
    /// Wine prefix root
    pub prefix: PathBuf,
    /// DXVK install dir; the built DLLs live in its bin/ subdir
    pub dxvk_dir: PathBuf,
    pub dxvk_log_path: PathBuf,
    pub dxvk_log_level: String,
    /// Game folder name under steamapps/common
    pub game: String,
}

impl StrapConfig {
    pub fn load() -> Self {
        Self::resolve(ConfigFile::load(), EnvOverrides::capture())
    }

    pub fn resolve(file: ConfigFile, env: EnvOverrides) -> Self {
        StrapConfig {
            prefix: env
                .prefix
                .or(file.prefix)
                .unwrap_or_else(|| PATH_HOME.join("wined")),
            dxvk_dir: env
                .dxvk_dir
                .or(file.dxvk_dir)
                .unwrap_or_else(|| PATH_HOME.join("dxvk-release")),
            dxvk_log_path: env
                .dxvk_log_path
                .or(file.dxvk_log_path)
                .unwrap_or_else(|| PATH_HOME.join("dxvk-logs")),
            dxvk_log_level: env
                .dxvk_log_level
                .or(file.dxvk_log_level)
                .unwrap_or_else(|| "info".to_string()),
            game: env
                .game
                .or(file.game)
                .unwrap_or_else(|| DEFAULT_GAME.to_string()),
        }
    }

    /// Directory holding the built override DLLs
    pub fn dxvk_bin(&self) -> PathBuf {
        self.dxvk_dir.join("bin")
    }
}
