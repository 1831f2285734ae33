//! Configuration loading and root folder resolution

use crate::{Error, Result};
use std::path::PathBuf;

/// Filename of the journal database inside the root folder
pub const DATABASE_FILENAME: &str = "brewlog.db";

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&str>, env_var_name: &str) -> Result<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Ok(PathBuf::from(path));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = find_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return Ok(PathBuf::from(root_folder));
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    Ok(default_root_folder())
}

/// Path of the database file under a resolved root folder
pub fn database_path(root_folder: &std::path::Path) -> PathBuf {
    root_folder.join(DATABASE_FILENAME)
}

/// Get default configuration file path for the platform
fn find_config_file() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/brewlog/config.toml first, then /etc/brewlog/config.toml
        if let Some(path) = dirs::config_dir().map(|d| d.join("brewlog").join("config.toml")) {
            if path.exists() {
                return Ok(path);
            }
        }
        let system_config = PathBuf::from("/etc/brewlog/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
        return Err(Error::Config("No config file found".to_string()));
    }

    let config_path = dirs::config_dir()
        .map(|d| d.join("brewlog").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

    if config_path.exists() {
        Ok(config_path)
    } else {
        Err(Error::Config(format!(
            "Config file not found: {:?}",
            config_path
        )))
    }
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/brewlog (or /var/lib/brewlog for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("brewlog"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/brewlog"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/brewlog
        dirs::data_dir()
            .map(|d| d.join("brewlog"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/brewlog"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\brewlog
        dirs::data_local_dir()
            .map(|d| d.join("brewlog"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\brewlog"))
    } else {
        PathBuf::from("./brewlog_data")
    }
}
