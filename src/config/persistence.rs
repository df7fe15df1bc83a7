//! Configuration file persistence
//!
//! Settings live in `<config dir>/tocrail/config.json`. Loading never fails
//! outright: a missing, blank or broken file falls back to defaults. Saving
//! writes a sibling `.bak` file first and renames it into place so a crash
//! mid-write never leaves a truncated config behind.

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "tocrail";
const CONFIG_FILE: &str = "config.json";
const BACKUP_FILE: &str = "config.json.bak";

// ─────────────────────────────────────────────────────────────────────────────
// Locations
// ─────────────────────────────────────────────────────────────────────────────

/// `tocrail` under the platform config directory (`%APPDATA%`,
/// `~/Library/Application Support`, `$XDG_CONFIG_HOME` or `~/.config`).
pub fn get_config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or(Error::NoConfigDir)?;
    Ok(base.join(APP_DIR))
}

pub fn get_config_file_path() -> Result<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILE))
}

// ─────────────────────────────────────────────────────────────────────────────
// Loading
// ─────────────────────────────────────────────────────────────────────────────

/// Settings from the default location, or defaults (logged) on any failure.
pub fn load_config() -> Settings {
    get_config_dir()
        .and_then(|dir| load_config_from(&dir))
        .unwrap_or_warn_default(Settings::default(), "Could not load settings")
}

/// Read and sanitize the config file in `dir`.
///
/// Missing and whitespace-only files mean "all defaults"; anything that
/// fails to parse is reported as [`Error::ConfigParse`].
pub fn load_config_from(dir: &Path) -> Result<Settings> {
    let path = dir.join(CONFIG_FILE);

    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No settings at {}, using defaults", path.display());
            return Ok(Settings::default());
        }
        Err(source) => return Err(Error::ConfigRead { path, source }),
    };

    if text.trim().is_empty() {
        debug!("{} is blank, using defaults", path.display());
        return Ok(Settings::default());
    }

    match Settings::from_json_sanitized(&text) {
        Ok(settings) => {
            info!("Loaded settings from {}", path.display());
            Ok(settings)
        }
        Err(source) => Err(Error::ConfigParse { path, source }),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Saving
// ─────────────────────────────────────────────────────────────────────────────

pub fn save_config(settings: &Settings) -> Result<()> {
    save_config_to(&get_config_dir()?, settings)
}

/// Write `settings` into `dir`, creating it if needed.
pub fn save_config_to(dir: &Path, settings: &Settings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings).map_err(Error::ConfigEncode)?;

    fs::create_dir_all(dir).map_err(write_error(dir))?;

    let target = dir.join(CONFIG_FILE);
    let backup = dir.join(BACKUP_FILE);
    fs::write(&backup, json).map_err(write_error(&backup))?;
    fs::rename(&backup, &target).map_err(write_error(&target))?;

    info!("Saved settings to {}", target.display());
    Ok(())
}

fn write_error(path: &Path) -> impl FnOnce(io::Error) -> Error {
    let path = path.to_path_buf();
    move |source| Error::ConfigWrite { path, source }
}

/// Save for shutdown paths, where there is nobody left to report to.
/// Returns whether the write succeeded.
pub fn save_config_silent(settings: &Settings) -> bool {
    save_config(settings)
        .map_err(|e| warn!("Settings not saved: {}", e))
        .is_ok()
}
