//! Config directory resolution.
//!
//! `$ISAM_CONFIG_DIR` overrides the XDG location (`~/.config/isam` on Linux).

use std::path::{Path, PathBuf};

/// Application name for XDG directory resolution.
const APP_NAME: &str = "isam";

/// Environment variable overriding the config directory.
const CONFIG_DIR_ENV: &str = "ISAM_CONFIG_DIR";

/// The directory holding isam configuration files.
pub fn xdg_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Expand ~ to home directory in paths.
pub(crate) fn expand_path(path: &Path) -> PathBuf {
    if let Some(s) = path.to_str()
        && let Some(rest) = s.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}
