//! Platform-specific paths for the plugin catalog and rack files.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/ambiance/` (Linux), `~/Library/Application Support/ambiance/` (macOS), `%APPDATA%\ambiance\` (Windows)
//! - **Catalog**: `<user config>/plugins.json`
//! - **Rack**: `<user config>/rack.json`
//! - **Plugin workspace**: `<data dir>/ambiance/plugins/`

use std::path::PathBuf;

use crate::error::{RackError, RackResult};

/// Application name used for directory paths.
const APP_NAME: &str = "ambiance";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default location of the plugin catalog.
pub fn catalog_path() -> PathBuf {
    user_config_dir().join("plugins.json")
}

/// Default location of the rack configuration.
pub fn rack_config_path() -> PathBuf {
    user_config_dir().join("rack.json")
}

/// Directory where user-managed plugins are kept. Always scanned.
pub fn plugin_workspace_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join("plugins")
}

/// Standard plugin install locations for the current platform, followed by
/// the plugin workspace.
pub fn default_plugin_dirs() -> Vec<PathBuf> {
    let mut dirs_out = Vec::new();
    let home = dirs::home_dir();

    #[cfg(target_os = "linux")]
    {
        if let Some(home) = &home {
            dirs_out.push(home.join(".vst"));
            dirs_out.push(home.join(".vst3"));
        }
        dirs_out.push(PathBuf::from("/usr/lib/vst"));
        dirs_out.push(PathBuf::from("/usr/lib/vst3"));
        dirs_out.push(PathBuf::from("/usr/local/lib/vst"));
        dirs_out.push(PathBuf::from("/usr/local/lib/vst3"));
    }
    #[cfg(target_os = "macos")]
    {
        let roots = ["VST", "VST3", "Components"];
        if let Some(home) = &home {
            for root in roots {
                dirs_out.push(home.join("Library/Audio/Plug-Ins").join(root));
            }
        }
        for root in roots {
            dirs_out.push(PathBuf::from("/Library/Audio/Plug-Ins").join(root));
        }
    }
    #[cfg(target_os = "windows")]
    {
        let _ = &home;
        dirs_out.push(PathBuf::from("C:\\Program Files\\Common Files\\VST3"));
        dirs_out.push(PathBuf::from("C:\\Program Files\\VSTPlugins"));
        dirs_out.push(PathBuf::from("C:\\Program Files\\Steinberg\\VSTPlugins"));
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        if let Some(home) = &home {
            dirs_out.push(home.join(".vst3"));
        }
    }

    dirs_out.push(plugin_workspace_dir());
    dirs_out
}

/// Ensure the user config directory exists.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_user_config_dir() -> RackResult<PathBuf> {
    let dir = user_config_dir();

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| RackError::create_dir(&dir, e))?;
    }

    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_contain_app_name() {
        assert!(user_config_dir().to_string_lossy().contains(APP_NAME));
        assert!(catalog_path().ends_with("ambiance/plugins.json"));
        assert!(rack_config_path().ends_with("ambiance/rack.json"));
        assert!(plugin_workspace_dir().ends_with("ambiance/plugins"));
    }

    #[test]
    fn workspace_is_always_scanned() {
        let dirs = default_plugin_dirs();
        assert_eq!(dirs.last(), Some(&plugin_workspace_dir()));
    }
}
