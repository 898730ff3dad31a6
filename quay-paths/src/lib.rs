//! XDG Base Directory paths for quay.
//!
//! The host and its tooling should use XDG paths for cross-platform
//! consistency, not platform-native paths. This matches tools like gh,
//! docker, kubectl.

use std::path::PathBuf;

/// Get the quay config directory.
///
/// Returns `$XDG_CONFIG_HOME/quay` if set, otherwise `~/.config/quay`.
/// This is where config files and the plugin directory live.
///
/// # Examples
///
/// ```
/// use quay_paths::config_dir;
///
/// let config = config_dir();
/// let plugin_dir = config.join("plugins");
/// ```
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config).join("quay")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".config/quay")
    } else {
        PathBuf::from(".config/quay")
    }
}
