//! Bundle discovery - scanning the plugin directory for bundle files

use std::path::{Path, PathBuf};

use super::error::PluginHostError;

/// File extension recognized as a bundle on this platform.
pub const BUNDLE_EXTENSION: &str = std::env::consts::DLL_EXTENSION;

/// One discoverable bundle file.
///
/// The ordinal is the position in the directory scan, not a timestamp;
/// directory-listing order is platform-dependent and accepted as such.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleDescriptor {
    path: PathBuf,
    ordinal: usize,
}

impl BundleDescriptor {
    /// Filesystem location of the bundle file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Discovery sequence number.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }
}

/// Enumerate bundle files in the plugin directory.
///
/// A missing directory is created. A directory that can neither be created
/// nor read is [`PluginHostError::DirectoryUnavailable`]; the caller is
/// expected to degrade that to an empty plugin set rather than abort.
/// Entries without the platform bundle extension are ignored.
pub fn discover_bundles(dir: &Path) -> Result<Vec<BundleDescriptor>, PluginHostError> {
    if !dir.is_dir() {
        tracing::warn!(dir = %dir.display(), "Plugin directory does not exist, creating it");
        std::fs::create_dir_all(dir).map_err(|e| PluginHostError::DirectoryUnavailable {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }

    let entries = std::fs::read_dir(dir).map_err(|e| PluginHostError::DirectoryUnavailable {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut found = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let is_bundle = path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == BUNDLE_EXTENSION);
        if is_bundle {
            found.push(BundleDescriptor {
                path,
                ordinal: found.len(),
            });
        }
    }

    if found.is_empty() {
        tracing::info!(dir = %dir.display(), "No bundles found in plugin directory");
    }

    Ok(found)
}
