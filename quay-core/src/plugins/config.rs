//! Per-bundle configuration resolution

use std::path::{Path, PathBuf};

use quay_plugin_api::PluginConfig;

/// Candidate configuration documents for a bundle, in preference order.
///
/// For a bundle at `libdashboard.so` these are `libdashboard.toml` and
/// `libdashboard.config.toml`, next to the bundle file.
fn candidate_documents(bundle_path: &Path) -> Vec<PathBuf> {
    let Some(stem) = bundle_path.file_stem().and_then(|s| s.to_str()) else {
        return Vec::new();
    };
    let dir = bundle_path.parent().unwrap_or_else(|| Path::new("."));
    vec![
        dir.join(format!("{stem}.toml")),
        dir.join(format!("{stem}.config.toml")),
    ]
}

/// Resolve a bundle's optional configuration document.
///
/// The first recognized document that exists wins. Absence yields the empty
/// configuration; a document that cannot be read or parsed is reported and
/// also yields the empty configuration. Config resolution never aborts
/// loading.
pub fn resolve_config(bundle_path: &Path) -> PluginConfig {
    for document in candidate_documents(bundle_path) {
        if !document.exists() {
            continue;
        }
        match PluginConfig::load(&document) {
            Ok(config) => {
                tracing::debug!(
                    config = %document.display(),
                    keys = config.len(),
                    "Loaded bundle configuration"
                );
                return config;
            }
            Err(e) => {
                tracing::warn!(
                    config = %document.display(),
                    error = %e,
                    "Failed to read bundle configuration, using empty configuration"
                );
                return PluginConfig::new();
            }
        }
    }

    tracing::debug!(
        bundle = %bundle_path.display(),
        "No configuration document found, using empty configuration"
    );
    PluginConfig::new()
}
