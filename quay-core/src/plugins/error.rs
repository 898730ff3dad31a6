//! Plugin host error types

use std::path::PathBuf;
use thiserror::Error;

use quay_plugin_api::PluginError;

/// Errors that can occur in the plugin host
#[derive(Error, Debug)]
pub enum PluginHostError {
    /// Plugin directory cannot be enumerated or created
    #[error("Plugin directory unavailable: {path}: {source}")]
    DirectoryUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to load a bundle's dynamic library
    #[error("Failed to load bundle library: {0}")]
    LibraryLoad(#[from] libloading::Error),

    /// API version mismatch between the host and a bundle
    #[error("API version mismatch: host expects {expected}, bundle has {found}")]
    ApiVersionMismatch { expected: u32, found: u32 },

    /// Operation on a bundle context that was already released
    #[error("Bundle context already released: {path}")]
    ContextReleased { path: PathBuf },

    /// A plugin id is already registered; the first registrant wins
    #[error("Plugin id '{id}' is already registered, skipping duplicate")]
    DuplicateId { id: String },

    /// A plugin's own initialization logic failed
    #[error("Plugin '{id}' failed to initialize: {source}")]
    Init { id: String, source: PluginError },

    /// A plugin's unload hook failed
    #[error("Plugin '{id}' failed to unload: {source}")]
    Unload { id: String, source: PluginError },

    /// A plugin panicked inside a lifecycle hook
    #[error("Plugin '{id}' panicked in {hook}")]
    HookPanic { id: String, hook: &'static str },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_unavailable_display() {
        let err = PluginHostError::DirectoryUnavailable {
            path: PathBuf::from("/some/path"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/some/path"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_api_version_mismatch_display() {
        let err = PluginHostError::ApiVersionMismatch {
            expected: 1,
            found: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("1"));
        assert!(msg.contains("2"));
    }

    #[test]
    fn test_duplicate_id_display() {
        let err = PluginHostError::DuplicateId {
            id: "dup".to_string(),
        };
        assert!(err.to_string().contains("dup"));
    }

    #[test]
    fn test_init_error_display() {
        let err = PluginHostError::Init {
            id: "broken".to_string(),
            source: PluginError::custom("no database"),
        };
        let msg = err.to_string();
        assert!(msg.contains("broken"));
        assert!(msg.contains("no database"));
    }

    #[test]
    fn test_hook_panic_display() {
        let err = PluginHostError::HookPanic {
            id: "wild".to_string(),
            hook: "init",
        };
        let msg = err.to_string();
        assert!(msg.contains("wild"));
        assert!(msg.contains("init"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PluginHostError = io_err.into();
        assert!(matches!(err, PluginHostError::Io(_)));
    }
}
