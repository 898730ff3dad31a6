//! Plugin system for quay
//!
//! This module provides the infrastructure for discovering, loading, and
//! managing plugin bundles:
//!
//! - [`discover_bundles`]: Enumerates bundle files in the plugin directory
//! - [`BundleContext`]: Isolated loading context owning one bundle's library
//! - [`PluginHost`]: Drives plugins through their lifecycle and owns teardown
//! - [`PluginRegistry`]: Concurrency-safe store of active plugins
//! - [`PluginHostError`]: Error types for plugin operations
//!
//! # Bundle Discovery
//!
//! Bundles are native dynamic libraries (`.so`/`.dylib`/`.dll`) placed
//! directly in the plugin directory, by default
//! `~/.config/quay/plugins/`. Other files in the directory are ignored.
//!
//! # Bundle Layout
//!
//! ```text
//! ~/.config/quay/plugins/
//! ├── libdashboard_plugin.so          # the bundle
//! ├── libdashboard_plugin.toml        # optional configuration document
//! └── libreports_plugin.so
//! ```
//!
//! # Example
//!
//! ```ignore
//! use quay_core::plugins::{PluginHost, PluginHostConfig};
//!
//! let host = PluginHost::new(PluginHostConfig::default());
//!
//! // Load all bundles found in the plugin directory
//! host.load_all();
//!
//! // Query the registry
//! let loaded = host.list_loaded();
//! let ui = host.ui_contributions();
//!
//! // Reverse-order teardown; releases every bundle context
//! host.unload_all();
//! ```

mod bundle;
mod config;
mod discovery;
mod error;
mod host;
mod registry;
mod ui;

pub use bundle::BundleContext;
pub use config::resolve_config;
pub use discovery::{discover_bundles, BundleDescriptor};
pub use error::PluginHostError;
pub use host::{PluginHost, PluginHostConfig};
pub use registry::{PluginRecord, PluginRegistry, PluginState, PluginSummary};
pub use ui::UiContribution;
