//! quay-core: host-side plugin subsystem for the quay framework
//!
//! This crate provides the machinery a host application uses to run
//! independently packaged plugins:
//!
//! - **Discovery** - [`plugins::discover_bundles`] scans a directory for
//!   bundle files
//! - **Isolation** - [`plugins::BundleContext`] owns one dynamically loaded
//!   bundle and is never shared between bundles
//! - **Lifecycle** - [`plugins::PluginHost`] drives each plugin through
//!   `load` → `init` → active and tears everything down in reverse order
//! - **Registry** - [`plugins::PluginRegistry`] is the concurrency-safe
//!   store of active plugins the host's outer layers query
//!
//! # Quick Start
//!
//! ```no_run
//! use quay_core::plugins::{PluginHost, PluginHostConfig};
//!
//! let host = PluginHost::new(PluginHostConfig::default());
//! host.load_all();
//!
//! for (id, summary) in host.list_loaded() {
//!     println!("{id}: {}", summary.identity.name);
//! }
//!
//! host.unload_all();
//! ```

pub mod plugins;

// Re-export key types for convenience
pub use plugins::{
    BundleContext, BundleDescriptor, PluginHost, PluginHostConfig, PluginHostError,
    PluginRegistry, PluginState, PluginSummary, UiContribution,
};
