//! PluginHost - drives bundle loading, plugin lifecycle, and teardown

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use quay_plugin_api::{HostServices, Plugin, PluginContext};

use super::bundle::BundleContext;
use super::config::resolve_config;
use super::discovery::{discover_bundles, BundleDescriptor};
use super::error::PluginHostError;
use super::registry::{PluginRecord, PluginRegistry, PluginState, PluginSummary};
use super::ui::UiContribution;

/// Configuration for PluginHost
pub struct PluginHostConfig {
    /// Directory scanned for bundles (~/.config/quay/plugins by default)
    pub plugin_dir: PathBuf,
}

impl Default for PluginHostConfig {
    fn default() -> Self {
        Self {
            plugin_dir: quay_paths::config_dir().join("plugins"),
        }
    }
}

/// The plugin host manages loading, initializing, and unloading plugins.
///
/// One host owns the whole subsystem: the bundle contexts it opens, the
/// registry of active plugins, and the shared [`HostServices`] handed to
/// plugins at init. Methods take `&self`; the host can sit behind an `Arc`
/// and serve registry reads concurrently. Loading concurrently with
/// unloading is not supported - the embedding host is the single lifecycle
/// owner.
pub struct PluginHost {
    plugin_dir: PathBuf,
    services: Arc<HostServices>,
    registry: Arc<PluginRegistry>,
    /// Contexts kept open because a plugin from them activated, in
    /// activation order. Released during `unload_all`.
    contexts: Mutex<Vec<Arc<BundleContext>>>,
}

impl PluginHost {
    /// Create a new plugin host with the given configuration.
    pub fn new(config: PluginHostConfig) -> Self {
        Self {
            plugin_dir: config.plugin_dir,
            services: Arc::new(HostServices::new()),
            registry: Arc::new(PluginRegistry::new()),
            contexts: Mutex::new(Vec::new()),
        }
    }

    /// The directory scanned for bundles.
    pub fn plugin_dir(&self) -> &Path {
        &self.plugin_dir
    }

    /// Shared services exposed to plugins. Register host services here
    /// before calling [`load_all`](Self::load_all).
    pub fn services(&self) -> &Arc<HostServices> {
        &self.services
    }

    /// The live registry of active plugins.
    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    // ─── Load Phase ──────────────────────────────────────────────────

    /// Discover and load every bundle in the plugin directory.
    ///
    /// Failures are contained per bundle and per candidate: a bundle that
    /// cannot be opened, or a plugin that fails `init`, is logged and
    /// excluded without affecting its siblings. Returns the number of
    /// plugins that reached the active state.
    pub fn load_all(&self) -> usize {
        let bundles = match discover_bundles(&self.plugin_dir) {
            Ok(bundles) => bundles,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    "Plugin directory unavailable, proceeding with zero plugins"
                );
                Vec::new()
            }
        };

        let mut activated = 0;
        for descriptor in &bundles {
            activated += self.load_bundle(descriptor);
        }
        tracing::info!(
            bundles = bundles.len(),
            plugins = activated,
            "Plugin load phase complete"
        );
        activated
    }

    /// Open one bundle, resolve its candidates, and drive each through the
    /// lifecycle. Returns the number of activated plugins.
    fn load_bundle(&self, descriptor: &BundleDescriptor) -> usize {
        tracing::info!(
            bundle = %descriptor.path().display(),
            ordinal = descriptor.ordinal(),
            state = ?PluginState::Discovered,
            "Loading bundle"
        );

        let context = match BundleContext::open(descriptor.path()) {
            Ok(context) => Arc::new(context),
            Err(e) => {
                tracing::error!(
                    bundle = %descriptor.path().display(),
                    error = %e,
                    "Failed to open bundle"
                );
                return 0;
            }
        };

        let candidates = match context.resolve_plugins() {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::error!(
                    bundle = %descriptor.path().display(),
                    error = %e,
                    "Failed to resolve plugins from bundle"
                );
                context.release();
                return 0;
            }
        };

        if candidates.is_empty() {
            tracing::info!(
                bundle = %descriptor.path().display(),
                "Bundle contributes no plugins"
            );
            context.release();
            return 0;
        }

        let mut activated = 0;
        for candidate in candidates {
            match self.activate(candidate, &context) {
                Ok(id) => {
                    tracing::info!(
                        plugin = %id,
                        bundle = %descriptor.path().display(),
                        state = ?PluginState::Active,
                        "Plugin active"
                    );
                    activated += 1;
                }
                Err(e) => {
                    tracing::error!(
                        bundle = %descriptor.path().display(),
                        error = %e,
                        state = ?PluginState::Failed { error: e.to_string() },
                        "Plugin candidate failed"
                    );
                }
            }
        }

        // The context must outlive every active plugin resolved from it; if
        // nothing from this bundle survived, it can go now.
        if activated == 0 {
            context.release();
        } else {
            self.contexts.lock().unwrap().push(context);
        }

        activated
    }

    /// Drive one candidate through resolve → load → init → active.
    ///
    /// The instance is dropped on every failure path; the caller decides
    /// what happens to the shared bundle context.
    fn activate(
        &self,
        mut candidate: Box<dyn Plugin>,
        context: &Arc<BundleContext>,
    ) -> Result<String, PluginHostError> {
        let identity = candidate.identity();
        let id = identity.id.clone();
        tracing::debug!(plugin = %id, state = ?PluginState::Resolved, "Plugin candidate resolved");

        // First-wins duplicate rejection. The atomic insert below repeats
        // the check; this one spares a doomed candidate its init.
        if self.registry.contains(&id) {
            return Err(PluginHostError::DuplicateId { id });
        }

        tracing::debug!(plugin = %id, state = ?PluginState::Loaded, "Plugin candidate accepted");

        // Pre-init notification; no context yet.
        if std::panic::catch_unwind(AssertUnwindSafe(|| candidate.load())).is_err() {
            return Err(PluginHostError::HookPanic { id, hook: "load" });
        }

        tracing::debug!(plugin = %id, state = ?PluginState::Initializing, "Initializing plugin");
        let config = resolve_config(context.path());
        let ctx = PluginContext::new(id.clone(), Arc::clone(&self.services), config);

        match std::panic::catch_unwind(AssertUnwindSafe(|| candidate.init(&ctx))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(PluginHostError::Init { id, source: e }),
            Err(_) => return Err(PluginHostError::HookPanic { id, hook: "init" }),
        }

        let ui = candidate
            .ui()
            .map(|ui| UiContribution::from_plugin(&identity, ui));
        let record = Arc::new(PluginRecord::new(
            identity,
            ui,
            candidate,
            Arc::clone(context),
        ));

        // Atomic test-and-set: under concurrent loading the first completed
        // insertion wins and later ones are duplicates.
        if !self.registry.insert(record) {
            return Err(PluginHostError::DuplicateId { id });
        }

        Ok(id)
    }

    // ─── Unload Phase ────────────────────────────────────────────────

    /// Unload every active plugin in reverse activation order, release
    /// every bundle context, then clear the registry.
    ///
    /// A failing or panicking `unload` hook is logged and does not stop
    /// the remaining plugins or the context release. Calling this twice is
    /// a no-op the second time.
    pub fn unload_all(&self) {
        let records = self.registry.records_newest_first();
        if records.is_empty() && self.contexts.lock().unwrap().is_empty() {
            return;
        }

        tracing::info!(count = records.len(), "Unloading all plugins");

        for record in &records {
            let id = &record.identity().id;
            let Some(mut instance) = record.take_instance() else {
                continue;
            };

            match std::panic::catch_unwind(AssertUnwindSafe(|| instance.unload())) {
                Ok(Ok(())) => tracing::info!(plugin = %id, "Plugin unloaded"),
                Ok(Err(e)) => {
                    tracing::error!(plugin = %id, error = %e, "Plugin unload hook failed");
                }
                Err(_) => {
                    tracing::error!(plugin = %id, "Plugin panicked in unload");
                }
            }

            // Instance dropped here, before any library is unmapped.
            drop(instance);
        }

        // Release every distinct context exactly once. Candidates from the
        // same bundle share one context; dedupe by identity, and release()
        // is idempotent besides.
        let mut to_release: Vec<Arc<BundleContext>> = records
            .iter()
            .map(|record| Arc::clone(record.context()))
            .collect();
        to_release.extend(self.contexts.lock().unwrap().drain(..));

        let mut released: Vec<*const BundleContext> = Vec::new();
        for context in to_release {
            let ptr = Arc::as_ptr(&context);
            if released.contains(&ptr) {
                continue;
            }
            released.push(ptr);
            context.release();
        }

        // Registry is cleared only after the full pass completed.
        self.registry.clear();
        tracing::info!("All plugins unloaded and bundle contexts released");
    }

    // ─── Registry Queries ────────────────────────────────────────────

    /// Summaries of every active plugin, keyed by id.
    pub fn list_loaded(&self) -> HashMap<String, PluginSummary> {
        self.registry.list_loaded()
    }

    /// Summary of one plugin, absent if not registered.
    pub fn get(&self, id: &str) -> Option<PluginSummary> {
        self.registry.summary(id)
    }

    /// UI contributions of UI-capable plugins, in activation order.
    pub fn ui_contributions(&self) -> Vec<UiContribution> {
        self.registry.ui_contributions()
    }

    /// Number of active plugins.
    pub fn plugin_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of bundle contexts currently held open.
    pub fn context_count(&self) -> usize {
        self.contexts.lock().unwrap().len()
    }
}

impl Drop for PluginHost {
    fn drop(&mut self) {
        // Graceful teardown even when the embedding host forgets to call
        // unload_all before dropping the subsystem.
        self.unload_all();
    }
}
