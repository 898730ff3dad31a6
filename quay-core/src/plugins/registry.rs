//! PluginRegistry - concurrency-safe store of active plugins

use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use quay_plugin_api::{Plugin, PluginIdentity};

use super::bundle::BundleContext;
use super::ui::UiContribution;

/// Lifecycle state of a plugin candidate.
///
/// Only `Active` plugins are ever present in the registry; the other states
/// exist in the loading pass and in logs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginState {
    /// Bundle file found, context not yet opened
    Discovered,
    /// Candidate resolved from its bundle
    Resolved,
    /// Candidate accepted, pre-init notification delivered
    Loaded,
    /// `init` running
    Initializing,
    /// Initialized and registered
    Active,
    /// Excluded by a failure in any earlier state
    Failed {
        /// What went wrong
        error: String,
    },
}

/// One active plugin: its identity, cached capability snapshot, the live
/// instance, and the loading context it was resolved from.
///
/// The instance slot is emptied during teardown so that every plugin is
/// dropped before its owning library is unmapped.
pub struct PluginRecord {
    identity: PluginIdentity,
    state: PluginState,
    ui: Option<UiContribution>,
    instance: Mutex<Option<Box<dyn Plugin>>>,
    context: Arc<BundleContext>,
}

impl PluginRecord {
    pub(crate) fn new(
        identity: PluginIdentity,
        ui: Option<UiContribution>,
        instance: Box<dyn Plugin>,
        context: Arc<BundleContext>,
    ) -> Self {
        Self {
            identity,
            state: PluginState::Active,
            ui,
            instance: Mutex::new(Some(instance)),
            context,
        }
    }

    /// Identity the plugin reported at resolution.
    pub fn identity(&self) -> &PluginIdentity {
        &self.identity
    }

    /// Current state; `Active` for as long as the record is registered.
    pub fn state(&self) -> &PluginState {
        &self.state
    }

    /// The UI contribution snapshot, if the plugin has the UI capability.
    pub fn ui(&self) -> Option<&UiContribution> {
        self.ui.as_ref()
    }

    /// Take the plugin instance out of the record for teardown.
    pub(crate) fn take_instance(&self) -> Option<Box<dyn Plugin>> {
        self.instance.lock().unwrap().take()
    }

    /// The loading context this plugin was resolved from.
    pub(crate) fn context(&self) -> &Arc<BundleContext> {
        &self.context
    }

    /// Serializable summary for registry queries.
    pub fn summary(&self) -> PluginSummary {
        PluginSummary {
            identity: self.identity.clone(),
            state: self.state.clone(),
        }
    }
}

/// What registry queries expose per plugin.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginSummary {
    /// Plugin identity
    pub identity: PluginIdentity,
    /// Lifecycle state
    pub state: PluginState,
}

/// Concurrency-safe store of active plugins, keyed by plugin id.
///
/// Insertion is an atomic test-and-set (first writer wins) and insertion
/// order is retained for reverse-order teardown. Readers get point-in-time
/// copies; a registry mutated mid-iteration is never observable.
#[derive(Default)]
pub struct PluginRegistry {
    inner: RwLock<RegistryInner>,
}

#[derive(Default)]
struct RegistryInner {
    records: HashMap<String, Arc<PluginRecord>>,
    order: Vec<String>,
}

impl PluginRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record if its id is not already taken.
    ///
    /// Returns `false` without modifying the registry when the id exists;
    /// the first registrant wins.
    pub fn insert(&self, record: Arc<PluginRecord>) -> bool {
        let mut inner = self.inner.write().unwrap();
        let id = record.identity().id.clone();
        if inner.records.contains_key(&id) {
            return false;
        }
        inner.order.push(id.clone());
        inner.records.insert(id, record);
        true
    }

    /// Whether a plugin id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.inner.read().unwrap().records.contains_key(id)
    }

    /// Look up one record by id.
    pub fn get(&self, id: &str) -> Option<Arc<PluginRecord>> {
        self.inner.read().unwrap().records.get(id).cloned()
    }

    /// Serializable summary of one plugin, absent if not registered.
    pub fn summary(&self, id: &str) -> Option<PluginSummary> {
        self.get(id).map(|record| record.summary())
    }

    /// Point-in-time copy of the registry contents.
    pub fn snapshot(&self) -> HashMap<String, Arc<PluginRecord>> {
        self.inner.read().unwrap().records.clone()
    }

    /// Summaries of every active plugin, keyed by id.
    pub fn list_loaded(&self) -> HashMap<String, PluginSummary> {
        self.inner
            .read()
            .unwrap()
            .records
            .iter()
            .map(|(id, record)| (id.clone(), record.summary()))
            .collect()
    }

    /// UI contributions of UI-capable plugins, in insertion order.
    pub fn ui_contributions(&self) -> Vec<UiContribution> {
        let inner = self.inner.read().unwrap();
        inner
            .order
            .iter()
            .filter_map(|id| inner.records.get(id))
            .filter_map(|record| record.ui().cloned())
            .collect()
    }

    /// Records in reverse insertion order, for teardown.
    pub(crate) fn records_newest_first(&self) -> Vec<Arc<PluginRecord>> {
        let inner = self.inner.read().unwrap();
        inner
            .order
            .iter()
            .rev()
            .filter_map(|id| inner.records.get(id).cloned())
            .collect()
    }

    /// Drop every record. Called once teardown has finished with them.
    pub(crate) fn clear(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.records.clear();
        inner.order.clear();
    }

    /// Number of active plugins.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().records.len()
    }

    /// True if no plugin is registered.
    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap().records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quay_plugin_api::{PluginContext, PluginError};
    use std::path::PathBuf;

    struct InertPlugin {
        id: String,
    }

    impl Plugin for InertPlugin {
        fn identity(&self) -> PluginIdentity {
            PluginIdentity {
                id: self.id.clone(),
                name: format!("Plugin {}", self.id),
                ..Default::default()
            }
        }

        fn init(&mut self, _ctx: &PluginContext) -> Result<(), PluginError> {
            Ok(())
        }

        fn unload(&mut self) -> Result<(), PluginError> {
            Ok(())
        }
    }

    fn record(id: &str) -> Arc<PluginRecord> {
        let plugin = InertPlugin { id: id.to_string() };
        Arc::new(PluginRecord::new(
            plugin.identity(),
            None,
            Box::new(plugin),
            Arc::new(BundleContext::detached(PathBuf::from(format!(
                "/tmp/lib{id}.so"
            )))),
        ))
    }

    #[test]
    fn test_insert_and_get() {
        let registry = PluginRegistry::new();
        assert!(registry.is_empty());

        assert!(registry.insert(record("a")));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("a"));
        assert_eq!(registry.get("a").unwrap().identity().id, "a");
        assert!(registry.get("b").is_none());
    }

    #[test]
    fn test_insert_duplicate_is_rejected() {
        let registry = PluginRegistry::new();
        assert!(registry.insert(record("dup")));
        assert!(!registry.insert(record("dup")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_snapshot_is_point_in_time() {
        let registry = PluginRegistry::new();
        registry.insert(record("a"));

        let snapshot = registry.snapshot();
        registry.insert(record("b"));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_list_loaded_summaries() {
        let registry = PluginRegistry::new();
        registry.insert(record("a"));
        registry.insert(record("b"));

        let loaded = registry.list_loaded();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded["a"].identity.name, "Plugin a");
        assert_eq!(loaded["a"].state, PluginState::Active);
    }

    #[test]
    fn test_records_newest_first_order() {
        let registry = PluginRegistry::new();
        registry.insert(record("a"));
        registry.insert(record("b"));
        registry.insert(record("c"));

        let ids: Vec<String> = registry
            .records_newest_first()
            .iter()
            .map(|r| r.identity().id.clone())
            .collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_clear_empties_registry() {
        let registry = PluginRegistry::new();
        registry.insert(record("a"));
        registry.clear();

        assert!(registry.is_empty());
        assert!(registry.list_loaded().is_empty());
    }

    #[test]
    fn test_summary_serialization_shape() {
        let registry = PluginRegistry::new();
        registry.insert(record("a"));

        let summary = registry.summary("a").unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["identity"]["id"], "a");
        assert_eq!(json["state"], "active");
    }
}
