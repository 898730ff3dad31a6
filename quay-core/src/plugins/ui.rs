//! UI aggregation - what UI-capable plugins expose to the host shell

use serde::Serialize;
use std::collections::HashMap;

use quay_plugin_api::{NavigationItem, PluginIdentity, UiPlugin};

/// The UI contribution of one active plugin.
///
/// Built once at activation from the plugin's own getters and cached on its
/// registry record; the outer UI layer consumes this and nothing else from
/// the plugin. Metadata keys are present only when the plugin supplies the
/// corresponding value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiContribution {
    /// Identity of the contributing plugin
    pub identity: PluginIdentity,
    /// `entryComponent`, `assetsPath`, `description`; absent values omitted
    pub ui_metadata: HashMap<String, String>,
    /// Items the plugin adds to the main application menu
    pub navigation_items: Vec<NavigationItem>,
}

impl UiContribution {
    /// Derive a contribution from a plugin's UI capability.
    pub(crate) fn from_plugin(identity: &PluginIdentity, ui: &dyn UiPlugin) -> Self {
        let mut ui_metadata = HashMap::new();
        if let Some(component) = ui.entry_component() {
            ui_metadata.insert("entryComponent".to_string(), component);
        }
        if let Some(assets) = ui.assets_path() {
            ui_metadata.insert("assetsPath".to_string(), assets);
        }
        if !identity.description.is_empty() {
            ui_metadata.insert("description".to_string(), identity.description.clone());
        }

        Self {
            identity: identity.clone(),
            ui_metadata,
            navigation_items: ui.navigation_items(),
        }
    }
}
