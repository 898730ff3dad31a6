//! Dashboard Plugin - A simple example bundle for quay
//!
//! This bundle demonstrates:
//! - Basic plugin structure with the `export_bundle!` macro
//! - Implementing the `Plugin` lifecycle (`load`, `init`, `unload`)
//! - Contributing to the host UI through the `UiPlugin` capability
//! - Reading the bundle configuration and looking up a shared host service
//!
//! ## Building
//!
//! ```bash
//! cargo build --release
//! ```
//!
//! ## Installing
//!
//! ```bash
//! mkdir -p ~/.config/quay/plugins
//! cp target/release/libdashboard_plugin.so ~/.config/quay/plugins/
//! ```
//!
//! An optional `libdashboard_plugin.toml` next to the bundle configures the
//! menu title:
//!
//! ```toml
//! title = "Team Dashboard"
//! ```

use quay_plugin_api::{
    export_bundle, NavigationItem, Plugin, PluginContext, PluginError, PluginIdentity, UiPlugin,
};

const PLUGIN_ID: &str = "example-dashboard";
const ENTRY_COMPONENT: &str = "ExampleDashboard";

/// A plugin that contributes a dashboard page to the host shell.
#[derive(Default)]
pub struct DashboardPlugin {
    /// Menu title, overridable through the bundle configuration
    title: Option<String>,
}

impl DashboardPlugin {
    fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("Example Dashboard")
    }
}

impl Plugin for DashboardPlugin {
    fn identity(&self) -> PluginIdentity {
        PluginIdentity {
            id: PLUGIN_ID.to_string(),
            name: "Example Dashboard".to_string(),
            vendor: "quay".to_string(),
            version: "0.1.0".to_string(),
            description: "A simple example plugin that contributes a dashboard page".to_string(),
        }
    }

    fn load(&mut self) {
        tracing::info!(plugin = PLUGIN_ID, "Dashboard plugin loaded");
    }

    fn init(&mut self, ctx: &PluginContext) -> Result<(), PluginError> {
        self.title = ctx.config_get("title");

        // The host registers shared services before the load phase; a
        // missing service is fine, the dashboard just stays generic.
        match ctx.service::<String>("instance-name") {
            Some(instance) => {
                ctx.log_info(&format!("Dashboard initialized for instance {instance}"));
            }
            None => ctx.log_info("Dashboard initialized (no instance-name service)"),
        }

        Ok(())
    }

    fn unload(&mut self) -> Result<(), PluginError> {
        tracing::info!(plugin = PLUGIN_ID, "Dashboard plugin unloaded");
        Ok(())
    }

    fn ui(&self) -> Option<&dyn UiPlugin> {
        Some(self)
    }
}

impl UiPlugin for DashboardPlugin {
    fn entry_component(&self) -> Option<String> {
        Some(ENTRY_COMPONENT.to_string())
    }

    fn assets_path(&self) -> Option<String> {
        Some(format!("{PLUGIN_ID}/assets"))
    }

    fn navigation_items(&self) -> Vec<NavigationItem> {
        let item = NavigationItem::new(self.title(), format!("/ui/plugin/{PLUGIN_ID}"));
        match item {
            Ok(item) => vec![item.with_icon("fa-gauge")],
            Err(_) => Vec::new(),
        }
    }
}

// This macro generates the C ABI entry points for dynamic loading
export_bundle!(DashboardPlugin);
