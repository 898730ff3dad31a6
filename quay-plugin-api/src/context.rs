//! PluginContext - a plugin's interface to host services and configuration

use serde::de::DeserializeOwned;
use std::any::Any;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use crate::error::PluginError;

// ─── Host Services ───────────────────────────────────────────────────

/// String-keyed store of shared services the host exposes to plugins.
///
/// The host registers services before the load phase; plugins look them up
/// by name during `init` through [`PluginContext::service`]. Lookup is
/// read-only for plugins - registration is a host-side operation.
///
/// Services are stored type-erased. A service registered as `Arc<T>` is
/// retrieved with the same `T`, which may be a trait object:
///
/// ```ignore
/// services.register("audit-log", Arc::new(log) as Arc<dyn AuditLog>);
/// let log: Arc<dyn AuditLog> = ctx.service("audit-log").unwrap();
/// ```
#[derive(Default)]
pub struct HostServices {
    services: RwLock<HashMap<String, Box<dyn Any + Send + Sync>>>,
}

impl HostServices {
    /// Create an empty service store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shared service under a name. A later registration with
    /// the same name replaces the earlier one.
    pub fn register<T: ?Sized + Send + Sync + 'static>(&self, name: &str, service: Arc<T>) {
        self.services
            .write()
            .unwrap()
            .insert(name.to_string(), Box::new(service));
    }

    /// Look up a service by name.
    ///
    /// Returns `None` if no service is registered under the name or the
    /// registered service is not an `Arc<T>`.
    pub fn get<T: ?Sized + Send + Sync + 'static>(&self, name: &str) -> Option<Arc<T>> {
        self.services
            .read()
            .unwrap()
            .get(name)
            .and_then(|service| service.downcast_ref::<Arc<T>>())
            .cloned()
    }

    /// Whether a service is registered under the name.
    pub fn contains(&self, name: &str) -> bool {
        self.services.read().unwrap().contains_key(name)
    }
}

// ─── Plugin Context ──────────────────────────────────────────────────

/// A plugin's interface to host capabilities.
///
/// Constructed by the host once per plugin, just before `init`, and handed
/// to the plugin by reference. Combines the shared [`HostServices`] handle
/// with the plugin's own resolved [`PluginConfig`]. Plugins must not retain
/// the context beyond their own lifetime.
pub struct PluginContext {
    plugin_id: String,
    services: Arc<HostServices>,
    config: PluginConfig,
}

impl PluginContext {
    /// Create a new plugin context.
    pub fn new(plugin_id: String, services: Arc<HostServices>, config: PluginConfig) -> Self {
        Self {
            plugin_id,
            services,
            config,
        }
    }

    /// The id of the plugin this context was built for.
    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    /// Look up a shared host service by name.
    pub fn service<T: ?Sized + Send + Sync + 'static>(&self, name: &str) -> Option<Arc<T>> {
        self.services.get(name)
    }

    /// This plugin's configuration.
    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Read a configuration value.
    ///
    /// # Example
    /// ```ignore
    /// let threshold: Option<u32> = ctx.config_get("threshold");
    /// ```
    pub fn config_get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.config.get(key)
    }

    // ─── Logging ─────────────────────────────────────────────────────

    /// Log an info message (automatically tagged with the plugin id)
    pub fn log_info(&self, message: &str) {
        tracing::info!(plugin = %self.plugin_id, "{}", message);
    }

    /// Log a warning message
    pub fn log_warn(&self, message: &str) {
        tracing::warn!(plugin = %self.plugin_id, "{}", message);
    }

    /// Log an error message
    pub fn log_error(&self, message: &str) {
        tracing::error!(plugin = %self.plugin_id, "{}", message);
    }

    /// Log a debug message
    pub fn log_debug(&self, message: &str) {
        tracing::debug!(plugin = %self.plugin_id, "{}", message);
    }
}

// ─── Plugin Configuration ────────────────────────────────────────────

/// Plugin configuration - a string-keyed TOML value mapping.
///
/// An absent configuration document yields an empty mapping, never an
/// error; plugins can rely on the config always being present.
#[derive(Debug, Default)]
pub struct PluginConfig {
    values: HashMap<String, toml::Value>,
}

impl PluginConfig {
    /// Create a new empty config
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file.
    ///
    /// A missing file yields an empty config; a malformed file is an error
    /// the caller is expected to degrade to the empty config.
    pub fn load(path: &Path) -> Result<Self, PluginError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path)?;
        let values: HashMap<String, toml::Value> =
            toml::from_str(&content).map_err(|e| PluginError::Config(e.to_string()))?;
        Ok(Self { values })
    }

    /// Get a configuration value
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values.get(key).and_then(|v| v.clone().try_into().ok())
    }

    /// Set a configuration value
    pub fn set<T: serde::Serialize>(&mut self, key: &str, value: T) -> Result<(), PluginError> {
        let toml_value =
            toml::Value::try_from(value).map_err(|e| PluginError::Serialization(e.to_string()))?;
        self.values.insert(key.to_string(), toml_value);
        Ok(())
    }

    /// Number of top-level keys
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no configuration was resolved
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct EnglishGreeter;

    impl Greeter for EnglishGreeter {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    #[test]
    fn test_service_roundtrip_concrete_type() {
        let services = HostServices::new();
        services.register("instance-name", Arc::new("quay-dev".to_string()));

        let name: Arc<String> = services.get("instance-name").unwrap();
        assert_eq!(*name, "quay-dev");
    }

    #[test]
    fn test_service_roundtrip_trait_object() {
        let services = HostServices::new();
        services.register("greeter", Arc::new(EnglishGreeter) as Arc<dyn Greeter>);

        let greeter: Arc<dyn Greeter> = services.get("greeter").unwrap();
        assert_eq!(greeter.greet(), "hello");
    }

    #[test]
    fn test_service_missing_returns_none() {
        let services = HostServices::new();
        assert!(services.get::<String>("nope").is_none());
        assert!(!services.contains("nope"));
    }

    #[test]
    fn test_service_wrong_type_returns_none() {
        let services = HostServices::new();
        services.register("counter", Arc::new(42u64));

        assert!(services.get::<String>("counter").is_none());
        assert_eq!(*services.get::<u64>("counter").unwrap(), 42);
    }

    #[test]
    fn test_service_reregistration_replaces() {
        let services = HostServices::new();
        services.register("value", Arc::new(1u32));
        services.register("value", Arc::new(2u32));

        assert_eq!(*services.get::<u32>("value").unwrap(), 2);
    }

    #[test]
    fn test_context_exposes_services_and_config() {
        let services = Arc::new(HostServices::new());
        services.register("instance-name", Arc::new("quay-dev".to_string()));

        let mut config = PluginConfig::new();
        config.set("threshold", 10i64).unwrap();

        let ctx = PluginContext::new("test-plugin".to_string(), services, config);
        assert_eq!(ctx.plugin_id(), "test-plugin");
        assert_eq!(
            *ctx.service::<String>("instance-name").unwrap(),
            "quay-dev"
        );
        assert_eq!(ctx.config_get::<i64>("threshold"), Some(10));
        assert_eq!(ctx.config_get::<i64>("missing"), None);
    }

    #[test]
    fn test_config_get_set() {
        let mut config = PluginConfig::new();

        config.set("string_key", "hello").unwrap();
        config.set("int_key", 42i64).unwrap();
        config.set("bool_key", true).unwrap();

        assert_eq!(
            config.get::<String>("string_key"),
            Some("hello".to_string())
        );
        assert_eq!(config.get::<i64>("int_key"), Some(42));
        assert_eq!(config.get::<bool>("bool_key"), Some(true));
        assert_eq!(config.get::<String>("missing"), None);
    }

    #[test]
    fn test_config_load_missing_file_is_empty() {
        let config = PluginConfig::load(Path::new("/nonexistent/config.toml")).unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_config_load_nested_tables() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "greeting = \"hi\"\n\n[limits]\nmax = 5\n").unwrap();

        let config = PluginConfig::load(&path).unwrap();
        assert_eq!(config.get::<String>("greeting"), Some("hi".to_string()));

        let limits: toml::Value = config.get("limits").unwrap();
        assert_eq!(limits.get("max").and_then(|v| v.as_integer()), Some(5));
    }

    #[test]
    fn test_config_load_malformed_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not valid toml [[[").unwrap();

        assert!(PluginConfig::load(&path).is_err());
    }
}
