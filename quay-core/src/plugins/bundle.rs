//! BundleContext - the isolated loading context owning one bundle

use libloading::{Library, Symbol};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use quay_plugin_api::{API_VERSION, BundleRegistrar, Plugin};

use super::error::PluginHostError;

/// Isolated loading context for one bundle.
///
/// Owns the bundle's dynamic library handle for its whole lifetime; the raw
/// handle never escapes this type. One context exists per bundle and is
/// never shared between bundles - host symbols are visible to every bundle
/// through the shared plugin API library, sibling bundle symbols are not.
///
/// Every plugin instance resolved from a context must be dropped before the
/// context is released; the host enforces this ordering during teardown.
pub struct BundleContext {
    path: PathBuf,
    library: Mutex<Option<Library>>,
}

impl BundleContext {
    /// Open a bundle file, mapping its library and verifying the plugin API
    /// version it was built against.
    pub fn open(path: &Path) -> Result<Self, PluginHostError> {
        // SAFETY: We're loading a bundle the operator placed in the plugin
        // directory. The bundle is expected to follow the plugin API
        // contract; a file that is not a loadable library fails here.
        let library = unsafe { Library::new(path)? };

        // SAFETY: We're calling a C function exported by the bundle.
        let api_version_fn: Symbol<extern "C" fn() -> u32> =
            unsafe { library.get(b"_quay_bundle_api_version")? };

        let found = api_version_fn();
        if found != API_VERSION {
            return Err(PluginHostError::ApiVersionMismatch {
                expected: API_VERSION,
                found,
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            library: Mutex::new(Some(library)),
        })
    }

    /// Filesystem location of the bundle this context owns.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve every plugin instance this bundle registers.
    ///
    /// A bundle that exports no registration entry point contributes zero
    /// plugins; zero is valid and is not an error.
    pub fn resolve_plugins(&self) -> Result<Vec<Box<dyn Plugin>>, PluginHostError> {
        let guard = self.library.lock().unwrap();
        let library = guard
            .as_ref()
            .ok_or_else(|| PluginHostError::ContextReleased {
                path: self.path.clone(),
            })?;

        // SAFETY: We're looking up the registration entry point generated by
        // the bundle's `export_bundle!` invocation.
        let register_fn: Symbol<extern "C" fn(&mut BundleRegistrar)> =
            match unsafe { library.get(b"_quay_bundle_register") } {
                Ok(symbol) => symbol,
                Err(_) => {
                    tracing::debug!(
                        bundle = %self.path.display(),
                        "Bundle exports no registration entry point, contributes no plugins"
                    );
                    return Ok(Vec::new());
                }
            };

        let mut registrar = BundleRegistrar::new();
        register_fn(&mut registrar);
        Ok(registrar.into_plugins())
    }

    /// Release the context, unmapping the library. Idempotent; safe to call
    /// even if `resolve_plugins` was never invoked.
    pub fn release(&self) {
        let mut guard = self.library.lock().unwrap();
        if guard.take().is_some() {
            tracing::debug!(bundle = %self.path.display(), "Released bundle context");
        }
    }

    /// Whether the context has been released.
    pub fn is_released(&self) -> bool {
        self.library.lock().unwrap().is_none()
    }

    /// A context with no backing library, for exercising lifecycle paths
    /// without a compiled bundle.
    #[cfg(test)]
    pub(crate) fn detached(path: PathBuf) -> Self {
        Self {
            path,
            library: Mutex::new(None),
        }
    }
}

impl std::fmt::Debug for BundleContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundleContext")
            .field("path", &self.path)
            .field("released", &self.is_released())
            .finish()
    }
}
