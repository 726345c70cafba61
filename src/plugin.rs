//! Plugin discovery: layering codec bundles onto a registry.
//!
//! A [`RecordPlugin`] contributes a set of codec registrations — typically
//! one format under several media types. [`load_plugins`] applies a batch
//! of plugins to a shared root registry without mutating it: each plugin
//! registers into its own scope, and the scopes are chained through the
//! registry fallback mechanism. Earlier plugins shadow later ones, and
//! every plugin shadows the root.
//!
//! A plugin that fails to register is skipped, logged, and reported; it
//! never takes the other plugins down with it.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::registry::RecordRegistry;

/// A bundle of codec registrations with a stable name.
pub trait RecordPlugin: Send + Sync {
    /// The plugin's name, used in logs and load reports.
    fn name(&self) -> &str;

    /// Registers the plugin's codecs into the given registry scope.
    ///
    /// # Errors
    ///
    /// Any error aborts this plugin's registrations; the loader skips
    /// the plugin and records the error in the [`PluginReport`].
    fn register(&self, registry: &mut RecordRegistry) -> Result<()>;
}

/// The outcome of a [`load_plugins`] run.
#[derive(Debug, Default)]
pub struct PluginReport {
    /// Names of the plugins whose registrations took effect, in the
    /// order they were given.
    pub loaded: Vec<String>,
    /// Plugins that failed to register, with the error each raised.
    pub skipped: Vec<(String, Error)>,
}

impl PluginReport {
    /// Returns `true` if every plugin loaded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Layers the plugins onto `root` and returns the resulting registry.
///
/// The root registry is never mutated. Each plugin gets its own scope,
/// and the scopes are chained so that lookups consult plugins in the
/// order given, then the root: when two plugins bind the same media
/// type, the one listed first wins.
///
/// Failed plugins are skipped with a warning; the returned registry
/// still carries every successful plugin. Inspect the [`PluginReport`]
/// to find out which plugins made it in.
#[must_use]
pub fn load_plugins(
    root: Arc<RecordRegistry>,
    plugins: &[Arc<dyn RecordPlugin>],
) -> (Arc<RecordRegistry>, PluginReport) {
    let mut report = PluginReport::default();
    let mut loaded = Vec::with_capacity(plugins.len());

    for plugin in plugins {
        let mut scope = RecordRegistry::new();
        match plugin.register(&mut scope) {
            Ok(()) => {
                loaded.push((plugin.name().to_string(), scope));
            }
            Err(error) => {
                tracing::warn!(plugin = plugin.name(), %error, "skipping plugin");
                report.skipped.push((plugin.name().to_string(), error));
            }
        }
    }

    // Chain back to front so the first plugin's scope ends up outermost.
    let mut chained = root;
    for (name, mut scope) in loaded.into_iter().rev() {
        scope.set_fallback(chained);
        chained = Arc::new(scope);
        report.loaded.push(name);
    }
    report.loaded.reverse();

    (chained, report)
}
