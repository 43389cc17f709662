//! Catalog of stock plugins, collected at link time with `inventory`.

use super::definition::PluginDefinition;

/// A plugin that can be mounted by name with its default props.
pub struct PluginRegistration {
    pub name: &'static str,
    /// Builds the definition of a freshly constructed plugin.
    pub factory: fn() -> PluginDefinition,
}

impl PluginRegistration {
    pub const fn new(name: &'static str, factory: fn() -> PluginDefinition) -> Self {
        Self { name, factory }
    }
}

inventory::collect!(PluginRegistration);

/// Every plugin submitted to the catalog, in no particular order.
pub fn registered_plugins() -> impl Iterator<Item = &'static PluginRegistration> {
    inventory::iter::<PluginRegistration>()
}

pub fn find_registration(name: &str) -> Option<&'static PluginRegistration> {
    registered_plugins().find(|registration| registration.name == name)
}
