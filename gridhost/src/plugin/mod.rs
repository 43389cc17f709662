//! Plugin declarations: ids, capabilities, definitions and the registration
//! catalog.

mod capability;
mod definition;
mod id;
mod registration;

pub use capability::{ActionDescriptor, ActionFn, Capability, GetterDescriptor, GetterFn};
pub use definition::{Plugin, PluginDefinition, PluginDependency};
pub use id::PluginId;
pub use registration::{PluginRegistration, find_registration, registered_plugins};
