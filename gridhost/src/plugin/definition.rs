//! Plugin definitions and the `Plugin` trait.

use crate::dispatch::ActionContext;
use crate::error::Result;
use crate::resolve::GetterContext;
use crate::state::FieldBinding;
use crate::value::Value;

use super::capability::{ActionDescriptor, Capability, GetterDescriptor};

/// A plugin that must be mounted before the declaring one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginDependency {
    pub name: String,
    pub optional: bool,
}

/// Everything one plugin contributes to the stack: its owned fields, its
/// capabilities and the plugins it depends on.
///
/// # Example
///
/// ```ignore
/// let definition = PluginDefinition::new("Counter")
///     .field(FieldBinding::of::<i64>("count"))
///     .getter("count", &[], |cx| cx.field("count").cloned())
///     .action("increment", |cx, payload| {
///         cx.apply_typed_reducer("count", payload, |count: &i64, by: &i64| count + by)?;
///         Ok(())
///     });
/// ```
#[derive(Debug, Clone, Default)]
pub struct PluginDefinition {
    name: String,
    fields: Vec<FieldBinding>,
    capabilities: Vec<Capability>,
    dependencies: Vec<PluginDependency>,
}

impl PluginDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add an owned state field.
    pub fn field(mut self, binding: FieldBinding) -> Self {
        self.fields.push(binding);
        self
    }

    /// Add a getter that shadows any lower getter of the same name.
    pub fn getter<F>(self, name: impl Into<String>, dependencies: &[&str], compute: F) -> Self
    where
        F: Fn(&GetterContext<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.capability(Capability::Getter(GetterDescriptor::new(
            name,
            dependencies,
            compute,
        )))
    }

    /// Add a getter that wraps the value of the next lower getter of the same
    /// name, available through [`GetterContext::previous`].
    pub fn chained_getter<F>(
        self,
        name: impl Into<String>,
        dependencies: &[&str],
        compute: F,
    ) -> Self
    where
        F: Fn(&GetterContext<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.capability(Capability::ChainedGetter(GetterDescriptor::new(
            name,
            dependencies,
            compute,
        )))
    }

    pub fn action<F>(self, name: impl Into<String>, run: F) -> Self
    where
        F: Fn(&mut ActionContext<'_>, &Value) -> Result<()> + Send + Sync + 'static,
    {
        self.capability(Capability::Action(ActionDescriptor::new(name, run)))
    }

    pub fn template<F>(self, name: impl Into<String>, dependencies: &[&str], render: F) -> Self
    where
        F: Fn(&GetterContext<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        self.capability(Capability::Template(GetterDescriptor::new(
            name,
            dependencies,
            render,
        )))
    }

    pub fn capability(mut self, capability: Capability) -> Self {
        self.capabilities.push(capability);
        self
    }

    /// Require `name` to be mounted before this plugin.
    pub fn depends_on(mut self, name: impl Into<String>) -> Self {
        self.dependencies.push(PluginDependency {
            name: name.into(),
            optional: false,
        });
        self
    }

    /// Order this plugin after `name` when both are mounted, without
    /// requiring `name`.
    pub fn optionally_depends_on(mut self, name: impl Into<String>) -> Self {
        self.dependencies.push(PluginDependency {
            name: name.into(),
            optional: true,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldBinding] {
        &self.fields
    }

    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    pub fn dependencies(&self) -> &[PluginDependency] {
        &self.dependencies
    }

    pub(crate) fn into_parts(self) -> (String, Vec<FieldBinding>, Vec<Capability>, Vec<PluginDependency>) {
        (self.name, self.fields, self.capabilities, self.dependencies)
    }
}

/// Something that can be mounted into a [`PluginHost`](crate::PluginHost).
///
/// Implementors turn their current props into a [`PluginDefinition`]. The
/// host calls this on mount and on every update, so definitions are free to
/// change over the plugin's lifetime.
pub trait Plugin {
    fn definition(&self) -> PluginDefinition;
}

impl Plugin for PluginDefinition {
    fn definition(&self) -> PluginDefinition {
        self.clone()
    }
}
