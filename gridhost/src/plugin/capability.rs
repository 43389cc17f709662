//! Capability descriptors contributed by plugins.

use std::fmt;
use std::sync::Arc;

use crate::dispatch::ActionContext;
use crate::error::{CapabilityKind, Result};
use crate::resolve::GetterContext;
use crate::value::Value;

/// Computes a getter or template value from its resolved dependencies.
pub type GetterFn = Arc<dyn Fn(&GetterContext<'_>) -> Result<Value> + Send + Sync>;

/// Runs an action with its payload.
pub type ActionFn = Arc<dyn Fn(&mut ActionContext<'_>, &Value) -> Result<()> + Send + Sync>;

/// A named computation with declared dependencies.
///
/// Used for getters, chained getters and templates.
#[derive(Clone)]
pub struct GetterDescriptor {
    pub(crate) name: String,
    pub(crate) dependencies: Vec<String>,
    pub(crate) compute: GetterFn,
}

impl GetterDescriptor {
    pub fn new<F>(name: impl Into<String>, dependencies: &[&str], compute: F) -> Self
    where
        F: Fn(&GetterContext<'_>) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
            compute: Arc::new(compute),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }
}

impl fmt::Debug for GetterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GetterDescriptor")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

/// A named state-mutating operation.
#[derive(Clone)]
pub struct ActionDescriptor {
    pub(crate) name: String,
    pub(crate) run: ActionFn,
}

impl ActionDescriptor {
    pub fn new<F>(name: impl Into<String>, run: F) -> Self
    where
        F: Fn(&mut ActionContext<'_>, &Value) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            run: Arc::new(run),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for ActionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDescriptor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// One capability contributed to the stack.
#[derive(Debug, Clone)]
pub enum Capability {
    /// Replaces any lower contributor of the same name.
    Getter(GetterDescriptor),
    /// Wraps the value of the next lower contributor of the same name.
    ChainedGetter(GetterDescriptor),
    /// Only the closest contributor responds.
    Action(ActionDescriptor),
    /// A render slot. Shadowed like a getter.
    Template(GetterDescriptor),
}

impl Capability {
    pub fn kind(&self) -> CapabilityKind {
        match self {
            Capability::Getter(_) | Capability::ChainedGetter(_) => CapabilityKind::Getter,
            Capability::Action(_) => CapabilityKind::Action,
            Capability::Template(_) => CapabilityKind::Template,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Capability::Getter(d) | Capability::ChainedGetter(d) | Capability::Template(d) => {
                &d.name
            }
            Capability::Action(d) => &d.name,
        }
    }

    pub fn is_chained(&self) -> bool {
        matches!(self, Capability::ChainedGetter(_))
    }

    /// The computation behind a getter, chained getter or template.
    pub(crate) fn computation(&self) -> Option<&GetterDescriptor> {
        match self {
            Capability::Getter(d) | Capability::ChainedGetter(d) | Capability::Template(d) => {
                Some(d)
            }
            Capability::Action(_) => None,
        }
    }

    pub(crate) fn matches(&self, kind: CapabilityKind, name: &str) -> bool {
        self.kind() == kind && self.name() == name
    }
}
