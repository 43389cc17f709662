//! Engine error taxonomy.

use std::fmt;

use thiserror::Error;

use crate::plugin::PluginId;

/// Boxed error produced by a transformation function.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Namespace a capability name lives in.
///
/// Getters and chained getters share the `Getter` namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CapabilityKind {
    Getter,
    Action,
    Template,
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilityKind::Getter => write!(f, "getter"),
            CapabilityKind::Action => write!(f, "action"),
            CapabilityKind::Template => write!(f, "template"),
        }
    }
}

/// Errors raised by the plugin host.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A getter depends on itself, directly or transitively.
    ///
    /// The path starts and ends with the same name.
    #[error("cyclic getter dependency: {}", .path.join(" -> "))]
    CyclicDependency { path: Vec<String> },

    /// No mounted plugin contributes the requested name.
    #[error("no plugin provides {kind} '{name}'")]
    UnresolvedCapability { kind: CapabilityKind, name: String },

    /// A transformation function failed while computing the next field value.
    #[error("reducer for field '{field}' of plugin '{plugin}' failed: {source}")]
    Reducer {
        plugin: String,
        field: String,
        #[source]
        source: BoxError,
    },

    /// A value did not have the type its consumer expected.
    #[error("'{name}' holds a value of type {found}, expected {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("plugin '{plugin}' owns no field named '{field}'")]
    UnknownField { plugin: String, field: String },

    #[error("no plugin named '{0}' is registered")]
    UnknownPlugin(String),

    #[error("plugin {0} is not mounted")]
    PluginNotMounted(PluginId),

    #[error("the '{plugin}' plugin requires '{dependency}' to be defined before it")]
    MissingPluginDependency { plugin: String, dependency: String },

    /// An optional dependency is mounted, but above its dependent.
    #[error("the '{plugin}' plugin must be defined after its optional dependency '{dependency}'")]
    MisorderedPluginDependency { plugin: String, dependency: String },

    /// Raised under [`CollisionPolicy::Deny`](crate::CollisionPolicy::Deny).
    #[error("{kind} '{name}' of plugin '{plugin}' collides with the one of plugin '{other}'")]
    NameCollision {
        kind: CapabilityKind,
        name: String,
        plugin: String,
        other: String,
    },

    /// An action dispatches itself, directly or through other actions.
    ///
    /// The path starts and ends with the same name.
    #[error("cyclic action dispatch: {}", .path.join(" -> "))]
    CyclicAction { path: Vec<String> },

    #[error("no batch is open")]
    NoOpenBatch,

    /// An earlier dispatch in the open batch failed. The batch publishes
    /// nothing and refuses further actions until it is closed.
    #[error("the open batch was aborted by an earlier failure")]
    BatchAborted,
}

impl EngineError {
    pub(crate) fn unresolved(kind: CapabilityKind, name: &str) -> Self {
        Self::UnresolvedCapability {
            kind,
            name: name.to_string(),
        }
    }

    /// True for errors that only a corrected plugin configuration can fix.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::CyclicDependency { .. }
                | Self::CyclicAction { .. }
                | Self::MissingPluginDependency { .. }
                | Self::MisorderedPluginDependency { .. }
                | Self::NameCollision { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
