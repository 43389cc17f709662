//! Host configuration.

use serde::{Deserialize, Serialize};

/// What the host does when two non-chained capabilities share a name.
///
/// The later plugin always wins resolution; the policy only decides how
/// loudly that is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Accept silently.
    Allow,
    /// Log a warning on register.
    #[default]
    Warn,
    /// Refuse the register with [`EngineError::NameCollision`](crate::EngineError::NameCollision).
    Deny,
}

/// Per-host configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Name used in diagnostics, e.g. to tell several grids apart.
    pub name: String,

    pub collision_policy: CollisionPolicy,

    /// Check plugin dependencies on every mount, update and unmount.
    pub validate_on_change: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            name: "grid".to_string(),
            collision_policy: CollisionPolicy::default(),
            validate_on_change: true,
        }
    }
}

impl HostConfig {
    /// Create a new config with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    /// Skip dependency checks on stack changes. [`PluginHost::validate`](crate::PluginHost::validate)
    /// still runs them on demand.
    pub fn skip_validation(mut self) -> Self {
        self.validate_on_change = false;
        self
    }
}
