//! The plugin host: one stack, one resolution cache, one batch at a time.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use log::{debug, trace, warn};

use crate::config::{CollisionPolicy, HostConfig};
use crate::dispatch::{self, Batch, CommitReport};
use crate::error::{CapabilityKind, EngineError, Result};
use crate::plugin::{Plugin, PluginDefinition, PluginId, find_registration};
use crate::resolve::{ResolutionCache, Resolver};
use crate::stack::{PluginStack, StackLint};
use crate::state::FieldMode;
use crate::value::Value;

/// Mutable state shared by resolution and dispatch.
#[derive(Debug, Default)]
pub(crate) struct HostState {
    pub stack: PluginStack,
    pub cache: ResolutionCache,
    pub batch_depth: usize,
    /// Set when a dispatch fails inside an open batch.
    pub aborted: bool,
    /// Actions currently running, outermost first.
    pub actions: Vec<String>,
}

/// Every getter of the stack, resolved in one pass.
#[derive(Debug, Clone, Default)]
pub struct ComputedState {
    values: BTreeMap<String, Value>,
}

impl ComputedState {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get_as<T: Any>(&self, name: &str) -> Option<&T> {
        self.values.get(name).and_then(Value::get::<T>)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Hosts a stack of plugins and resolves their computed state.
///
/// # Example
///
/// ```ignore
/// let mut host = PluginHost::default();
/// host.mount(&GridCore::new(rows, columns))?;
/// host.mount(&FilteringState::new().default_filters(vec![]))?;
/// host.mount(&LocalFiltering)?;
///
/// host.batch(|tx| {
///     tx.dispatch("setColumnFilter", Value::new(ColumnFilterChange::set("city", "par")))
/// })?;
/// let rows = host.require("rows")?;
/// ```
#[derive(Debug, Default)]
pub struct PluginHost {
    config: HostConfig,
    state: HostState,
}

impl PluginHost {
    pub fn new(config: HostConfig) -> Self {
        Self {
            config,
            state: HostState::default(),
        }
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn stack(&self) -> &PluginStack {
        &self.state.stack
    }

    // =========================================================================
    // Stack management
    // =========================================================================

    /// Mount a plugin on top of the stack.
    pub fn mount<P: Plugin + ?Sized>(&mut self, plugin: &P) -> Result<PluginId> {
        let id = PluginId::new();
        self.register_at(id, plugin.definition(), None)?;
        Ok(id)
    }

    /// Mount a plugin at a stack position (clamped to the stack size).
    pub fn mount_at<P: Plugin + ?Sized>(&mut self, position: usize, plugin: &P) -> Result<PluginId> {
        let id = PluginId::new();
        self.register_at(id, plugin.definition(), Some(position))?;
        Ok(id)
    }

    /// Mount a plugin from the registration catalog with its default props.
    pub fn mount_registered(&mut self, name: &str) -> Result<PluginId> {
        let registration =
            find_registration(name).ok_or_else(|| EngineError::UnknownPlugin(name.to_string()))?;
        self.mount(&(registration.factory)())
    }

    /// Re-register a mounted plugin from its current props.
    pub fn update<P: Plugin + ?Sized>(&mut self, id: PluginId, plugin: &P) -> Result<()> {
        if !self.state.stack.contains(id) {
            return Err(EngineError::PluginNotMounted(id));
        }
        self.register(id, plugin.definition())
    }

    pub fn unmount(&mut self, id: PluginId) -> Result<()> {
        self.unregister(id)
    }

    /// Insert or update the descriptors of a plugin.
    ///
    /// An unknown id is appended to the stack; a known one keeps its position.
    pub fn register(&mut self, id: PluginId, definition: PluginDefinition) -> Result<()> {
        self.register_at(id, definition, None)
    }

    /// Remove a plugin. Names it contributed resolve from the next lower
    /// contributor from now on, or become absent.
    pub fn unregister(&mut self, id: PluginId) -> Result<()> {
        let mut candidate = self.state.stack.clone();
        let entry = candidate
            .unregister(id)
            .ok_or(EngineError::PluginNotMounted(id))?;
        if self.config.validate_on_change {
            candidate.check_dependencies()?;
        }

        let discarded: Vec<&str> = entry
            .fields
            .iter()
            .filter(|field| field.is_pending())
            .map(|field| field.name())
            .collect();
        if !discarded.is_empty() {
            warn!(
                "unmounting plugin '{}' discards pending batch values of {:?}",
                entry.name, discarded
            );
        }

        self.state.stack = candidate;
        self.state.cache.clear();
        debug!("unmounted plugin '{}' ({})", entry.name, id.short());
        Ok(())
    }

    fn register_at(
        &mut self,
        id: PluginId,
        definition: PluginDefinition,
        position: Option<usize>,
    ) -> Result<()> {
        let name = definition.name().to_string();
        let mut candidate = self.state.stack.clone();
        candidate.register(id, definition, position);

        if self.config.validate_on_change {
            candidate.check_dependencies()?;
        }
        self.check_collisions(&candidate, id)?;

        self.state.stack = candidate;
        self.state.cache.clear();
        debug!(
            "registered plugin '{}' ({}) at position {:?}",
            name,
            id.short(),
            self.state.stack.position(id)
        );
        Ok(())
    }

    fn check_collisions(&self, candidate: &PluginStack, id: PluginId) -> Result<()> {
        if self.config.collision_policy == CollisionPolicy::Allow {
            return Ok(());
        }

        let involved = candidate
            .collisions()
            .into_iter()
            .filter(|lint| lint.winner_id == id || lint.shadowed_id == id);
        for lint in involved {
            match self.config.collision_policy {
                CollisionPolicy::Deny => {
                    return Err(EngineError::NameCollision {
                        kind: lint.kind,
                        name: lint.name,
                        plugin: lint.winner,
                        other: lint.shadowed,
                    });
                }
                CollisionPolicy::Warn => warn!("{}: {}", self.config.name, lint),
                CollisionPolicy::Allow => {}
            }
        }
        Ok(())
    }

    /// Check plugin dependencies of the whole stack.
    pub fn validate(&self) -> Result<()> {
        self.state.stack.check_dependencies()
    }

    /// Non-chained name collisions in the current stack.
    pub fn lint(&self) -> Vec<StackLint> {
        self.state.stack.collisions()
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Resolve a getter. `Ok(None)` means no mounted plugin provides it.
    pub fn resolve(&mut self, name: &str) -> Result<Option<Value>> {
        Resolver::new(&self.state.stack, &mut self.state.cache).resolve(name)
    }

    /// Resolve a getter that must be provided.
    pub fn require(&mut self, name: &str) -> Result<Value> {
        self.resolve(name)?
            .ok_or_else(|| EngineError::unresolved(CapabilityKind::Getter, name))
    }

    /// Resolve a getter as `T`.
    pub fn resolve_as<T: Any + Send + Sync>(&mut self, name: &str) -> Result<Option<Arc<T>>> {
        self.resolve(name)?
            .map(|value| value.expect_arc::<T>(name))
            .transpose()
    }

    /// Resolve every getter in one pass.
    pub fn snapshot(&mut self) -> Result<ComputedState> {
        let values = Resolver::new(&self.state.stack, &mut self.state.cache).resolve_all()?;
        Ok(ComputedState { values })
    }

    /// Render the closest template of `name`.
    pub fn render_template(&mut self, name: &str) -> Result<Option<Value>> {
        Resolver::new(&self.state.stack, &mut self.state.cache).render(name)
    }

    /// Drop every memoized getter value.
    ///
    /// Needed only when data captured by getters changes outside the host.
    pub fn invalidate(&mut self) {
        self.state.cache.clear();
    }

    /// Effective value of a plugin's field.
    pub fn field_value(&self, id: PluginId, field: &str) -> Result<Value> {
        let index = self
            .state
            .stack
            .position(id)
            .ok_or(EngineError::PluginNotMounted(id))?;
        Ok(self.state.stack.entry(index).field(field)?.effective().clone())
    }

    pub fn field_mode(&self, id: PluginId, field: &str) -> Result<FieldMode> {
        let index = self
            .state
            .stack
            .position(id)
            .ok_or(EngineError::PluginNotMounted(id))?;
        Ok(self.state.stack.entry(index).field(field)?.mode())
    }

    // =========================================================================
    // Batching
    // =========================================================================

    pub fn in_batch(&self) -> bool {
        self.state.batch_depth > 0
    }

    /// True if some field holds a value threaded by the open batch.
    pub fn has_pending_changes(&self) -> bool {
        self.state
            .stack
            .entries()
            .iter()
            .any(|entry| entry.fields.iter().any(|field| field.is_pending()))
    }

    /// Open a batch. Batches nest; only the outermost commit publishes.
    pub fn begin_batch(&mut self) {
        if self.state.batch_depth == 0 {
            trace!("batch opened");
        }
        self.state.batch_depth += 1;
    }

    /// Close a batch. Closing the outermost batch settles every threaded
    /// field and fires change callbacks, once per changed field.
    ///
    /// If a dispatch failed while the batch was open, closing the outermost
    /// batch publishes nothing and returns [`EngineError::BatchAborted`].
    pub fn commit_batch(&mut self) -> Result<CommitReport> {
        match self.state.batch_depth {
            0 => Err(EngineError::NoOpenBatch),
            1 => {
                self.state.batch_depth = 0;
                if std::mem::take(&mut self.state.aborted) {
                    dispatch::rollback(&mut self.state);
                    debug!("aborted batch closed without publishing");
                    return Err(EngineError::BatchAborted);
                }
                Ok(dispatch::commit(&mut self.state))
            }
            _ => {
                self.state.batch_depth -= 1;
                Ok(CommitReport::default())
            }
        }
    }

    /// Close the innermost batch, discarding everything threaded so far.
    ///
    /// Enclosing batches stay open but are aborted: they refuse further
    /// actions and publish nothing. Does nothing outside a batch.
    pub fn rollback_batch(&mut self) {
        match self.state.batch_depth {
            0 => {}
            1 => {
                self.state.batch_depth = 0;
                self.state.aborted = false;
                dispatch::rollback(&mut self.state);
                debug!("batch rolled back");
            }
            _ => {
                self.state.batch_depth -= 1;
                self.abort_batch();
            }
        }
    }

    /// True if a failure aborted the open batch.
    pub fn is_batch_aborted(&self) -> bool {
        self.state.aborted
    }

    fn abort_batch(&mut self) {
        if !self.state.aborted {
            debug!("batch aborted at depth {}", self.state.batch_depth);
        }
        self.state.aborted = true;
        dispatch::rollback(&mut self.state);
    }

    /// Run an action.
    ///
    /// Outside a batch the action forms its own batch. Inside one, a failure
    /// discards everything threaded so far and aborts the batch: it stays
    /// open until closed, but later dispatches fail with
    /// [`EngineError::BatchAborted`] and it publishes nothing.
    pub fn dispatch(&mut self, action: &str, payload: Value) -> Result<()> {
        if self.state.aborted {
            return Err(EngineError::BatchAborted);
        }

        let implicit = !self.in_batch();
        if implicit {
            self.begin_batch();
        }

        if let Err(err) = dispatch::run_action(&mut self.state, action, &payload) {
            if implicit {
                self.rollback_batch();
            } else {
                self.abort_batch();
            }
            return Err(err);
        }

        if implicit {
            self.commit_batch()?;
        }
        Ok(())
    }

    /// Run `f` inside one batch and commit it.
    ///
    /// If `f` fails, or a dispatch inside it failed, the batch is rolled back
    /// and nothing is published.
    pub fn batch<F>(&mut self, f: F) -> Result<CommitReport>
    where
        F: FnOnce(&mut Batch<'_>) -> Result<()>,
    {
        self.begin_batch();
        let result = f(&mut Batch::new(self));
        match result {
            // An ignored dispatch failure still aborts the batch.
            Ok(()) => self.commit_batch(),
            Err(err) => {
                self.rollback_batch();
                Err(err)
            }
        }
    }
}
