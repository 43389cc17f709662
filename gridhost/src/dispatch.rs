//! Action dispatch and batch commits.
//!
//! Actions run against the host state directly. Reducer results are threaded
//! through the owning fields as pending values and the resolution cache is
//! dropped after every reducer call, so each action in a batch observes the
//! effects of the ones before it. Nothing is published until the outermost
//! batch commits.

use std::any::Any;
use std::sync::Arc;

use log::{debug, trace};

use crate::error::{BoxError, CapabilityKind, EngineError, Result};
use crate::host::{HostState, PluginHost};
use crate::plugin::{Capability, PluginId};
use crate::resolve::Resolver;
use crate::value::Value;

// =============================================================================
// ActionContext
// =============================================================================

/// What an action sees while it runs.
///
/// Field access is scoped to the plugin that contributed the action.
pub struct ActionContext<'a> {
    state: &'a mut HostState,
    owner: usize,
    action: &'a str,
}

impl<'a> ActionContext<'a> {
    /// Name of the running action.
    pub fn action(&self) -> &str {
        self.action
    }

    /// Name of the plugin that contributed the action.
    pub fn plugin(&self) -> &str {
        &self.state.stack.entry(self.owner).name
    }

    /// Resolve a getter against the state threaded so far in this batch.
    pub fn getter(&mut self, name: &str) -> Result<Option<Value>> {
        Resolver::new(&self.state.stack, &mut self.state.cache).resolve(name)
    }

    pub fn require(&mut self, name: &str) -> Result<Value> {
        self.getter(name)?
            .ok_or_else(|| EngineError::unresolved(CapabilityKind::Getter, name))
    }

    pub fn require_as<T: Any + Send + Sync>(&mut self, name: &str) -> Result<Arc<T>> {
        self.require(name)?.expect_arc::<T>(name)
    }

    /// Working value of one of the owning plugin's fields.
    pub fn field(&self, field: &str) -> Result<Value> {
        Ok(self
            .state
            .stack
            .entry(self.owner)
            .field(field)?
            .working()
            .clone())
    }

    /// Compute the next value of `field` with `reducer` and thread it through
    /// the batch. The reducer receives the working value and the payload.
    ///
    /// A failing reducer is reported as [`EngineError::Reducer`].
    pub fn apply_field_reducer<F>(&mut self, field: &str, payload: &Value, reducer: F) -> Result<Value>
    where
        F: FnOnce(&Value, &Value) -> std::result::Result<Value, BoxError>,
    {
        let entry = self.state.stack.entry_mut(self.owner);
        let plugin = entry.name.clone();
        let next = entry
            .field_mut(field)?
            .apply(reducer, payload)
            .map_err(|source| EngineError::Reducer {
                plugin: plugin.clone(),
                field: field.to_string(),
                source,
            })?;

        trace!("'{}' threaded field '{}.{}'", self.action, plugin, field);
        self.state.cache.clear();
        Ok(next)
    }

    /// Typed form of [`ActionContext::apply_field_reducer`] for infallible
    /// transformations of a field of type `T` with a payload of type `P`.
    pub fn apply_typed_reducer<T, P, F>(&mut self, field: &str, payload: &Value, reducer: F) -> Result<Arc<T>>
    where
        T: Any + Send + Sync,
        P: Any,
        F: FnOnce(&T, &P) -> T,
    {
        let action = self.action;
        payload.expect::<P>(action)?;
        self.field(field)?.expect::<T>(field)?;

        let next = self.apply_field_reducer(field, payload, |previous, payload| {
            let previous = previous.expect::<T>(field)?;
            let payload = payload.expect::<P>(action)?;
            Ok(Value::new(reducer(previous, payload)))
        })?;
        next.expect_arc::<T>(field)
    }

    /// Run another action inside the same batch.
    pub fn dispatch(&mut self, action: &str, payload: &Value) -> Result<()> {
        run_action(self.state, action, payload)
    }
}

pub(crate) fn run_action(state: &mut HostState, name: &str, payload: &Value) -> Result<()> {
    let slot = state
        .stack
        .top(CapabilityKind::Action, name)
        .ok_or_else(|| EngineError::unresolved(CapabilityKind::Action, name))?;
    let run = match state.stack.capability(slot) {
        Capability::Action(descriptor) => Arc::clone(&descriptor.run),
        _ => return Err(EngineError::unresolved(CapabilityKind::Action, name)),
    };

    trace!(
        "dispatching '{}' to plugin '{}'",
        name,
        state.stack.entry(slot.entry).name
    );

    if let Some(start) = state.actions.iter().position(|a| a == name) {
        let mut path = state.actions[start..].to_vec();
        path.push(name.to_string());
        return Err(EngineError::CyclicAction { path });
    }

    state.actions.push(name.to_string());
    let mut cx = ActionContext {
        state: &mut *state,
        owner: slot.entry,
        action: name,
    };
    let result = run(&mut cx, payload);
    state.actions.pop();

    state.cache.clear();
    result
}

// =============================================================================
// Commit
// =============================================================================

/// A field whose value changed in a committed batch.
#[derive(Debug, Clone)]
pub struct FieldChange {
    pub plugin: PluginId,
    pub plugin_name: String,
    pub field: String,
    pub value: Value,
}

/// Outcome of a committed batch.
///
/// Lists every field that fired its change callback, in stack order, so the
/// caller can feed values back as controlled props.
#[derive(Debug, Clone, Default)]
pub struct CommitReport {
    pub changes: Vec<FieldChange>,
}

impl CommitReport {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Committed value of `field` of the plugin named `plugin_name`.
    pub fn get(&self, plugin_name: &str, field: &str) -> Option<&Value> {
        self.changes
            .iter()
            .find(|c| c.plugin_name == plugin_name && c.field == field)
            .map(|c| &c.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldChange> {
        self.changes.iter()
    }
}

pub(crate) fn commit(state: &mut HostState) -> CommitReport {
    let mut changes = Vec::new();
    let mut callbacks = Vec::new();

    for entry in state.stack.entries_mut() {
        for field in entry.fields.iter_mut() {
            let Some(committed) = field.commit() else {
                continue;
            };
            if let Some(callback) = committed.on_change {
                callbacks.push((callback, committed.value.clone()));
            }
            changes.push(FieldChange {
                plugin: entry.id,
                plugin_name: entry.name.clone(),
                field: field.name().to_string(),
                value: committed.value,
            });
        }
    }

    state.cache.clear();
    debug!("committed batch with {} change(s)", changes.len());

    // State is settled before anyone is notified.
    for (callback, value) in callbacks {
        callback(&value);
    }

    CommitReport { changes }
}

pub(crate) fn rollback(state: &mut HostState) {
    for entry in state.stack.entries_mut() {
        for field in entry.fields.iter_mut() {
            field.rollback();
        }
    }
    state.cache.clear();
}

// =============================================================================
// Batch
// =============================================================================

/// Handle given to the closure of [`PluginHost::batch`].
pub struct Batch<'a> {
    host: &'a mut PluginHost,
}

impl<'a> Batch<'a> {
    pub(crate) fn new(host: &'a mut PluginHost) -> Self {
        Self { host }
    }

    /// Dispatch an action inside the batch.
    pub fn dispatch(&mut self, action: &str, payload: Value) -> Result<()> {
        self.host.dispatch(action, payload)
    }

    /// Resolve a getter against the state threaded so far.
    pub fn resolve(&mut self, name: &str) -> Result<Option<Value>> {
        self.host.resolve(name)
    }
}
