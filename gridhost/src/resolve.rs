//! Getter resolution.
//!
//! A [`Resolver`] computes getter values against one plugin stack. Each
//! resolved name is memoized in a [`ResolutionCache`] for the rest of the
//! pass, so re-reads return the identical value. Dependencies are resolved
//! depth-first; re-entering a name that is still being resolved is a cycle.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};

use log::trace;

use crate::error::{CapabilityKind, EngineError, Result};
use crate::plugin::Capability;
use crate::stack::{PluginEntry, PluginStack, Slot};
use crate::value::Value;

/// Values resolved during the current pass.
#[derive(Debug, Default)]
pub(crate) struct ResolutionCache {
    values: HashMap<String, Value>,
}

impl ResolutionCache {
    pub(crate) fn clear(&mut self) {
        if !self.values.is_empty() {
            trace!("invalidating {} cached getter(s)", self.values.len());
        }
        self.values.clear();
    }
}

/// What a getter, chained getter or template sees while it runs.
pub struct GetterContext<'a> {
    name: &'a str,
    entry: &'a PluginEntry,
    dependencies: Vec<(&'a str, Option<Value>)>,
    previous: Option<Value>,
}

impl<'a> GetterContext<'a> {
    /// Name being computed.
    pub fn name(&self) -> &str {
        self.name
    }

    /// Name of the plugin contributing the computation.
    pub fn plugin(&self) -> &str {
        &self.entry.name
    }

    /// Resolved value of a declared dependency. `None` if no plugin provides
    /// it, or if it was not declared.
    pub fn get(&self, dependency: &str) -> Option<&Value> {
        self.dependencies
            .iter()
            .find(|(name, _)| *name == dependency)
            .and_then(|(_, value)| value.as_ref())
    }

    /// Like [`GetterContext::get`], but an absent dependency is an error.
    pub fn require(&self, dependency: &str) -> Result<&Value> {
        self.get(dependency)
            .ok_or_else(|| EngineError::unresolved(CapabilityKind::Getter, dependency))
    }

    pub fn require_as<T: Any>(&self, dependency: &str) -> Result<&T> {
        self.require(dependency)?.expect::<T>(dependency)
    }

    /// Working value of a field owned by the contributing plugin.
    pub fn field(&self, field: &str) -> Result<&Value> {
        Ok(self.entry.field(field)?.working())
    }

    pub fn field_as<T: Any>(&self, field: &str) -> Result<&T> {
        self.field(field)?.expect::<T>(field)
    }

    /// For a chained getter, the value of the next lower contributor of the
    /// same name. `None` when nothing lies below.
    pub fn previous(&self) -> Option<&Value> {
        self.previous.as_ref()
    }

    /// Like [`GetterContext::previous`], but an empty base is an error.
    pub fn require_previous(&self) -> Result<&Value> {
        self.previous
            .as_ref()
            .ok_or_else(|| EngineError::unresolved(CapabilityKind::Getter, self.name))
    }

    pub fn previous_as<T: Any>(&self) -> Result<&T> {
        self.require_previous()?.expect::<T>(self.name)
    }
}

/// Resolves getters against a stack for one pass.
pub(crate) struct Resolver<'a> {
    stack: &'a PluginStack,
    cache: &'a mut ResolutionCache,
    in_progress: Vec<String>,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(stack: &'a PluginStack, cache: &'a mut ResolutionCache) -> Self {
        Self {
            stack,
            cache,
            in_progress: Vec::new(),
        }
    }

    /// Resolve a getter. `Ok(None)` means no plugin provides it.
    pub(crate) fn resolve(&mut self, name: &str) -> Result<Option<Value>> {
        if let Some(value) = self.cache.values.get(name) {
            return Ok(Some(value.clone()));
        }

        if let Some(start) = self.in_progress.iter().position(|n| n == name) {
            let mut path = self.in_progress[start..].to_vec();
            path.push(name.to_string());
            return Err(EngineError::CyclicDependency { path });
        }

        let slots = self.stack.slots(CapabilityKind::Getter, name);
        if slots.is_empty() {
            trace!("getter '{}' is not provided", name);
            return Ok(None);
        }

        self.in_progress.push(name.to_string());
        let result = self.evaluate(name, &slots, slots.len() - 1);
        self.in_progress.pop();

        let value = result?;
        trace!("resolved getter '{}' -> {:?}", name, value);
        self.cache.values.insert(name.to_string(), value.clone());
        Ok(Some(value))
    }

    /// Resolve every getter name in the stack.
    pub(crate) fn resolve_all(&mut self) -> Result<BTreeMap<String, Value>> {
        let mut values = BTreeMap::new();
        for name in self.stack.names(CapabilityKind::Getter) {
            if let Some(value) = self.resolve(&name)? {
                values.insert(name, value);
            }
        }
        Ok(values)
    }

    /// Render the closest template of `name`. Templates are not memoized.
    pub(crate) fn render(&mut self, name: &str) -> Result<Option<Value>> {
        let Some(slot) = self.stack.top(CapabilityKind::Template, name) else {
            return Ok(None);
        };
        self.compute(name, slot, None).map(Some)
    }

    /// Evaluate the contributor at `slots[index]`, continuing below it for a
    /// chained getter.
    fn evaluate(&mut self, name: &str, slots: &[Slot], index: usize) -> Result<Value> {
        let stack = self.stack;
        let slot = slots[index];
        let previous = match stack.capability(slot) {
            Capability::ChainedGetter(_) if index > 0 => {
                Some(self.evaluate(name, slots, index - 1)?)
            }
            _ => None,
        };
        self.compute(name, slot, previous)
    }

    fn compute(&mut self, name: &str, slot: Slot, previous: Option<Value>) -> Result<Value> {
        let stack = self.stack;
        let entry = stack.entry(slot.entry);
        let capability = stack.capability(slot);
        let descriptor = capability
            .computation()
            .ok_or_else(|| EngineError::unresolved(capability.kind(), name))?;

        let mut dependencies = Vec::with_capacity(descriptor.dependencies.len());
        for dependency in &descriptor.dependencies {
            let value = self.resolve(dependency)?;
            dependencies.push((dependency.as_str(), value));
        }

        let cx = GetterContext {
            name,
            entry,
            dependencies,
            previous,
        };
        (descriptor.compute)(&cx)
    }
}
