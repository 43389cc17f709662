//! The ordered plugin stack.
//!
//! Entries are kept in declaration order, lowest first. Name lookups scan
//! from the top: a plain capability stops at the first match, a chained
//! getter continues below itself.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{CapabilityKind, EngineError, Result};
use crate::plugin::{Capability, PluginDefinition, PluginDependency, PluginId};
use crate::state::FieldState;

/// A mounted plugin instance: its identity, its current capabilities and the
/// state of the fields it owns.
#[derive(Debug, Clone)]
pub(crate) struct PluginEntry {
    pub id: PluginId,
    pub name: String,
    pub capabilities: Vec<Capability>,
    pub dependencies: Vec<PluginDependency>,
    pub fields: Vec<FieldState>,
}

impl PluginEntry {
    fn new(id: PluginId, definition: PluginDefinition) -> Self {
        let (name, bindings, capabilities, dependencies) = definition.into_parts();
        Self {
            id,
            name,
            capabilities,
            dependencies,
            fields: bindings.into_iter().map(FieldState::new).collect(),
        }
    }

    /// Replace capabilities and rebind fields, keeping the state of fields
    /// that are still declared.
    fn update(&mut self, definition: PluginDefinition) {
        let (name, bindings, capabilities, dependencies) = definition.into_parts();
        let mut previous = std::mem::take(&mut self.fields);

        self.fields = bindings
            .into_iter()
            .map(|binding| {
                match previous.iter().position(|f| f.name() == binding.name()) {
                    Some(index) => {
                        let mut field = previous.swap_remove(index);
                        field.rebind(binding);
                        field
                    }
                    None => FieldState::new(binding),
                }
            })
            .collect();
        self.name = name;
        self.capabilities = capabilities;
        self.dependencies = dependencies;
    }

    pub(crate) fn field(&self, name: &str) -> Result<&FieldState> {
        self.fields
            .iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| self.unknown_field(name))
    }

    pub(crate) fn field_mut(&mut self, name: &str) -> Result<&mut FieldState> {
        match self.fields.iter().position(|f| f.name() == name) {
            Some(index) => Ok(&mut self.fields[index]),
            None => Err(self.unknown_field(name)),
        }
    }

    fn unknown_field(&self, name: &str) -> EngineError {
        EngineError::UnknownField {
            plugin: self.name.clone(),
            field: name.to_string(),
        }
    }
}

/// Location of one capability in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Slot {
    pub entry: usize,
    pub capability: usize,
}

/// A same-name collision between two non-chained capabilities.
///
/// The later entry wins; the earlier one is never consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackLint {
    pub kind: CapabilityKind,
    pub name: String,
    pub winner: String,
    pub winner_id: PluginId,
    pub shadowed: String,
    pub shadowed_id: PluginId,
}

impl fmt::Display for StackLint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} '{}' of plugin '{}' shadows the one of plugin '{}'",
            self.kind, self.name, self.winner, self.shadowed
        )
    }
}

/// Ordered collection of mounted plugins.
#[derive(Debug, Clone, Default)]
pub struct PluginStack {
    entries: Vec<PluginEntry>,
}

impl PluginStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stack position of a mounted plugin.
    pub fn position(&self, id: PluginId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn contains(&self, id: PluginId) -> bool {
        self.position(id).is_some()
    }

    /// Plugin ids and names in stack order, lowest first.
    pub fn plugins(&self) -> impl Iterator<Item = (PluginId, &str)> {
        self.entries.iter().map(|e| (e.id, e.name.as_str()))
    }

    /// Every distinct name of the given kind, sorted.
    pub fn names(&self, kind: CapabilityKind) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|e| e.capabilities.iter())
            .filter(|c| c.kind() == kind)
            .map(|c| c.name().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// True if any plugin contributes `name` of `kind`.
    pub fn provides(&self, kind: CapabilityKind, name: &str) -> bool {
        self.top(kind, name).is_some()
    }

    /// Insert a plugin, or update it in place if already mounted.
    ///
    /// New plugins go on top unless `position` is given.
    pub(crate) fn register(
        &mut self,
        id: PluginId,
        definition: PluginDefinition,
        position: Option<usize>,
    ) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.id == id) {
            existing.update(definition);
            return;
        }

        let entry = PluginEntry::new(id, definition);
        match position {
            Some(position) => self.entries.insert(position.min(self.entries.len()), entry),
            None => self.entries.push(entry),
        }
    }

    pub(crate) fn unregister(&mut self, id: PluginId) -> Option<PluginEntry> {
        let index = self.position(id)?;
        Some(self.entries.remove(index))
    }

    pub(crate) fn entry(&self, index: usize) -> &PluginEntry {
        &self.entries[index]
    }

    pub(crate) fn entry_mut(&mut self, index: usize) -> &mut PluginEntry {
        &mut self.entries[index]
    }

    pub(crate) fn entries(&self) -> &[PluginEntry] {
        &self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [PluginEntry] {
        &mut self.entries
    }

    pub(crate) fn capability(&self, slot: Slot) -> &Capability {
        &self.entries[slot.entry].capabilities[slot.capability]
    }

    /// Every contributor of `name`, lowest first.
    pub(crate) fn slots(&self, kind: CapabilityKind, name: &str) -> Vec<Slot> {
        let mut slots = Vec::new();
        for (entry_index, entry) in self.entries.iter().enumerate() {
            for (capability_index, capability) in entry.capabilities.iter().enumerate() {
                if capability.matches(kind, name) {
                    slots.push(Slot {
                        entry: entry_index,
                        capability: capability_index,
                    });
                }
            }
        }
        slots
    }

    /// The closest contributor of `name`.
    pub(crate) fn top(&self, kind: CapabilityKind, name: &str) -> Option<Slot> {
        self.entries
            .iter()
            .enumerate()
            .rev()
            .find_map(|(entry_index, entry)| {
                entry
                    .capabilities
                    .iter()
                    .rposition(|c| c.matches(kind, name))
                    .map(|capability_index| Slot {
                        entry: entry_index,
                        capability: capability_index,
                    })
            })
    }

    /// Pairs of non-chained capabilities of the same kind and name.
    ///
    /// Each shadowed contributor is reported once, against the contributor
    /// directly above it.
    pub fn collisions(&self) -> Vec<StackLint> {
        let mut lints = Vec::new();
        for kind in [
            CapabilityKind::Getter,
            CapabilityKind::Action,
            CapabilityKind::Template,
        ] {
            for name in self.names(kind) {
                let plain: Vec<Slot> = self
                    .slots(kind, &name)
                    .into_iter()
                    .filter(|slot| !self.capability(*slot).is_chained())
                    .collect();
                for pair in plain.windows(2) {
                    let shadowed = &self.entries[pair[0].entry];
                    let winner = &self.entries[pair[1].entry];
                    lints.push(StackLint {
                        kind,
                        name: name.clone(),
                        winner: winner.name.clone(),
                        winner_id: winner.id,
                        shadowed: shadowed.name.clone(),
                        shadowed_id: shadowed.id,
                    });
                }
            }
        }
        lints
    }

    /// Check that every non-optional plugin dependency is mounted below its
    /// dependent, and that no optional dependency is mounted above it.
    pub fn check_dependencies(&self) -> Result<()> {
        for (index, entry) in self.entries.iter().enumerate() {
            for dependency in &entry.dependencies {
                let below = self.entries[..index]
                    .iter()
                    .any(|other| other.name == dependency.name);
                if below {
                    continue;
                }
                if !dependency.optional {
                    return Err(EngineError::MissingPluginDependency {
                        plugin: entry.name.clone(),
                        dependency: dependency.name.clone(),
                    });
                }
                let above = self.entries[index + 1..]
                    .iter()
                    .any(|other| other.name == dependency.name);
                if above {
                    return Err(EngineError::MisorderedPluginDependency {
                        plugin: entry.name.clone(),
                        dependency: dependency.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
