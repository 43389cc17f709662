//! Controlled/uncontrolled state for plugin-owned fields.
//!
//! Every owned field is either *controlled* (its displayed value is supplied
//! from outside and only ever changes when the caller supplies a new one) or
//! *uncontrolled* (the plugin keeps the value internally, seeded from a
//! default). The mode is fixed by the binding: a binding with a controlled
//! value is controlled.
//!
//! Reducers never write the displayed value directly. Within a batch they
//! thread a *pending* value: each reducer call starts from the pending value
//! left by the previous one. On commit the pending value is compared with the
//! value the field had when the batch touched it first; only a difference
//! updates internal state (uncontrolled mode) and fires the change callback.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::BoxError;
use crate::value::Value;

/// Invoked with the committed next value of a field.
pub type ChangeCallback = Arc<dyn Fn(&Value) + Send + Sync>;

/// Decides whether two field values are the same.
pub type Equality = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// Declaration of one owned field: its props and its equality rule.
#[derive(Clone)]
pub struct FieldBinding {
    name: String,
    controlled: Option<Value>,
    default_value: Option<Value>,
    empty: Value,
    on_change: Option<ChangeCallback>,
    equality: Option<Equality>,
}

impl FieldBinding {
    /// Bind a field whose empty value is `empty`.
    pub fn new(name: impl Into<String>, empty: Value) -> Self {
        Self {
            name: name.into(),
            controlled: None,
            default_value: None,
            empty,
            on_change: None,
            equality: None,
        }
    }

    /// Bind a field of type `T`, seeded with `T::default()` when no default
    /// value is given.
    pub fn of<T: Default + Any + Send + Sync>(name: impl Into<String>) -> Self {
        Self::new(name, Value::new(T::default()))
    }

    /// Make the field controlled by `value`.
    pub fn controlled(mut self, value: Value) -> Self {
        self.controlled = Some(value);
        self
    }

    /// Initial value of an uncontrolled field.
    pub fn default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(callback));
        self
    }

    /// Replace reference identity with a custom equality rule.
    pub fn compare_with<F>(mut self, equality: F) -> Self
    where
        F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    {
        self.equality = Some(Arc::new(equality));
        self
    }

    /// Compare values of type `T` with `PartialEq`. Values of any other type
    /// fall back to reference identity.
    pub fn compare_by_value<T: PartialEq + Any>(self) -> Self {
        self.compare_with(|a, b| match (a.get::<T>(), b.get::<T>()) {
            (Some(a), Some(b)) => a == b,
            _ => a.ptr_eq(b),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> FieldMode {
        if self.controlled.is_some() {
            FieldMode::Controlled
        } else {
            FieldMode::Uncontrolled
        }
    }

    fn same(&self, a: &Value, b: &Value) -> bool {
        match &self.equality {
            Some(equality) => equality(a, b),
            None => a.ptr_eq(b),
        }
    }
}

impl fmt::Debug for FieldBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("name", &self.name)
            .field("controlled", &self.controlled)
            .field("default_value", &self.default_value)
            .field("has_on_change", &self.on_change.is_some())
            .finish_non_exhaustive()
    }
}

/// Whether a field's displayed value is owned by the caller or the plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMode {
    Controlled,
    Uncontrolled,
}

/// Typed controlled-prop triple for one field: a controlled value, a
/// default value and a change callback, all optional.
pub struct Controllable<T> {
    pub value: Option<Arc<T>>,
    pub default_value: Option<Arc<T>>,
    pub on_change: Option<Arc<dyn Fn(&Arc<T>) + Send + Sync>>,
}

impl<T> Controllable<T> {
    pub fn new() -> Self {
        Self {
            value: None,
            default_value: None,
            on_change: None,
        }
    }

    pub fn value(mut self, value: impl Into<Arc<T>>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Arc<T>>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Arc<T>) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(callback));
        self
    }
}

impl<T: Default + Any + Send + Sync> Controllable<T> {
    /// Turn the props into a binding for field `name`.
    pub fn bind(&self, name: &str) -> FieldBinding {
        let mut binding = FieldBinding::of::<T>(name);
        if let Some(value) = &self.value {
            binding = binding.controlled(Value::from_arc(Arc::clone(value)));
        }
        if let Some(value) = &self.default_value {
            binding = binding.default_value(Value::from_arc(Arc::clone(value)));
        }
        if let Some(callback) = &self.on_change {
            let callback = Arc::clone(callback);
            binding = binding.on_change(move |value| {
                if let Some(value) = value.downcast::<T>() {
                    callback(&value);
                }
            });
        }
        binding
    }
}

impl<T> Default for Controllable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Controllable<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            default_value: self.default_value.clone(),
            on_change: self.on_change.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Controllable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controllable")
            .field("value", &self.value)
            .field("default_value", &self.default_value)
            .field("has_on_change", &self.on_change.is_some())
            .finish()
    }
}

/// Runtime state of one owned field.
#[derive(Debug, Clone)]
pub(crate) struct FieldState {
    binding: FieldBinding,
    internal: Value,
    /// Value threaded through the current batch.
    pending: Option<Value>,
    /// Effective value when the current batch first touched the field.
    baseline: Option<Value>,
}

/// A committed change, ready to be reported.
pub(crate) struct CommittedField {
    pub value: Value,
    pub on_change: Option<ChangeCallback>,
}

impl FieldState {
    pub(crate) fn new(binding: FieldBinding) -> Self {
        let internal = binding
            .default_value
            .clone()
            .unwrap_or_else(|| binding.empty.clone());
        Self {
            binding,
            internal,
            pending: None,
            baseline: None,
        }
    }

    /// Apply new props. Internal state survives while the field stays
    /// uncontrolled.
    pub(crate) fn rebind(&mut self, binding: FieldBinding) {
        if self.binding.mode() != binding.mode() {
            log::warn!(
                "field '{}' switched from {:?} to {:?}",
                binding.name,
                self.binding.mode(),
                binding.mode()
            );
        }
        self.binding = binding;
    }

    pub(crate) fn name(&self) -> &str {
        &self.binding.name
    }

    pub(crate) fn mode(&self) -> FieldMode {
        self.binding.mode()
    }

    /// The displayed value: the controlled prop if present, else internal
    /// state.
    pub(crate) fn effective(&self) -> &Value {
        self.binding.controlled.as_ref().unwrap_or(&self.internal)
    }

    /// The value reducers and getters see: the pending batch value if any,
    /// else the effective value.
    pub(crate) fn working(&self) -> &Value {
        self.pending.as_ref().unwrap_or_else(|| self.effective())
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Run `reducer` against the working value and thread its result.
    pub(crate) fn apply<F>(&mut self, reducer: F, payload: &Value) -> Result<Value, BoxError>
    where
        F: FnOnce(&Value, &Value) -> Result<Value, BoxError>,
    {
        let next = reducer(self.working(), payload)?;
        if self.baseline.is_none() {
            self.baseline = Some(self.effective().clone());
        }
        self.pending = Some(next.clone());
        Ok(next)
    }

    /// Settle the pending value. Returns the change to report, if the final
    /// value differs from the baseline.
    pub(crate) fn commit(&mut self) -> Option<CommittedField> {
        let next = self.pending.take()?;
        let baseline = self.baseline.take()?;

        if self.binding.same(&baseline, &next) {
            return None;
        }

        if self.mode() == FieldMode::Uncontrolled {
            self.internal = next.clone();
        }

        Some(CommittedField {
            value: next,
            on_change: self.binding.on_change.clone(),
        })
    }

    pub(crate) fn rollback(&mut self) {
        self.pending = None;
        self.baseline = None;
    }
}
