//! Type-erased values shared between getters, actions and owned fields.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use crate::error::{EngineError, Result};

/// A shared, immutable, type-erased value.
///
/// Cloning a `Value` clones the handle, never the data. Two values are the
/// same value when they point at the same allocation (see [`Value::ptr_eq`]),
/// which lets consumers use identity as a cheap change check.
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Value {
    /// Wrap a value in a new allocation.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Share an existing allocation. The resulting value is identical
    /// (by [`Value::ptr_eq`]) to every other value made from the same `Arc`.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            inner: value,
            type_name: type_name::<T>(),
        }
    }

    /// The unit value.
    pub fn unit() -> Self {
        Self::new(())
    }

    /// Borrow the value as `T`.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// Get a shared handle to the value as `T`.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner).downcast::<T>().ok()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Name of the wrapped type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Reference identity.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Borrow the value as `T`, or report a mismatch against `name`.
    pub fn expect<T: Any>(&self, name: &str) -> Result<&T> {
        self.get::<T>().ok_or_else(|| EngineError::TypeMismatch {
            name: name.to_string(),
            expected: type_name::<T>(),
            found: self.type_name,
        })
    }

    /// Like [`Value::expect`] but returns a shared handle.
    pub fn expect_arc<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
        self.downcast::<T>().ok_or_else(|| EngineError::TypeMismatch {
            name: name.to_string(),
            expected: type_name::<T>(),
            found: self.type_name,
        })
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value<{}>", self.type_name)
    }
}

impl<T: Any + Send + Sync> From<Arc<T>> for Value {
    fn from(value: Arc<T>) -> Self {
        Self::from_arc(value)
    }
}
