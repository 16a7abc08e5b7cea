//! Type-erased values flowing through the container.
//!
//! [`Value`] is what the instance cache stores, what caller arguments carry
//! and what methods return. [`Args`] is the caller's name → value map, and
//! [`ResolvedArguments`] the positional list handed to constructors.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{ContainerError, Result};

/// A shared, type-erased instance.
///
/// Cloning a `Value` clones the `Arc`, so two clones are the same object
/// (see [`Value::ptr_eq`]).
#[derive(Clone)]
pub struct Value {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
    class: Option<Arc<str>>,
}

impl Value {
    /// Wraps an owned value.
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wraps an already shared value without re-allocating.
    pub fn from_arc<T: Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            inner: value,
            type_name: type_name::<T>(),
            class: None,
        }
    }

    /// Tags the value with the class that built it.
    pub(crate) fn built_by(mut self, class: &str) -> Self {
        self.class = Some(Arc::from(class));
        self
    }

    /// Identifier of the class the container built this value from.
    ///
    /// `None` for values created outside the container.
    #[inline]
    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    /// The unit value returned by methods without a result.
    pub fn unit() -> Self {
        Self::new(())
    }

    /// Returns the shared value if it is a `T`.
    pub fn downcast<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.inner).downcast::<T>().ok()
    }

    /// Borrows the value if it is a `T`.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// [`TypeId`] of the concrete value (not of the `Arc`).
    #[inline]
    pub fn value_type_id(&self) -> TypeId {
        (*self.inner).type_id()
    }

    /// Name of the concrete type, for diagnostics.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if both values are the same object.
    #[inline]
    pub fn ptr_eq(&self, other: &Value) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.class {
            Some(class) => write!(f, "Value({} from {class})", self.type_name),
            None => write!(f, "Value({})", self.type_name),
        }
    }
}

/// Caller-supplied arguments, keyed by parameter name.
///
/// ```
/// use autowire_container::value::Args;
///
/// let args = Args::new().with("name", String::from("y")).with("retries", 3u32);
/// assert!(args.contains("name"));
/// assert_eq!(args.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct Args {
    values: HashMap<String, Value>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an owned value under `name`.
    pub fn with<T: Send + Sync + 'static>(self, name: impl Into<String>, value: T) -> Self {
        self.with_value(name, Value::new(value))
    }

    /// Adds an already wrapped value (for example a resolved instance).
    pub fn with_value(mut self, name: impl Into<String>, value: Value) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(name.into(), value)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<HashMap<String, Value>> for Args {
    fn from(values: HashMap<String, Value>) -> Self {
        Self { values }
    }
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.values.iter()).finish()
    }
}

/// Arguments bound to a signature, in declaration order.
///
/// Built fresh for every construction or method call.
#[derive(Debug, Default)]
pub struct ResolvedArguments {
    entries: Vec<(String, Value)>,
}

impl ResolvedArguments {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, name: &str, value: Value) {
        self.entries.push((name.to_string(), value));
    }

    /// Typed access by parameter name.
    ///
    /// # Errors
    /// [`ContainerError::MissingArgument`] when no such parameter was bound,
    /// [`ContainerError::InvalidArgument`] when it holds another type.
    pub fn get<T: Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>> {
        let value = self
            .value(name)
            .ok_or_else(|| ContainerError::missing_argument(name, "bound arguments"))?;

        value.downcast::<T>().ok_or_else(|| ContainerError::InvalidArgument {
            parameter: name.to_string(),
            expected: type_name::<T>(),
            found: value.type_name(),
        })
    }

    /// Like [`get`](Self::get), cloning the value out of its `Arc`.
    pub fn cloned<T: Clone + Send + Sync + 'static>(&self, name: &str) -> Result<T> {
        self.get::<T>(name).map(|value| (*value).clone())
    }

    /// Untyped access by parameter name.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, value)| value)
    }

    /// Untyped access by position.
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.entries.get(index).map(|(_, value)| value)
    }

    /// Parameter names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
