//! Constructor and method signatures.
//!
//! A [`Signature`] is the ordered parameter list the binding algorithm walks.
//! Each [`Param`] may declare a class type (autowired from the container)
//! and a default value.

use std::fmt;

use crate::naming::class_name;
use crate::value::Value;

/// One declared parameter.
///
/// ```
/// use autowire_container::signature::Param;
///
/// let config = Param::new("config").class("framework::Config");
/// let name = Param::new("name").default(String::from("x"));
///
/// assert_eq!(config.declared_type(), Some("framework::Config"));
/// assert!(name.has_default());
/// ```
#[derive(Clone)]
pub struct Param {
    name: String,
    declared_type: Option<String>,
    default: Option<Value>,
}

impl Param {
    /// An untyped parameter without a default: it must be supplied by name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: None,
            default: None,
        }
    }

    /// A parameter whose declared type is the Rust type `T`.
    ///
    /// Uses [`class_name::<T>()`](class_name) as the class identifier.
    pub fn of<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::new(name).class(class_name::<T>())
    }

    /// Declares the class identifier this parameter is autowired from.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.declared_type = Some(class.into());
        self
    }

    /// Declares the value used when nothing else binds the parameter.
    pub fn default<T: Send + Sync + 'static>(self, value: T) -> Self {
        self.default_value(Value::new(value))
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn declared_type(&self) -> Option<&str> {
        self.declared_type.as_deref()
    }

    #[inline]
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    #[inline]
    pub fn default_of(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

impl fmt::Debug for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Param")
            .field("name", &self.name)
            .field("declared_type", &self.declared_type)
            .field("has_default", &self.has_default())
            .finish()
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.declared_type {
            Some(class) => write!(f, "{}: {}", self.name, class)?,
            None => write!(f, "{}", self.name)?,
        }
        if self.has_default() {
            write!(f, " = …")?;
        }
        Ok(())
    }
}

/// Ordered parameters of a constructor or method.
#[derive(Debug, Clone, Default)]
pub struct Signature {
    params: Vec<Param>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter.
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Declared class types, in parameter order.
    pub fn declared_types(&self) -> impl Iterator<Item = &str> {
        self.params.iter().filter_map(Param::declared_type)
    }
}

impl FromIterator<Param> for Signature {
    fn from_iter<I: IntoIterator<Item = Param>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{param}")?;
        }
        write!(f, ")")
    }
}
