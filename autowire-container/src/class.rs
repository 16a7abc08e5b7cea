//! Class descriptors: the container's view of a class.
//!
//! Rust has no runtime reflection, so every instantiable class is
//! described up front: its identifier, its constructor signature, the
//! closure that builds it from bound arguments, and the methods the
//! facade layer may call on it.
//!
//! # Examples
//! ```
//! use autowire_container::class::ClassDescriptor;
//! use autowire_container::signature::{Param, Signature};
//! use autowire_container::value::Value;
//!
//! struct Config { debug: bool }
//! struct Session { debug: bool, name: String }
//!
//! let session = ClassDescriptor::builder::<Session>("framework::Session")
//!     .param(Param::new("config").class("framework::Config"))
//!     .param(Param::new("name").default(String::from("PHPSESSID")))
//!     .constructor(|args| {
//!         let config = args.get::<Config>("config")?;
//!         Ok(Session { debug: config.debug, name: args.cloned("name")? })
//!     })
//!     .method("name", Signature::new(), |session, _| Ok(Value::new(session.name.clone())))
//!     .build();
//!
//! assert!(session.is_instantiable());
//! assert_eq!(session.signature().map(|s| s.len()), Some(2));
//! ```

use std::any::{TypeId, type_name};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::{ContainerError, Result};
use crate::naming::class_name;
use crate::signature::{Param, Signature};
use crate::value::{ResolvedArguments, Value};

/// Builds an instance from arguments bound to the constructor signature.
pub type ConstructFn = Arc<dyn Fn(&ResolvedArguments) -> Result<Value> + Send + Sync>;

/// Builds an instance of a class that declares no constructor.
pub type PlainFn = Arc<dyn Fn() -> Result<Value> + Send + Sync>;

/// Calls a method on a type-erased receiver with bound arguments.
pub type MethodFn = Arc<dyn Fn(&Value, &ResolvedArguments) -> Result<Value> + Send + Sync>;

/// How a class is instantiated.
#[derive(Clone)]
pub(crate) enum Instantiation {
    /// Cannot be instantiated (an interface or abstract base).
    Abstract,
    /// No constructor: built without arguments.
    Plain(PlainFn),
    /// Constructor with a (possibly empty) signature.
    Constructor {
        signature: Signature,
        construct: ConstructFn,
    },
}

/// A method callable through [`Container::invoke`](crate::container::Container::invoke).
#[derive(Clone)]
pub struct MethodDescriptor {
    name: String,
    signature: Signature,
    invoke: MethodFn,
}

impl MethodDescriptor {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub(crate) fn call(&self, receiver: &Value, args: &ResolvedArguments) -> Result<Value> {
        (self.invoke)(receiver, args)
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MethodDescriptor({}{})", self.name, self.signature)
    }
}

/// Everything the container knows about a class.
#[derive(Clone)]
pub struct ClassDescriptor {
    name: String,
    instantiation: Instantiation,
    instance_type: Option<(TypeId, &'static str)>,
    methods: Vec<MethodDescriptor>,
}

impl ClassDescriptor {
    /// Starts describing a class whose instances are `T`.
    pub fn builder<T: Send + Sync + 'static>(name: impl Into<String>) -> ClassBuilder<T> {
        ClassBuilder::new(name.into())
    }

    /// Starts describing `T` under its Rust identifier, [`class_name::<T>()`](class_name).
    pub fn for_type<T: Send + Sync + 'static>() -> ClassBuilder<T> {
        ClassBuilder::new(class_name::<T>().to_string())
    }

    /// A class without a constructor, built by `create`.
    pub fn plain<T, F>(name: impl Into<String>, create: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self::builder::<T>(name).plain(create).build()
    }

    /// A class that exists but can never be instantiated.
    pub fn abstract_class(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instantiation: Instantiation::Abstract,
            instance_type: None,
            methods: Vec::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Constructor signature, `None` for classes without a constructor.
    pub fn signature(&self) -> Option<&Signature> {
        match &self.instantiation {
            Instantiation::Constructor { signature, .. } => Some(signature),
            _ => None,
        }
    }

    pub fn is_instantiable(&self) -> bool {
        !matches!(self.instantiation, Instantiation::Abstract)
    }

    /// Rust type of the instances this class produces.
    pub fn instance_type_name(&self) -> Option<&'static str> {
        self.instance_type.map(|(_, name)| name)
    }

    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    pub(crate) fn instantiation(&self) -> &Instantiation {
        &self.instantiation
    }

    /// Looks up a method declared by this class.
    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|method| method.name == name)
    }

    /// [`TypeId`] of the instances this class produces.
    pub(crate) fn instance_type_id(&self) -> Option<TypeId> {
        self.instance_type.map(|(type_id, _)| type_id)
    }
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.instantiation {
            Instantiation::Abstract => "abstract".to_string(),
            Instantiation::Plain(_) => "()".to_string(),
            Instantiation::Constructor { signature, .. } => signature.to_string(),
        };

        f.debug_struct("ClassDescriptor")
            .field("name", &self.name)
            .field("constructor", &kind)
            .field("methods", &self.methods.len())
            .finish()
    }
}

/// Builder for a [`ClassDescriptor`] producing `T`.
///
/// Without [`constructor`](Self::constructor) or [`plain`](Self::plain)
/// the class is abstract.
pub struct ClassBuilder<T> {
    name: String,
    signature: Signature,
    instantiation: Instantiation,
    methods: Vec<MethodDescriptor>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> ClassBuilder<T> {
    fn new(name: String) -> Self {
        Self {
            name,
            signature: Signature::new(),
            instantiation: Instantiation::Abstract,
            methods: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Appends a constructor parameter.
    ///
    /// Parameters only take effect with [`constructor`](Self::constructor);
    /// a class built by [`plain`](Self::plain) has no signature and ignores them.
    pub fn param(mut self, param: Param) -> Self {
        self.signature = self.signature.param(param);
        if let Instantiation::Constructor { signature, .. } = &mut self.instantiation {
            *signature = self.signature.clone();
        }
        self
    }

    /// Sets the constructor body.
    ///
    /// It receives arguments bound to the declared parameters.
    pub fn constructor<F>(mut self, construct: F) -> Self
    where
        F: Fn(&ResolvedArguments) -> Result<T> + Send + Sync + 'static,
    {
        self.instantiation = Instantiation::Constructor {
            signature: self.signature.clone(),
            construct: Arc::new(move |args: &ResolvedArguments| construct(args).map(Value::new)),
        };
        self
    }

    /// Declares that the class has no constructor; `create` builds it.
    pub fn plain<F>(mut self, create: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.instantiation =
            Instantiation::Plain(Arc::new(move || -> Result<Value> { Ok(Value::new(create())) }));
        self
    }

    /// Registers a method callable on instances of `T`.
    pub fn method<F>(mut self, name: impl Into<String>, signature: Signature, body: F) -> Self
    where
        F: Fn(&T, &ResolvedArguments) -> Result<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        let method_name = name.clone();

        let invoke: MethodFn = Arc::new(move |receiver: &Value, args: &ResolvedArguments| {
            let this = receiver.downcast_ref::<T>().ok_or_else(|| ContainerError::TypeMismatch {
                key: method_name.clone(),
                expected: type_name::<T>(),
                found: receiver.type_name(),
            })?;
            body(this, args)
        });

        self.methods.push(MethodDescriptor {
            name,
            signature,
            invoke,
        });
        self
    }

    pub fn build(self) -> ClassDescriptor {
        ClassDescriptor {
            name: self.name,
            instantiation: self.instantiation,
            instance_type: Some((TypeId::of::<T>(), type_name::<T>())),
            methods: self.methods,
        }
    }
}
