//! Core container implementation for autowire.
//!
//! Aliases map to class identifiers, classes are built by binding their
//! constructor signatures (declared class types are autowired from the
//! container), and results are cached as singletons. [`facade::Facade`]
//! exposes a bound service's methods as static calls.
//!
//! [`ContainerBuilder::build`] checks the declared-type graph by default, so
//! every declared class type must be registered up front. Disable it with
//! [`ContainerBuilder::validate_on_build`] to register classes after the
//! container is built.

pub mod class;
pub mod container;
pub mod discovery;
pub mod error;
pub mod facade;
mod graph;
pub mod naming;
pub mod provider;
mod registry;
pub mod scope;
pub mod settings;
pub mod signature;
pub mod value;

#[cfg(test)]
mod fixtures;

pub use class::{ClassBuilder, ClassDescriptor, MethodDescriptor};
pub use container::{Container, ContainerBuilder, prelude};
pub use error::{ContainerError, Result};
pub use facade::Facade;
pub use scope::Scope;
pub use settings::ContainerSettings;
pub use signature::{Param, Signature};
pub use value::{Args, ResolvedArguments, Value};

#[doc(hidden)]
pub use inventory;
