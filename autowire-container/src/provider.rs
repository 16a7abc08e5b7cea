//! Provider trait: a module of related class registrations.
//!
//! Providers group the classes and aliases of one area of an application.
//!
//! # Examples
//! ```rust
//! use autowire_container::class::ClassDescriptor;
//! use autowire_container::provider::{Provider, ProviderRegistry};
//!
//! struct Session;
//!
//! struct HttpProvider;
//!
//! impl Provider for HttpProvider {
//!     fn register(&self, registry: &mut dyn ProviderRegistry) {
//!         registry.register_class(ClassDescriptor::plain("http::Session", || Session));
//!         registry.register_alias("session", "http::Session");
//!     }
//! }
//! ```

use crate::class::ClassDescriptor;

/// A module that registers related classes into a container builder.
pub trait Provider: Send + Sync {
    /// Register classes and aliases.
    ///
    /// Called once while the container is being built.
    fn register(&self, registry: &mut dyn ProviderRegistry);

    /// Human-readable name for logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Interface that providers use to register classes.
///
/// Implemented by [`ContainerBuilder`](crate::container::ContainerBuilder);
/// keeping it a trait lets providers be tested against a mock.
pub trait ProviderRegistry {
    /// Register a class descriptor.
    fn register_class(&mut self, class: ClassDescriptor);

    /// Bind an alias to a class identifier.
    fn register_alias(&mut self, alias: &str, class: &str);
}
