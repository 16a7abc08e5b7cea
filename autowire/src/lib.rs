//! # autowire: an autowiring dependency injection container
//!
//! Services are registered as classes with constructor signatures. The
//! container resolves aliases, autowires constructor parameters that declare
//! a class type, and caches what it builds as singletons. Facades forward
//! static calls to the resolved services.
//!
//! ```rust
//! use autowire::prelude::*;
//!
//! struct Config;
//!
//! let container = Container::builder()
//!     .class(ClassDescriptor::plain("framework::Config", || Config))
//!     .build()
//!     .expect("Failed to build container");
//!
//! let a = container.resolve("config").expect("Failed to resolve");
//! let b = container.resolve("framework::Config").expect("Failed to resolve");
//! assert!(a.ptr_eq(&b));
//! ```

pub use autowire_container::*;
pub use autowire_support::*;
