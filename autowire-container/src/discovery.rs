//! Compile-time class discovery.
//!
//! Classes submitted with `inventory::submit!` anywhere in the final
//! binary are picked up by
//! [`ContainerBuilder::discover`](crate::container::ContainerBuilder::discover)
//! and by [`Container::new`](crate::container::Container::new).
//!
//! ```rust
//! use autowire_container::class::ClassDescriptor;
//! use autowire_container::discovery::DiscoveredClass;
//!
//! struct Env;
//!
//! fn env() -> ClassDescriptor {
//!     ClassDescriptor::plain("framework::Env", || Env)
//! }
//!
//! autowire_container::inventory::submit! {
//!     DiscoveredClass::new(env)
//! }
//! ```

use crate::class::ClassDescriptor;

/// A class registered at link time.
pub struct DiscoveredClass {
    describe: fn() -> ClassDescriptor,
}

impl DiscoveredClass {
    pub const fn new(describe: fn() -> ClassDescriptor) -> Self {
        Self { describe }
    }

    pub fn describe(&self) -> ClassDescriptor {
        (self.describe)()
    }
}

inventory::collect!(DiscoveredClass);

/// Every class submitted to the binary.
pub fn discovered_classes() -> impl Iterator<Item = ClassDescriptor> {
    inventory::iter::<DiscoveredClass>
        .into_iter()
        .map(DiscoveredClass::describe)
}
