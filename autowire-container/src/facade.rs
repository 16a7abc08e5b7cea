//! Static proxies over container services.
//!
//! A facade names an alias (or class) and forwards method calls to whatever
//! the container resolves for it, so a service's methods read like free
//! functions at the call site.
//!
//! # Examples
//! ```rust,ignore
//! struct Session;
//!
//! impl Facade for Session {
//!     fn target() -> &'static str {
//!         "session"
//!     }
//! }
//!
//! // Resolves "session" through the global container, then calls `start`.
//! Session::call("start", vec![])?;
//!
//! // Same against an explicit container.
//! Session::call_in(&container, "rename", vec![Value::new(String::from("my_"))])?;
//! ```

use tracing::trace;

use crate::container::Container;
use crate::error::Result;
use crate::value::Value;

/// A static proxy for the service bound to [`target()`](Facade::target).
///
/// Nothing is cached by the facade itself; each call resolves the target
/// as a singleton, so repeated calls reach the same instance as long as the
/// container's cache keeps it.
pub trait Facade {
    /// Alias or class identifier of the proxied service.
    fn target() -> &'static str;

    /// The service, resolved through [`Container::global`].
    fn instance() -> Result<Value> {
        Self::instance_in(&Container::global())
    }

    /// The service, resolved through `container`.
    fn instance_in(container: &Container) -> Result<Value> {
        container.resolve(Self::target())
    }

    /// Forward `method` to the service resolved through [`Container::global`].
    fn call(method: &str, args: Vec<Value>) -> Result<Value> {
        Self::call_in(&Container::global(), method, args)
    }

    /// Forward `method` to the service resolved through `container`.
    ///
    /// `args` fill the method's parameters in declaration order, see
    /// [`Container::call`].
    fn call_in(container: &Container, method: &str, args: Vec<Value>) -> Result<Value> {
        trace!(target_class = Self::target(), method = %method, "Facade call");
        let instance = Self::instance_in(container)?;
        container.call(&instance, method, args)
    }
}
