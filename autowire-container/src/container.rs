//! # The Container: heart of autowire
//!
//! Resolves aliases to classes, builds classes by binding their constructor
//! parameters (autowiring declared class types from the container itself),
//! and caches the results as singletons.
//!
//! # Architecture
//! ```text
//! ContainerBuilder ──build()──> Container ──resolve("session")──> Value
//!                                   │
//!                     alias table → class catalog → instance cache
//! ```
//!
//! # Examples
//! ```rust
//! use autowire_container::prelude::*;
//!
//! struct Config { debug: bool }
//! struct Session { config: std::sync::Arc<Config>, name: String }
//!
//! let container = Container::builder()
//!     .class(ClassDescriptor::plain("framework::Config", || Config { debug: true }))
//!     .class(
//!         ClassDescriptor::builder::<Session>("framework::Session")
//!             .param(Param::new("config").class("framework::Config"))
//!             .param(Param::new("name").default(String::from("PHPSESSID")))
//!             .constructor(|args| {
//!                 Ok(Session { config: args.get("config")?, name: args.cloned("name")? })
//!             })
//!             .build(),
//!     )
//!     .build()
//!     .expect("Failed to build container");
//!
//! let session = container.resolve_as::<Session>("session").expect("Failed to resolve");
//! assert!(session.config.debug);
//! assert_eq!(session.name, "PHPSESSID");
//!
//! // Same instance every time.
//! let again = container.resolve("session").expect("Failed to resolve");
//! assert!(container.peek("framework::Session").unwrap().ptr_eq(&again));
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::{debug, info, instrument, trace, warn};

use autowire_support::rendering::{shorten_type_name, suggest_similar};

use crate::class::{ClassDescriptor, Instantiation, MethodDescriptor};
use crate::discovery::discovered_classes;
use crate::error::{ContainerError, CyclicDependencyError, Result};
use crate::graph::{ClassNode, GraphValidator};
use crate::naming::qualify;
use crate::provider::{Provider, ProviderRegistry};
use crate::registry::Registry;
use crate::scope::Scope;
use crate::settings::{ContainerSettings, framework_aliases};
use crate::signature::Signature;
use crate::value::{Args, ResolvedArguments, Value};

// ============================================================
// ContainerBuilder
// ============================================================

/// Builds a [`Container`] from settings, classes and providers.
///
/// Registration errors surface from [`build()`](ContainerBuilder::build).
///
/// # Examples
/// ```rust,ignore
/// let container = Container::builder()
///     .settings(settings)
///     .add_provider(&HttpProvider)
///     .alias("db", "app::Database")
///     .discover()
///     .build()?;
/// ```
pub struct ContainerBuilder {
    settings: ContainerSettings,
    classes: Vec<ClassDescriptor>,
    aliases: Vec<(String, String)>,
}

impl ContainerBuilder {
    fn new() -> Self {
        Self {
            settings: ContainerSettings::default(),
            classes: Vec::new(),
            aliases: Vec::new(),
        }
    }

    /// Replace the settings (alias table, override and validation policy).
    pub fn settings(mut self, settings: ContainerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Allow registering a class identifier twice; the last one wins.
    pub fn allow_override(mut self, allow: bool) -> Self {
        self.settings.allow_override = allow;
        self
    }

    /// Check the declared-type graph in [`build()`](Self::build).
    ///
    /// On by default. See [`ContainerSettings::validate_on_build`] for
    /// what it rejects that resolution alone would accept.
    pub fn validate_on_build(mut self, validate: bool) -> Self {
        self.settings.validate_on_build = validate;
        self
    }

    /// Bind an alias on top of the settings' alias table.
    pub fn alias(mut self, alias: impl Into<String>, class: impl Into<String>) -> Self {
        self.aliases.push((alias.into(), class.into()));
        self
    }

    /// Register a class.
    pub fn class(mut self, class: ClassDescriptor) -> Self {
        self.classes.push(class);
        self
    }

    /// Add a [`Provider`] module.
    pub fn add_provider(mut self, provider: &dyn Provider) -> Self {
        debug!(provider = provider.name(), "Adding provider");
        provider.register(&mut self);
        self
    }

    /// Register every class submitted through [`crate::discovery`].
    pub fn discover(mut self) -> Self {
        let before = self.classes.len();
        self.classes.extend(discovered_classes());
        debug!(discovered = self.classes.len() - before, "Discovered classes");
        self
    }

    /// Build the container.
    ///
    /// # Errors
    /// - [`ContainerError::AlreadyRegistered`]: duplicate class without override
    /// - [`ContainerError::ClassNotFound`] / [`ContainerError::CyclicDependency`]:
    ///   graph validation failed (when `validate_on_build` is set)
    #[instrument(skip(self), name = "container_build")]
    pub fn build(self) -> Result<Container> {
        info!(
            classes = self.classes.len(),
            aliases = self.settings.aliases.len() + self.aliases.len(),
            "Building container"
        );

        let mut registry = Registry::with_aliases(self.settings.aliases);
        for (alias, class) in self.aliases {
            registry.register_alias(alias, class);
        }
        for class in self.classes {
            registry.register(class, self.settings.allow_override)?;
        }

        let container = Container::from_registry(registry, self.settings.allow_override);
        if self.settings.validate_on_build {
            container.validate()?;
        }

        info!("Container built successfully");
        Ok(container)
    }
}

impl ProviderRegistry for ContainerBuilder {
    fn register_class(&mut self, class: ClassDescriptor) {
        self.classes.push(class);
    }

    fn register_alias(&mut self, alias: &str, class: &str) {
        self.aliases.push((alias.to_string(), class.to_string()));
    }
}

// ═══════════════════════════════════════════
// Process-wide default container
// ═══════════════════════════════════════════

static GLOBAL: Lazy<RwLock<Arc<Container>>> =
    Lazy::new(|| RwLock::new(Arc::new(Container::new())));

// ═══════════════════════════════════════════
// Container
// ═══════════════════════════════════════════

/// Thread-safe dependency injection container.
///
/// Holds the alias table and class catalog behind a read-mostly lock and
/// the singleton instance cache in a [`DashMap`]. Constructors run without
/// any lock held.
///
/// When two threads race to build the same uncached class, both may run
/// the constructor, but the first instance published into the cache wins
/// and both callers receive it.
pub struct Container {
    registry: RwLock<Registry>,
    instances: DashMap<String, Value>,
    allow_override: bool,
}

impl Container {
    /// A container with the default alias table and every discovered class.
    ///
    /// Does not validate the class graph.
    pub fn new() -> Self {
        let mut registry = Registry::with_aliases(framework_aliases());
        for class in discovered_classes() {
            if let Err(error) = registry.register(class, true) {
                warn!(%error, "Skipping discovered class");
            }
        }

        debug!(classes = registry.len(), "Creating container");
        Self::from_registry(registry, false)
    }

    /// Create a new builder.
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    fn from_registry(registry: Registry, allow_override: bool) -> Self {
        Self {
            registry: RwLock::new(registry),
            instances: DashMap::new(),
            allow_override,
        }
    }

    // ── Process-wide instance ──

    /// The process-wide container, created with [`Container::new`] on first access.
    pub fn global() -> Arc<Container> {
        Arc::clone(&GLOBAL.read())
    }

    /// Replace the process-wide container, returning the previous one.
    ///
    /// Holders of the previous container (and of instances it resolved)
    /// keep them.
    pub fn set_global(container: Arc<Container>) -> Arc<Container> {
        debug!("Replacing global container");
        std::mem::replace(&mut *GLOBAL.write(), container)
    }

    // ── Registration ──

    /// Bind `alias` to `class`, replacing any previous binding.
    pub fn bind(&self, alias: impl Into<String>, class: impl Into<String>) {
        self.registry.write().register_alias(alias.into(), class.into());
    }

    /// Register a class after the container was built.
    ///
    /// # Errors
    /// [`ContainerError::AlreadyRegistered`] unless override is allowed.
    pub fn register(&self, class: ClassDescriptor) -> Result<()> {
        self.registry.write().register(class, self.allow_override)
    }

    /// Snapshot of the alias table.
    pub fn aliases(&self) -> BTreeMap<String, String> {
        self.registry.read().aliases().clone()
    }

    /// Registered class identifiers, sorted.
    pub fn class_names(&self) -> Vec<String> {
        self.registry
            .read()
            .class_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Maps `key` through the alias table.
    pub fn real_class(&self, key: &str) -> String {
        self.registry.read().real_class(key).to_string()
    }

    // ── Resolution ──

    /// Resolve an alias or class as a singleton.
    pub fn resolve(&self, key: &str) -> Result<Value> {
        self.make(key, Args::new(), Scope::Singleton)
    }

    /// Resolve as a singleton, passing `args` to the constructor if it runs.
    ///
    /// On a cache hit `args` are ignored.
    pub fn resolve_with(&self, key: &str, args: Args) -> Result<Value> {
        self.make(key, args, Scope::Singleton)
    }

    /// Build a new instance, bypassing the cache in both directions.
    pub fn resolve_fresh(&self, key: &str) -> Result<Value> {
        self.make(key, Args::new(), Scope::Transient)
    }

    /// Resolve and downcast to `T`.
    ///
    /// # Errors
    /// [`ContainerError::TypeMismatch`] if the instance is not a `T`.
    pub fn resolve_as<T: Send + Sync + 'static>(&self, key: &str) -> Result<Arc<T>> {
        let value = self.resolve(key)?;
        value.downcast::<T>().ok_or_else(|| ContainerError::TypeMismatch {
            key: key.to_string(),
            expected: std::any::type_name::<T>(),
            found: value.type_name(),
        })
    }

    /// The full resolution algorithm.
    ///
    /// 1. map `key` through the alias table;
    /// 2. for [`Scope::Singleton`], return the cached instance if present;
    /// 3. otherwise [`instantiate`](Self::instantiate) the class with `args`;
    /// 4. for [`Scope::Singleton`], publish the new instance into the cache.
    pub fn make(&self, key: &str, args: Args, scope: Scope) -> Result<Value> {
        self.make_in(key, &args, scope, &mut ResolutionChain::default())
    }

    fn make_in(
        &self,
        key: &str,
        args: &Args,
        scope: Scope,
        chain: &mut ResolutionChain,
    ) -> Result<Value> {
        let class = self.real_class(key);
        trace!(key = %key, class = %class, scope = %scope, "Resolving");

        if scope.is_cached() {
            if let Some(instance) = self.peek(&class) {
                trace!(class = %class, "Cache hit");
                return Ok(instance);
            }
        }

        let instance = self.instantiate_in(&class, args, chain)?;

        if !scope.is_cached() {
            return Ok(instance);
        }

        Ok(self.publish(class, instance))
    }

    /// First published instance wins; a losing racer's instance is dropped.
    fn publish(&self, class: String, instance: Value) -> Value {
        match self.instances.entry(class) {
            Entry::Occupied(entry) => {
                debug!(class = %entry.key(), "Instance already published, discarding duplicate");
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                debug!(class = %entry.key(), "Published instance");
                entry.insert(instance.clone());
                instance
            }
        }
    }

    /// Build `class` (no alias mapping, no cache).
    ///
    /// Classes without a constructor are built without arguments; the
    /// others get arguments bound by [`bind_parameters`](Self::bind_parameters).
    ///
    /// # Errors
    /// [`ContainerError::ClassNotFound`] for unknown or abstract classes;
    /// binding and constructor errors propagate unchanged.
    pub fn instantiate(&self, class: &str, args: Args) -> Result<Value> {
        self.instantiate_in(class, &args, &mut ResolutionChain::default())
    }

    fn instantiate_in(&self, class: &str, args: &Args, chain: &mut ResolutionChain) -> Result<Value> {
        let descriptor = self.registry.read().class(class);
        let Some(descriptor) = descriptor else {
            return Err(self.class_not_found(class, "class is not registered"));
        };

        let instance = match descriptor.instantiation() {
            Instantiation::Abstract => {
                return Err(self.class_not_found(class, "class is not instantiable"));
            }
            Instantiation::Plain(create) => {
                debug!(class = %class, "Constructing without constructor");
                create()
            }
            Instantiation::Constructor { signature, construct } => {
                chain.enter(class)?;
                let bound = self.bind_in(signature, args, class, chain);
                chain.leave();

                let bound = bound?;
                debug!(class = %class, arguments = bound.len(), "Constructing");
                construct(&bound)
            }
        };

        instance.map(|instance| instance.built_by(class))
    }

    /// Bind `args` to `signature`.
    ///
    /// For each parameter, in order:
    /// 1. a caller value under the parameter's name, used verbatim;
    /// 2. the declared class type, resolved as a singleton;
    /// 3. the default value;
    /// 4. otherwise [`ContainerError::MissingArgument`].
    pub fn bind_parameters(&self, signature: &Signature, args: &Args) -> Result<ResolvedArguments> {
        let owner = signature.to_string();
        self.bind_in(signature, args, &owner, &mut ResolutionChain::default())
    }

    fn bind_in(
        &self,
        signature: &Signature,
        args: &Args,
        owner: &str,
        chain: &mut ResolutionChain,
    ) -> Result<ResolvedArguments> {
        let mut bound = ResolvedArguments::with_capacity(signature.len());

        for param in signature.params() {
            let value = if let Some(value) = args.get(param.name()) {
                trace!(param = param.name(), "Bound from arguments");
                value.clone()
            } else if let Some(class) = param.declared_type() {
                trace!(param = param.name(), class = %class, "Autowiring");
                self.make_in(class, &Args::new(), Scope::Singleton, chain)?
            } else if let Some(default) = param.default_of() {
                trace!(param = param.name(), "Bound from default");
                default.clone()
            } else {
                return Err(ContainerError::missing_argument(param.name(), owner));
            };

            bound.push(param.name(), value);
        }

        Ok(bound)
    }

    // ── Methods ──

    /// Call `method` on `instance`, binding its parameters like a constructor's.
    ///
    /// The method is looked up on the class that built `instance`. Values
    /// seeded with [`set`](Self::set) fall back to the one class of their
    /// Rust type that declares `method`.
    ///
    /// # Errors
    /// [`ContainerError::MethodNotFound`] if the instance's type has no such
    /// method; binding and method errors propagate unchanged.
    pub fn invoke(&self, instance: &Value, method: &str, args: Args) -> Result<Value> {
        let descriptor = self.method_of(instance, method)?;
        self.invoke_descriptor(instance, &descriptor, &args)
    }

    /// Call `method` with positional arguments.
    ///
    /// Positional values fill parameters in declaration order; parameters
    /// left over are bound as in [`invoke`](Self::invoke). Surplus values
    /// are ignored.
    pub fn call(&self, instance: &Value, method: &str, positional: Vec<Value>) -> Result<Value> {
        let descriptor = self.method_of(instance, method)?;
        let params = descriptor.signature().params();

        if positional.len() > params.len() {
            trace!(
                method = %method,
                given = positional.len(),
                declared = params.len(),
                "Ignoring surplus positional arguments"
            );
        }

        let mut args = Args::new();
        for (param, value) in params.iter().zip(positional) {
            args.insert(param.name(), value);
        }

        self.invoke_descriptor(instance, &descriptor, &args)
    }

    fn method_of(&self, instance: &Value, method: &str) -> Result<MethodDescriptor> {
        let descriptor =
            self.registry
                .read()
                .method(instance.class(), instance.value_type_id(), method);
        descriptor.ok_or_else(|| ContainerError::MethodNotFound {
            type_name: instance.type_name(),
            method: method.to_string(),
        })
    }

    fn invoke_descriptor(
        &self,
        instance: &Value,
        descriptor: &MethodDescriptor,
        args: &Args,
    ) -> Result<Value> {
        let owner = format!("{}::{}", shorten_type_name(instance.type_name()), descriptor.name());
        let bound = self.bind_in(
            descriptor.signature(),
            args,
            &owner,
            &mut ResolutionChain::default(),
        )?;

        trace!(method = %owner, "Invoking");
        descriptor.call(instance, &bound)
    }

    // ── Factory ──

    /// Build a class by short name.
    ///
    /// `name` containing `::` is used as-is; otherwise the class is
    /// `namespace` followed by the capitalized name. Always builds a new,
    /// uncached instance and ignores the alias table.
    ///
    /// ```rust,ignore
    /// // builds "cache::driver::Redis"
    /// let driver = container.factory("redis", "cache::driver::", Args::new())?;
    /// ```
    pub fn factory(&self, name: &str, namespace: &str, args: Args) -> Result<Value> {
        let class = qualify(name, namespace);
        debug!(name = %name, class = %class, "Factory");
        self.instantiate(&class, args)
    }

    // ── Keyed access over the instance cache ──

    /// Whether an instance is cached under exactly `key`.
    pub fn has(&self, key: &str) -> bool {
        self.instances.contains_key(key)
    }

    /// Resolve `key` (alias-aware), constructing it if needed.
    ///
    /// Use [`peek`](Self::peek) for a lookup without side effects.
    pub fn get(&self, key: &str) -> Result<Value> {
        self.resolve(key)
    }

    /// The instance cached under exactly `key`, never constructing.
    pub fn peek(&self, key: &str) -> Option<Value> {
        self.instances.get(key).map(|entry| entry.value().clone())
    }

    /// Put `instance` in the cache under `key`, replacing any entry.
    pub fn set(&self, key: impl Into<String>, instance: Value) {
        let key = key.into();
        debug!(key = %key, instance = instance.type_name(), "Seeding instance cache");
        self.instances.insert(key, instance);
    }

    /// Remove and return the instance cached under `key`.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.instances.remove(key).map(|(_, instance)| instance)
    }

    /// Number of cached instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    // ── Diagnostics ──

    /// Check the declared-type graph of every registered class.
    ///
    /// # Errors
    /// - [`ContainerError::ClassNotFound`]: a declared type is not registered
    ///   or not instantiable
    /// - [`ContainerError::CyclicDependency`]: the declared types form a cycle
    pub fn validate(&self) -> Result<()> {
        let nodes: HashMap<String, ClassNode> = {
            let registry = self.registry.read();
            registry
                .classes()
                .map(|class| {
                    let dependencies: Vec<String> = class
                        .signature()
                        .map(|signature| {
                            signature
                                .declared_types()
                                .map(|declared| registry.real_class(declared).to_string())
                                .collect()
                        })
                        .unwrap_or_default();

                    let node = ClassNode {
                        name: class.name().to_string(),
                        instantiable: class.is_instantiable(),
                        dependencies,
                    };
                    (node.name.clone(), node)
                })
                .collect()
        };

        GraphValidator::new(nodes).validate()
    }

    fn class_not_found(&self, class: &str, cause: &str) -> ContainerError {
        let suggestions = {
            let registry = self.registry.read();
            suggest_similar(class, &registry.class_names(), 3)
        };

        debug!(class = %class, cause = %cause, "Class not found");
        ContainerError::class_not_found(class, cause, suggestions)
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.read();
        f.debug_struct("Container")
            .field("classes", &registry.len())
            .field("aliases", &registry.aliases().len())
            .field("instances", &self.instances.len())
            .finish()
    }
}

// ═══════════════════════════════════════════
// ResolutionChain
// ═══════════════════════════════════════════

/// Classes whose constructor arguments are currently being bound.
///
/// One chain per top-level call; re-entering a class on the chain is a cycle.
#[derive(Debug, Default)]
struct ResolutionChain {
    classes: Vec<String>,
}

impl ResolutionChain {
    fn enter(&mut self, class: &str) -> Result<()> {
        if let Some(start) = self.classes.iter().position(|c| c == class) {
            let mut chain = self.classes[start..].to_vec();
            chain.push(class.to_string());

            warn!(cycle = ?chain, "Cyclic dependency detected");
            return Err(ContainerError::CyclicDependency(CyclicDependencyError { chain }));
        }

        self.classes.push(class.to_string());
        Ok(())
    }

    fn leave(&mut self) {
        self.classes.pop();
    }
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::{Container, ContainerBuilder};
    pub use crate::class::ClassDescriptor;
    pub use crate::error::{ContainerError, Result};
    pub use crate::facade::Facade;
    pub use crate::provider::{Provider, ProviderRegistry};
    pub use crate::scope::Scope;
    pub use crate::settings::ContainerSettings;
    pub use crate::signature::{Param, Signature};
    pub use crate::value::{Args, Value};
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════

#[cfg(test)]
pub(crate) static GLOBAL_TEST_LOCK: parking_lot::Mutex<()> = parking_lot::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, Config, Greeter, Invoice, Mailer, Session};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn resolve_alias_twice_returns_same_instance() {
        let container = fixtures::container();

        let a = container.resolve("config").unwrap();
        let b = container.resolve("config").unwrap();

        assert!(a.ptr_eq(&b));
        assert!(container.has("framework::Config"));
        assert_eq!(container.len(), 1);
    }

    #[test]
    fn cache_hit_does_not_reconstruct() {
        let builds = Arc::new(AtomicUsize::new(0));
        let container = fixtures::builder(builds.clone()).build().unwrap();

        container.resolve("config").unwrap();
        container.resolve("framework::Config").unwrap();
        container.get("config").unwrap();

        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn fresh_resolution_bypasses_cache() {
        let builds = Arc::new(AtomicUsize::new(0));
        let container = fixtures::builder(builds.clone()).build().unwrap();

        let first = container.resolve_fresh("config").unwrap();
        let second = container.resolve_fresh("config").unwrap();
        assert!(!first.ptr_eq(&second));
        assert!(container.is_empty());

        let shared = container.resolve("config").unwrap();
        assert!(!shared.ptr_eq(&first));
        assert!(!shared.ptr_eq(&second));
        assert_eq!(builds.load(Ordering::SeqCst), 3);

        // A fresh build after caching neither reads nor replaces the entry.
        let third = container.resolve_fresh("config").unwrap();
        assert!(!third.ptr_eq(&shared));
        assert!(container.peek("framework::Config").unwrap().ptr_eq(&shared));
    }

    #[test]
    fn transient_make_skips_cache() {
        let container = fixtures::container();

        let a = container.make("greeter", Args::new(), Scope::Transient);
        assert!(a.is_err(), "aliases are not implicit");

        let a = container.make("app::Greeter", Args::new(), Scope::Transient).unwrap();
        let b = container.make("app::Greeter", Args::new(), Scope::Transient).unwrap();
        assert!(!a.ptr_eq(&b));
        assert!(!container.has("app::Greeter"));
    }

    #[test]
    fn caller_argument_beats_default() {
        let container = fixtures::container();

        let named = container
            .resolve_with("app::Greeter", Args::new().with("name", String::from("y")))
            .unwrap();
        assert_eq!(named.downcast::<Greeter>().unwrap().name, "y");

        let defaulted = container.instantiate("app::Greeter", Args::new()).unwrap();
        assert_eq!(defaulted.downcast::<Greeter>().unwrap().name, "x");
    }

    #[test]
    fn caller_arguments_ignored_on_cache_hit() {
        let container = fixtures::container();

        container.resolve("app::Greeter").unwrap();
        let cached = container
            .resolve_with("app::Greeter", Args::new().with("name", String::from("y")))
            .unwrap();

        assert_eq!(cached.downcast::<Greeter>().unwrap().name, "x");
    }

    #[test]
    fn autowiring_beats_default() {
        let container = fixtures::container();

        let mailer = container.resolve_as::<Mailer>("app::Mailer").unwrap();
        assert_eq!(mailer.transport.label, "autowired");

        let transport = container.peek("app::Transport").unwrap();
        let shared = transport.downcast::<fixtures::Transport>().unwrap();
        assert!(Arc::ptr_eq(&shared, &mailer.transport));
    }

    #[test]
    fn caller_argument_beats_autowiring() {
        let container = fixtures::container();
        let custom = Value::new(Config { debug: false });

        let session = container
            .resolve_with("session", Args::new().with_value("config", custom.clone()))
            .unwrap();

        let session = session.downcast::<Session>().unwrap();
        assert!(!session.config.debug);
        assert!(!container.has("framework::Config"));
    }

    #[test]
    fn nested_dependencies_are_singletons() {
        let container = fixtures::container();

        let session = container.resolve_as::<Session>("session").unwrap();
        let config = container.resolve_as::<Config>("config").unwrap();

        assert!(Arc::ptr_eq(&session.config, &config));
        assert_eq!(session.name, "PHPSESSID");
        assert_eq!(container.len(), 2);
    }

    #[test]
    fn missing_required_argument() {
        let container = fixtures::container();

        match container.resolve_with("app::Invoice", Args::new()) {
            Err(ContainerError::MissingArgument(err)) => {
                assert_eq!(err.parameter, "total");
                assert_eq!(err.owner, "app::Invoice");
            }
            other => panic!("Expected MissingArgument, got: {other:?}"),
        }
        assert!(!container.has("app::Invoice"));

        let invoice = container
            .resolve_with("app::Invoice", Args::new().with("total", 120i64))
            .unwrap();
        assert_eq!(invoice.downcast::<Invoice>().unwrap().total, 120);
    }

    #[test]
    fn unknown_class() {
        let container = fixtures::container();

        match container.instantiate("NoSuchService", Args::new()) {
            Err(ContainerError::ClassNotFound(err)) => {
                assert_eq!(err.class, "NoSuchService");
                assert!(err.to_string().contains("NoSuchService"));
            }
            other => panic!("Expected ClassNotFound, got: {other:?}"),
        }
    }

    #[test]
    fn unknown_class_suggests_similar() {
        let container = fixtures::container();

        match container.resolve("framework::Sesion") {
            Err(ContainerError::ClassNotFound(err)) => {
                assert!(err.suggestions.iter().any(|s| s == "framework::Session"));
            }
            other => panic!("Expected ClassNotFound, got: {other:?}"),
        }
    }

    #[test]
    fn abstract_class_is_not_instantiable() {
        let container = fixtures::container();

        match container.resolve("middleware") {
            Err(ContainerError::ClassNotFound(err)) => {
                assert_eq!(err.class, "framework::Middleware");
                assert!(err.cause.contains("not instantiable"));
            }
            other => panic!("Expected ClassNotFound, got: {other:?}"),
        }
    }

    #[test]
    fn failing_dependency_leaves_cache_untouched() {
        let container = Container::builder()
            .validate_on_build(false)
            .class(fixtures::session())
            .build()
            .unwrap();

        let result = container.resolve("session");
        assert!(matches!(result, Err(ContainerError::ClassNotFound(_))));
        assert!(container.is_empty());
    }

    #[test]
    fn constructor_errors_propagate() {
        let container = Container::builder()
            .class(
                ClassDescriptor::builder::<Config>("app::Broken")
                    .constructor(|_| Err(ContainerError::construction("app::Broken", "no config file")))
                    .build(),
            )
            .build()
            .unwrap();

        match container.resolve("app::Broken") {
            Err(ContainerError::ConstructionFailed { class, source }) => {
                assert_eq!(class, "app::Broken");
                assert_eq!(source.to_string(), "no config file");
            }
            other => panic!("Expected ConstructionFailed, got: {other:?}"),
        }
        assert!(container.is_empty());
    }

    #[test]
    fn cyclic_dependency_detected() {
        let [left, right] = fixtures::cycle();
        let container = Container::builder()
            .validate_on_build(false)
            .class(left)
            .class(right)
            .build()
            .unwrap();

        match container.resolve("cycle::Left") {
            Err(ContainerError::CyclicDependency(err)) => {
                assert_eq!(err.chain, vec!["cycle::Left", "cycle::Right", "cycle::Left"]);
            }
            other => panic!("Expected CyclicDependency, got: {other:?}"),
        }
        assert!(container.is_empty());
    }

    #[test]
    fn cycle_broken_by_caller_argument() {
        let [left, right] = fixtures::cycle();
        let container = Container::builder()
            .validate_on_build(false)
            .class(left)
            .class(right)
            .build()
            .unwrap();

        let right = Value::new(fixtures::Right);
        assert!(container
            .resolve_with("cycle::Left", Args::new().with_value("right", right))
            .is_ok());
    }

    #[test]
    fn build_validation_rejects_cycles() {
        let [left, right] = fixtures::cycle();
        let result = Container::builder().class(left).class(right).build();
        assert!(matches!(result, Err(ContainerError::CyclicDependency(_))));
    }

    #[test]
    fn build_validation_rejects_unregistered_dependency() {
        let result = Container::builder().class(fixtures::session()).build();

        match result {
            Err(ContainerError::ClassNotFound(err)) => assert_eq!(err.class, "framework::Config"),
            other => panic!("Expected ClassNotFound, got: {other:?}"),
        }
    }

    #[test]
    fn duplicate_class_rejected_unless_override() {
        let duplicate = Container::builder()
            .class(fixtures::greeter())
            .class(fixtures::greeter())
            .build();
        assert!(matches!(duplicate, Err(ContainerError::AlreadyRegistered(_))));

        let container = Container::builder()
            .allow_override(true)
            .class(fixtures::greeter())
            .class(fixtures::greeter())
            .build()
            .unwrap();
        assert!(container.register(fixtures::greeter()).is_ok());
    }

    #[test]
    fn keyed_container_semantics() {
        let container = fixtures::container();
        let obj = Value::new(String::from("foo service"));

        container.set("foo", obj.clone());
        assert!(container.has("foo"));
        assert!(container.get("foo").unwrap().ptr_eq(&obj));
        assert_eq!(container.len(), 1);

        let removed = container.remove("foo").unwrap();
        assert!(removed.ptr_eq(&obj));
        assert!(!container.has("foo"));
        assert!(container.remove("foo").is_none());
        assert!(container.is_empty());
    }

    #[test]
    fn peek_never_constructs() {
        let builds = Arc::new(AtomicUsize::new(0));
        let container = fixtures::builder(builds.clone()).build().unwrap();

        assert!(container.peek("framework::Config").is_none());
        assert_eq!(builds.load(Ordering::SeqCst), 0);

        // get() on the same key constructs.
        container.get("framework::Config").unwrap();
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(container.peek("framework::Config").is_some());
    }

    #[test]
    fn seeded_instance_is_served_by_resolve() {
        let container = fixtures::container();
        let seeded = Value::new(Config { debug: false });

        container.set("framework::Config", seeded.clone());

        assert!(container.resolve("config").unwrap().ptr_eq(&seeded));
        let session = container.resolve_as::<Session>("session").unwrap();
        assert!(!session.config.debug);
    }

    #[test]
    fn removed_entry_is_rebuilt() {
        let container = fixtures::container();

        let first = container.resolve("config").unwrap();
        container.remove("framework::Config");
        let second = container.resolve("config").unwrap();

        assert!(!first.ptr_eq(&second));
    }

    #[test]
    fn bind_extends_alias_table() {
        let container = fixtures::container();

        container.bind("mail", "app::Mailer");
        assert_eq!(container.real_class("mail"), "app::Mailer");
        assert!(container.resolve_as::<Mailer>("mail").is_ok());

        // Later bindings replace earlier ones.
        container.bind("config", "app::Greeter");
        assert!(container.resolve_as::<Greeter>("config").is_ok());
        assert_eq!(container.aliases()["config"], "app::Greeter");
    }

    #[test]
    fn resolve_as_wrong_type() {
        let container = fixtures::container();

        match container.resolve_as::<String>("config") {
            Err(ContainerError::TypeMismatch { key, found, .. }) => {
                assert_eq!(key, "config");
                assert!(found.ends_with("Config"));
            }
            other => panic!("Expected TypeMismatch, got: {other:?}"),
        }
    }

    #[test]
    fn factory_qualifies_and_skips_cache() {
        let container = Container::builder()
            .class(fixtures::greeter())
            .class(fixtures::invoice())
            .build()
            .unwrap();

        let a = container.factory("greeter", "app::", Args::new()).unwrap();
        let b = container.factory("app::Greeter", "ignored::", Args::new()).unwrap();

        assert!(a.is::<Greeter>());
        assert!(!a.ptr_eq(&b));
        assert!(container.is_empty());

        let invoice = container
            .factory("invoice", "app::", Args::new().with("total", 5i64))
            .unwrap();
        assert_eq!(invoice.downcast::<Invoice>().unwrap().total, 5);
    }

    #[test]
    fn factory_ignores_aliases() {
        let container = fixtures::container();
        let result = container.factory("session", "", Args::new());

        match result {
            Err(ContainerError::ClassNotFound(err)) => assert_eq!(err.class, "Session"),
            other => panic!("Expected ClassNotFound, got: {other:?}"),
        }
    }

    #[test]
    fn bind_parameters_follows_precedence() {
        let container = fixtures::container();
        let signature = Signature::new()
            .param(crate::signature::Param::new("config").class("framework::Config"))
            .param(crate::signature::Param::new("name").default(String::from("x")))
            .param(crate::signature::Param::new("total"));

        let bound = container
            .bind_parameters(&signature, &Args::new().with("total", 3i64))
            .unwrap();

        assert_eq!(bound.len(), 3);
        assert!(bound.at(0).unwrap().is::<Config>());
        assert_eq!(bound.cloned::<String>("name").unwrap(), "x");
        assert_eq!(*bound.get::<i64>("total").unwrap(), 3);

        let missing = container.bind_parameters(&signature, &Args::new());
        assert!(matches!(missing, Err(ContainerError::MissingArgument(_))));
    }

    #[test]
    fn invoke_binds_method_parameters() {
        let container = fixtures::container();
        let session = container.resolve("session").unwrap();

        let renamed = container
            .invoke(&session, "rename", Args::new().with("prefix", String::from("my_")))
            .unwrap();
        assert_eq!(*renamed.downcast::<String>().unwrap(), "my_PHPSESSID");

        let debug = container.invoke(&session, "debug_of", Args::new()).unwrap();
        assert_eq!(debug.downcast_ref::<bool>(), Some(&true));

        match container.invoke(&session, "rename", Args::new()) {
            Err(ContainerError::MissingArgument(err)) => {
                assert_eq!(err.parameter, "prefix");
                assert_eq!(err.owner, "Session::rename");
            }
            other => panic!("Expected MissingArgument, got: {other:?}"),
        }
    }

    #[test]
    fn call_fills_positional_then_binds_rest() {
        let container = fixtures::container();
        let session = container.resolve("session").unwrap();

        let renamed = container
            .call(&session, "rename", vec![Value::new(String::from("<"))])
            .unwrap();
        assert_eq!(*renamed.downcast::<String>().unwrap(), "<PHPSESSID");

        let both = container
            .call(
                &session,
                "rename",
                vec![
                    Value::new(String::from("<")),
                    Value::new(String::from(">")),
                    Value::new(99u8),
                ],
            )
            .unwrap();
        assert_eq!(*both.downcast::<String>().unwrap(), "<PHPSESSID>");
    }

    #[test]
    fn unknown_method() {
        let container = fixtures::container();
        let config = container.resolve("config").unwrap();

        match container.invoke(&config, "reload", Args::new()) {
            Err(ContainerError::MethodNotFound { method, type_name }) => {
                assert_eq!(method, "reload");
                assert!(type_name.ends_with("Config"));
            }
            other => panic!("Expected MethodNotFound, got: {other:?}"),
        }
    }

    #[test]
    fn concurrent_resolution_publishes_one_instance() {
        let builds = Arc::new(AtomicUsize::new(0));
        let container = Arc::new(fixtures::builder(builds.clone()).build().unwrap());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let container = Arc::clone(&container);
                std::thread::spawn(move || container.resolve("session").unwrap())
            })
            .collect();

        let resolved: Vec<Value> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let published = container.peek("framework::Session").unwrap();

        assert!(resolved.iter().all(|value| value.ptr_eq(&published)));
        assert!(builds.load(Ordering::SeqCst) >= 1);
        assert_eq!(container.len(), 2);
    }

    #[test]
    fn racing_constructions_publish_first_instance() {
        struct Slow;

        let builds = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(std::sync::Barrier::new(2));

        let class = {
            let builds = Arc::clone(&builds);
            let barrier = Arc::clone(&barrier);
            ClassDescriptor::builder::<Slow>("app::Slow")
                .constructor(move |_| {
                    builds.fetch_add(1, Ordering::SeqCst);
                    // Both threads are past the cache check before either publishes.
                    barrier.wait();
                    Ok(Slow)
                })
                .build()
        };
        let container = Arc::new(Container::builder().class(class).build().unwrap());

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let container = Arc::clone(&container);
                std::thread::spawn(move || container.resolve("app::Slow").unwrap())
            })
            .collect();
        let resolved: Vec<Value> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(builds.load(Ordering::SeqCst), 2);
        assert!(resolved[0].ptr_eq(&resolved[1]));
        assert!(container.peek("app::Slow").unwrap().ptr_eq(&resolved[0]));
        assert_eq!(container.len(), 1);
    }

    struct Db {
        role: &'static str,
    }

    fn db(name: &str, role: &'static str, methods: &[&'static str]) -> ClassDescriptor {
        let mut builder = ClassDescriptor::builder::<Db>(name).plain(move || Db { role });
        for &method in methods {
            builder = builder.method(method, Signature::new(), move |db: &Db, _| {
                Ok(Value::new(format!("{}-{method}", db.role)))
            });
        }
        builder.build()
    }

    #[test]
    fn methods_dispatch_on_building_class() {
        let container = Container::builder()
            .class(db("app::Primary", "primary", &["ping"]))
            .class(db("app::Replica", "replica", &["ping"]))
            .alias("db", "app::Primary")
            .build()
            .unwrap();

        let primary = container.resolve("db").unwrap();
        let replica = container.resolve("app::Replica").unwrap();
        assert_eq!(primary.class(), Some("app::Primary"));

        let ping = container.invoke(&primary, "ping", Args::new()).unwrap();
        assert_eq!(*ping.downcast::<String>().unwrap(), "primary-ping");

        let ping = container.call(&replica, "ping", vec![]).unwrap();
        assert_eq!(*ping.downcast::<String>().unwrap(), "replica-ping");

        // A seeded value of a shared type has no single owner of `ping`.
        let seeded = Value::new(Db { role: "seeded" });
        assert!(matches!(
            container.invoke(&seeded, "ping", Args::new()),
            Err(ContainerError::MethodNotFound { .. })
        ));
    }

    #[test]
    fn override_drops_previous_methods() {
        let container = Container::builder()
            .allow_override(true)
            .class(db("app::Primary", "primary", &["legacy"]))
            .build()
            .unwrap();

        let primary = container.resolve("app::Primary").unwrap();
        assert!(container.invoke(&primary, "legacy", Args::new()).is_ok());

        container.register(db("app::Primary", "primary", &[])).unwrap();

        match container.invoke(&primary, "legacy", Args::new()) {
            Err(ContainerError::MethodNotFound { method, .. }) => assert_eq!(method, "legacy"),
            other => panic!("Expected MethodNotFound, got: {other:?}"),
        }
    }

    #[test]
    fn late_registration_needs_validation_off() {
        let strict = Container::builder().class(fixtures::mailer()).build();
        assert!(matches!(strict, Err(ContainerError::ClassNotFound(_))));

        let container = Container::builder()
            .validate_on_build(false)
            .class(fixtures::mailer())
            .build()
            .unwrap();

        // The unregistered declared type fails at resolution time instead.
        match container.resolve("app::Mailer") {
            Err(ContainerError::ClassNotFound(err)) => assert_eq!(err.class, "app::Transport"),
            other => panic!("Expected ClassNotFound, got: {other:?}"),
        }
        assert!(container.is_empty());

        container.register(fixtures::transport()).unwrap();
        let mailer = container.resolve_as::<Mailer>("app::Mailer").unwrap();
        assert_eq!(mailer.transport.label, "autowired");
    }

    #[test]
    fn provider_registers_into_builder() {
        struct FrameworkProvider;

        impl Provider for FrameworkProvider {
            fn register(&self, registry: &mut dyn ProviderRegistry) {
                registry.register_class(fixtures::transport());
                registry.register_class(fixtures::mailer());
                registry.register_alias("mailer", "app::Mailer");
            }
        }

        let container = Container::builder()
            .add_provider(&FrameworkProvider)
            .build()
            .unwrap();

        assert!(container.resolve_as::<Mailer>("mailer").is_ok());
        assert_eq!(container.class_names(), vec!["app::Mailer", "app::Transport"]);
    }

    #[test]
    fn settings_replace_default_aliases() {
        let container = Container::builder()
            .settings(ContainerSettings::without_aliases().alias("greeter", "app::Greeter"))
            .class(fixtures::greeter())
            .build()
            .unwrap();

        assert_eq!(container.aliases().len(), 1);
        assert_eq!(container.real_class("config"), "config");
        assert!(container.resolve_as::<Greeter>("greeter").is_ok());
    }

    #[test]
    fn discover_registers_submitted_classes() {
        let container = Container::builder().discover().build().unwrap();

        assert!(container.class_names().iter().any(|name| name == "discovery_test::Hook"));
        assert!(container.resolve("discovery_test::Hook").is_ok());
    }

    #[test]
    fn new_container_has_framework_aliases() {
        let container = Container::new();
        assert_eq!(container.real_class("request"), "framework::Request");
        assert!(container.is_empty());
    }

    #[test]
    fn global_can_be_replaced() {
        let _guard = GLOBAL_TEST_LOCK.lock();

        let replacement = Arc::new(fixtures::container());
        let previous = Container::set_global(Arc::clone(&replacement));

        let current = Container::global();
        assert!(Arc::ptr_eq(&current, &replacement));

        let config = current.resolve("config").unwrap();
        assert!(Container::global().resolve("config").unwrap().ptr_eq(&config));

        let restored = Container::set_global(previous);
        assert!(Arc::ptr_eq(&restored, &replacement));

        // Holders keep what the old global resolved.
        assert!(config.is::<Config>());
    }

    #[test]
    fn debug_display() {
        let container = fixtures::container();
        container.resolve("config").unwrap();

        let debug = format!("{container:?}");
        assert!(debug.contains("Container"));
        assert!(debug.contains("instances: 1"));
    }
}
