//! Class catalog and alias table.
//!
//! The registry maps class identifiers to [`ClassDescriptor`]s and aliases
//! to class identifiers. Methods are looked up through the class that built
//! an instance.

use std::any::TypeId;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::class::{ClassDescriptor, MethodDescriptor};
use crate::error::{AlreadyRegisteredError, ContainerError};

/// Stores everything the container can introspect.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    classes: HashMap<String, Arc<ClassDescriptor>>,
    aliases: BTreeMap<String, String>,
}

impl Registry {
    /// Creates a registry seeded with `aliases`.
    pub fn with_aliases(aliases: BTreeMap<String, String>) -> Self {
        Self {
            aliases,
            ..Self::default()
        }
    }

    /// Registers a class.
    ///
    /// # Errors
    /// Returns [`ContainerError::AlreadyRegistered`] if the identifier is
    /// taken and `allow_override` is false.
    pub fn register(
        &mut self,
        class: ClassDescriptor,
        allow_override: bool,
    ) -> Result<(), ContainerError> {
        let name = class.name().to_string();

        if !allow_override && self.classes.contains_key(&name) {
            return Err(ContainerError::AlreadyRegistered(AlreadyRegisteredError {
                class: name,
            }));
        }

        debug!(class = %name, params = class.signature().map_or(0, |s| s.len()), "Registered class");
        self.classes.insert(name, Arc::new(class));
        Ok(())
    }

    /// Binds `alias` to `class`, replacing any previous target.
    pub fn register_alias(&mut self, alias: String, class: String) {
        debug!(alias = %alias, class = %class, "Registered alias");
        self.aliases.insert(alias, class);
    }

    /// Maps a key through the alias table; misses pass through unchanged.
    pub fn real_class<'a>(&'a self, key: &'a str) -> &'a str {
        match self.aliases.get(key) {
            Some(class) => {
                trace!(from = %key, to = %class, "Following alias");
                class
            }
            None => key,
        }
    }

    /// Looks up a class by its (already alias-mapped) identifier.
    pub fn class(&self, name: &str) -> Option<Arc<ClassDescriptor>> {
        self.classes.get(name).cloned()
    }

    /// Looks up a method on the class that built an instance.
    ///
    /// Values created outside the container carry no class; for those the
    /// method must be declared by exactly one class producing `type_id`.
    pub fn method(
        &self,
        class: Option<&str>,
        type_id: TypeId,
        name: &str,
    ) -> Option<MethodDescriptor> {
        if let Some(class) = class {
            return self.classes.get(class)?.method(name).cloned();
        }

        let mut candidates = self
            .classes
            .values()
            .filter(|class| class.instance_type_id() == Some(type_id))
            .filter_map(|class| class.method(name));

        let found = candidates.next()?;
        if candidates.next().is_some() {
            trace!(method = %name, "Method is ambiguous for an untagged value");
            return None;
        }
        Some(found.clone())
    }

    pub fn classes(&self) -> impl Iterator<Item = &Arc<ClassDescriptor>> {
        self.classes.values()
    }

    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    /// Returns the number of registered classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }
}
