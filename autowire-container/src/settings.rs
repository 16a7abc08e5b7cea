//! Container configuration.
//!
//! [`ContainerSettings`] carries the pre-seeded alias table and the
//! registration policy. It deserializes with serde, so embedding hosts can
//! load it from their own configuration files.
//!
//! ```
//! use autowire_container::settings::ContainerSettings;
//!
//! let settings = ContainerSettings::default();
//! assert_eq!(settings.aliases["config"], "framework::Config");
//! assert!(!settings.allow_override);
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

/// Aliases every container starts with unless configured otherwise.
pub const FRAMEWORK_ALIASES: [(&str, &str); 8] = [
    ("application", "framework::Application"),
    ("config", "framework::Config"),
    ("env", "framework::Env"),
    ("request", "framework::Request"),
    ("session", "framework::Session"),
    ("route", "framework::Route"),
    ("middleware", "framework::Middleware"),
    ("hook", "framework::Hook"),
];

/// Settings applied when a container is built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContainerSettings {
    /// Alias → class identifier table the container is seeded with.
    pub aliases: BTreeMap<String, String>,
    /// Allow registering a class identifier that already exists.
    pub allow_override: bool,
    /// Check the declared-type graph when the container is built.
    ///
    /// On by default, which is stricter than resolution: a declared type
    /// must be registered (and instantiable) at build time even if it is
    /// added later with `Container::register` or always supplied by the
    /// caller. Turn it off to let such classes fail lazily with
    /// `ClassNotFound` when they are resolved.
    pub validate_on_build: bool,
}

impl Default for ContainerSettings {
    fn default() -> Self {
        Self {
            aliases: framework_aliases(),
            allow_override: false,
            validate_on_build: true,
        }
    }
}

impl ContainerSettings {
    /// Settings with an empty alias table.
    pub fn without_aliases() -> Self {
        Self {
            aliases: BTreeMap::new(),
            ..Self::default()
        }
    }

    /// Adds or replaces one alias.
    pub fn alias(mut self, alias: impl Into<String>, class: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), class.into());
        self
    }
}

/// [`FRAMEWORK_ALIASES`] as an owned table.
pub fn framework_aliases() -> BTreeMap<String, String> {
    FRAMEWORK_ALIASES
        .iter()
        .map(|(alias, class)| (alias.to_string(), class.to_string()))
        .collect()
}
