//! Resolution scopes.
//!
//! The container knows exactly two lifetimes:
//! - [`Scope::Singleton`]: served from the instance cache, built once
//! - [`Scope::Transient`]: always freshly built, never cached
use std::fmt;

/// How a single resolution treats the instance cache.
///
/// # Examples
/// ```
/// use autowire_container::scope::Scope;
///
/// assert!(Scope::Singleton.is_cached());
/// assert!(!Scope::Transient.is_cached());
/// assert_eq!(Scope::default(), Scope::Singleton);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    /// Read the cache, and publish a newly built instance into it.
    ///
    /// Nested constructor dependencies are always resolved this way.
    #[default]
    Singleton,

    /// Bypass the cache entirely: neither read nor populate it.
    ///
    /// Replaces the "pass `true` instead of an argument map" convention.
    Transient,
}

impl Scope {
    /// Returns `true` if this scope reads and writes the instance cache.
    #[inline]
    pub fn is_cached(&self) -> bool {
        matches!(self, Scope::Singleton)
    }

    /// Maps a `force_new` flag onto a scope.
    #[inline]
    pub fn from_force_new(force_new: bool) -> Self {
        if force_new {
            Scope::Transient
        } else {
            Scope::Singleton
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Singleton => write!(f, "Singleton"),
            Scope::Transient => write!(f, "Transient"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_from_force_new() {
        assert_eq!(Scope::from_force_new(true), Scope::Transient);
        assert_eq!(Scope::from_force_new(false), Scope::Singleton);
    }

    #[test]
    fn scope_display() {
        assert_eq!(format!("{}", Scope::Singleton), "Singleton");
        assert_eq!(format!("{}", Scope::Transient), "Transient");
    }
}
