//! Error types for container operations.
//!
//! Every failure names the class, parameter or method involved so the
//! caller can register the missing class or supply the missing argument.

use std::fmt;

use autowire_support::rendering::render_chain;

/// Main error type for all container operations.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// The class identifier cannot be introspected or instantiated.
    #[error("{}", .0)]
    ClassNotFound(ClassNotFoundError),

    /// A parameter has no supplied value, no autowirable type and no default.
    #[error("{}", .0)]
    MissingArgument(MissingArgumentError),

    /// A class (transitively) requires itself.
    #[error("{}", .0)]
    CyclicDependency(CyclicDependencyError),

    /// The construction closure of a class reported a failure.
    #[error("Failed to construct {class}: {source}")]
    ConstructionFailed {
        class: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A bound argument was read back as the wrong type.
    #[error("Argument `{parameter}` holds {found}, expected {expected}")]
    InvalidArgument {
        parameter: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A resolved instance is not of the requested type.
    #[error("Resolved {key} as {found}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// No method with that name is registered for the instance's type.
    #[error("Call to undefined method {type_name}::{method}()")]
    MethodNotFound {
        type_name: &'static str,
        method: String,
    },

    /// A class with the same identifier is already registered.
    #[error("{}", .0)]
    AlreadyRegistered(AlreadyRegisteredError),
}

impl ContainerError {
    /// Wrap a foreign error raised while constructing `class`.
    pub fn construction(
        class: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ConstructionFailed {
            class: class.into(),
            source: source.into(),
        }
    }

    pub(crate) fn class_not_found(
        class: &str,
        cause: impl Into<String>,
        suggestions: Vec<String>,
    ) -> Self {
        Self::ClassNotFound(ClassNotFoundError {
            class: class.to_string(),
            cause: cause.into(),
            suggestions,
        })
    }

    pub(crate) fn missing_argument(parameter: &str, owner: &str) -> Self {
        Self::MissingArgument(MissingArgumentError {
            parameter: parameter.to_string(),
            owner: owner.to_string(),
        })
    }
}

/// The requested class is unknown or cannot be instantiated.
#[derive(Debug)]
pub struct ClassNotFoundError {
    /// Identifier that was requested (after alias mapping).
    pub class: String,
    /// Why introspection or instantiation failed.
    pub cause: String,
    /// Registered classes with similar identifiers.
    pub suggestions: Vec<String>,
}

impl fmt::Display for ClassNotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Class Not Found: {} ({})", self.class, self.cause)?;

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        Ok(())
    }
}

/// A required parameter could not be bound.
#[derive(Debug)]
pub struct MissingArgumentError {
    /// Name of the unbound parameter.
    pub parameter: String,
    /// Class or `Type::method` whose signature declares it.
    pub owner: String,
}

impl fmt::Display for MissingArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The param of the method is missed: {} (required by {})",
            self.parameter, self.owner
        )?;
        write!(
            f,
            "\n  Hint: pass `{}` in the arguments, give it a default, or declare a registered class type",
            self.parameter
        )
    }
}

/// Resolution re-entered a class that is still under construction.
#[derive(Debug)]
pub struct CyclicDependencyError {
    /// The classes forming the cycle, first and last entries equal.
    pub chain: Vec<String>,
}

impl fmt::Display for CyclicDependencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cyclic dependency detected:\n  {}", render_chain(&self.chain))?;
        write!(
            f,
            "\n  Hint: supply one of the parameters explicitly or restructure the constructors"
        )
    }
}

/// Registering a class identifier twice without override enabled.
#[derive(Debug)]
pub struct AlreadyRegisteredError {
    pub class: String,
}

impl fmt::Display for AlreadyRegisteredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Class already registered: {}", self.class)?;
        write!(
            f,
            "\n  Hint: enable allow_override in the container settings to replace it"
        )
    }
}

/// Convenient Result type for container operations.
pub type Result<T> = std::result::Result<T, ContainerError>;
