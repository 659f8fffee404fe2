//! Error types for the dependency injection container.

use thiserror::Error;

/// Dependency injection errors.
///
/// Every variant aborts only the enclosing top-level resolution call.
/// The registry, singleton cache, and other scope frames are untouched,
/// so an independent resolution may still succeed afterwards.
///
/// # Examples
///
/// ```rust
/// use crucible_di::{DiError, ServiceCollection, Resolver};
///
/// let provider = ServiceCollection::new().build();
/// match provider.get::<String>() {
///     Err(DiError::Unresolvable(type_name)) => {
///         assert_eq!(type_name, "alloc::string::String");
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiError {
    /// No registration and no viable constructor for the requested type.
    #[error("no registration or viable constructor for {0}")]
    Unresolvable(&'static str),
    /// An interface request matched more than one registered concrete type.
    #[error("ambiguous registration for {requested}: matched by {candidates:?}")]
    AmbiguousRegistration {
        /// The requested interface name.
        requested: &'static str,
        /// The concrete registrations whose capability sets matched.
        candidates: Vec<&'static str>,
    },
    /// Two or more viable constructor overloads of equal, maximal parameter count.
    #[error("ambiguous constructors for {type_name}: multiple viable overloads with {arity} parameter(s)")]
    AmbiguousConstructor {
        /// The type whose overloads tied.
        type_name: &'static str,
        /// The tied parameter count.
        arity: usize,
    },
    /// A type was reached again while already under construction (includes the full path).
    #[error("circular dependency: {}", .0.join(" -> "))]
    Circular(Vec<&'static str>),
    /// Type downcast failed.
    #[error("type mismatch for {0}")]
    TypeMismatch(&'static str),
    /// Maximum recursion depth exceeded.
    #[error("max resolution depth {0} exceeded")]
    DepthExceeded(usize),
}

/// Result type for DI operations.
pub type DiResult<T> = Result<T, DiError>;
