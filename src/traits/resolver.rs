//! Resolver traits for service resolution.

use std::any::TypeId;
use std::sync::Arc;

use crate::error::DiResult;
use crate::key::Key;

/// Core resolver trait for object-safe service resolution.
///
/// Handles the low-level mechanics: type-erased resolution with
/// circular dependency detection, and the satisfiability probe
/// constructor selection relies on. Most callers want the generic
/// methods on [`Resolver`] instead.
pub trait ResolverCore: Send + Sync {
    /// Resolves a single service as a type-erased `Arc`.
    ///
    /// This is the core resolution method; it applies the registered
    /// lifetime, follows interface-capability matches, and detects
    /// cycles via the thread-local resolution stack.
    fn resolve_any(&self, key: &Key) -> DiResult<Arc<dyn std::any::Any + Send + Sync>>;

    /// Reports whether a key is satisfiable by the current registrations.
    ///
    /// True on an exact match or a unique interface-capability match;
    /// false when nothing matches. An ambiguous interface match is an
    /// error, not `false` — silently skipping it would hide a real
    /// misconfiguration.
    fn can_resolve(&self, key: &Key) -> DiResult<bool>;
}

/// High-level resolver interface with generic, type-safe methods.
///
/// Implemented by [`ServiceProvider`](crate::ServiceProvider),
/// [`Scope`](crate::Scope), and the [`ResolverContext`](crate::ResolverContext)
/// handed to factories and constructors, making them interchangeable at
/// resolution sites.
///
/// # Examples
///
/// ```rust
/// use crucible_di::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// trait Logger: Send + Sync {
///     fn log(&self, msg: &str);
/// }
///
/// struct ConsoleLogger;
/// impl Logger for ConsoleLogger {
///     fn log(&self, msg: &str) {
///         println!("LOG: {}", msg);
///     }
/// }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(42usize);
/// services.add_singleton_trait::<dyn Logger>(Arc::new(ConsoleLogger));
///
/// let provider = services.build();
///
/// let number = provider.get_required::<usize>();
/// assert_eq!(*number, 42);
///
/// let logger = provider.get_required_trait::<dyn Logger>();
/// logger.log("resolved");
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves a concrete service type.
    fn get<T: 'static + Send + Sync>(&self) -> DiResult<Arc<T>> {
        let key = Key::Type(TypeId::of::<T>(), std::any::type_name::<T>());
        let any = self.resolve_any(&key)?;
        any.downcast::<T>()
            .map_err(|_| crate::error::DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a capability interface.
    ///
    /// Served by an exact trait registration, or by the unique concrete
    /// registration whose capability set contains the interface.
    fn get_trait<T: ?Sized + 'static + Send + Sync>(&self) -> DiResult<Arc<T>>
    where
        Arc<T>: 'static,
    {
        let key = Key::Trait(std::any::type_name::<T>());
        let any = self.resolve_any(&key)?;
        // Trait objects are stored as Arc<Arc<dyn T>> inside the Any
        any.downcast::<Arc<T>>()
            .map(|boxed| (*boxed).clone())
            .map_err(|_| crate::error::DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a concrete service type, panicking on failure.
    ///
    /// For call sites where an unresolvable service is a configuration
    /// bug rather than a recoverable condition.
    fn get_required<T: 'static + Send + Sync>(&self) -> Arc<T> {
        self.get::<T>().unwrap_or_else(|e| {
            panic!(
                "required service {} failed to resolve: {}",
                std::any::type_name::<T>(),
                e
            )
        })
    }

    /// Resolves a capability interface, panicking on failure.
    fn get_required_trait<T: ?Sized + 'static + Send + Sync>(&self) -> Arc<T>
    where
        Arc<T>: 'static,
    {
        self.get_trait::<T>().unwrap_or_else(|e| {
            panic!(
                "required service {} failed to resolve: {}",
                std::any::type_name::<T>(),
                e
            )
        })
    }
}
