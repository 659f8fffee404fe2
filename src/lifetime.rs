//! Service lifetime definitions.

/// Service lifetimes controlling instance caching behavior.
///
/// Defines how service instances are created, cached, and shared within
/// the container. The lifetime is fixed at registration time, either by
/// an explicit argument or by a type's [`Service`](crate::Service) marker.
///
/// # Examples
///
/// ```rust
/// use crucible_di::{ServiceCollection, Resolver, Lifetime};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct AuditEntry { id: u32 }
///
/// let mut services = ServiceCollection::new();
///
/// // Singleton: one instance for the life of the provider
/// services.add_singleton(Database {
///     url: "postgres://localhost".to_string(),
/// });
///
/// // Transient: new instance every resolution
/// services.add_transient_factory::<AuditEntry, _>(|_| AuditEntry { id: 7 });
///
/// let provider = services.build();
///
/// let db1 = provider.get_required::<Database>();
/// let db2 = provider.get_required::<Database>();
/// assert!(Arc::ptr_eq(&db1, &db2)); // Same instance
///
/// let e1 = provider.get_required::<AuditEntry>();
/// let e2 = provider.get_required::<AuditEntry>();
/// assert!(!Arc::ptr_eq(&e1, &e2)); // Always different
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// Single instance per provider, cached forever.
    ///
    /// Built once on first request and shared across all scopes and
    /// threads for the life of the container.
    Singleton,
    /// Single instance per scope frame, cached for the frame's lifetime.
    ///
    /// Requests within one frame share an instance; a new frame (an
    /// explicit scope or a [`make`](crate::ServiceProvider::make) call)
    /// starts with an empty cache.
    Scoped,
    /// New instance per resolution, never cached.
    Transient,
}
