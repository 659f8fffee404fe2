//! Service provider: the resolution façade.
//!
//! The [`ServiceProvider`] composes the registry, the singleton cache,
//! and the ambient root scope frame, and exposes the two top-level
//! resolution entry points: ambient resolution (`get` and friends) and
//! fresh-scope resolution ([`make`](ServiceProvider::make)).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, trace};

use crate::construct::{construct, Injectable};
use crate::error::{DiError, DiResult};
use crate::internal::with_circular_catch;
use crate::key::{key_of, Key};
use crate::lifetime::Lifetime;
use crate::registration::{AnyArc, Found, Registration, Registry};
use crate::traits::{Resolver, ResolverCore};

pub mod context;
pub mod scope;

pub use context::ResolverContext;
pub use scope::Scope;

/// Service provider for resolving dependencies from the container.
///
/// Resolves services according to their registered lifetimes and owns
/// the singleton cache and the ambient root scope frame for the whole
/// of its lifetime.
///
/// # Thread Safety
///
/// The provider is fully thread-safe and clones cheaply (`Arc`
/// internally). Concurrent first requests for the same singleton run
/// exactly one constructor; every caller observes the same instance.
///
/// # Examples
///
/// ```rust
/// use crucible_di::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Database { url: "postgres://localhost".to_string() });
/// services.add_transient_factory::<UserService, _>(|resolver| {
///     UserService { db: resolver.get_required::<Database>() }
/// });
///
/// let provider = services.build();
/// let user_service = provider.get_required::<UserService>();
/// assert_eq!(user_service.db.url, "postgres://localhost");
/// ```
pub struct ServiceProvider {
    inner: Arc<ProviderInner>,
}

pub(crate) struct ProviderInner {
    pub(crate) registry: Registry,
    /// Ambient root frame: scoped services requested outside any
    /// explicit scope cache here for the provider's lifetime
    pub(crate) root_frame: Mutex<HashMap<Key, AnyArc>>,
}

impl ServiceProvider {
    pub(crate) fn new(registry: Registry) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                registry,
                root_frame: Mutex::new(HashMap::new()),
            }),
        }
    }

    #[inline]
    pub(crate) fn inner(&self) -> &ProviderInner {
        &self.inner
    }

    /// Creates a new scope for resolving scoped services.
    ///
    /// Each scope maintains its own cache for scoped services while
    /// singletons stay shared with the root provider.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use crucible_di::{ServiceCollection, Resolver};
    /// use std::sync::Arc;
    ///
    /// struct Session { id: u64 }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_scoped_factory::<Session, _>(|_| Session { id: 1 });
    ///
    /// let provider = services.build();
    /// let scope = provider.create_scope();
    ///
    /// let a = scope.get_required::<Session>();
    /// let b = scope.get_required::<Session>();
    /// assert!(Arc::ptr_eq(&a, &b));
    /// ```
    pub fn create_scope(&self) -> Scope {
        Scope {
            root: self.clone(),
            frame: Mutex::new(HashMap::new()),
        }
    }

    /// Resolves `T` inside a scope frame opened for this call alone.
    ///
    /// The frame is discarded when the call returns: singleton
    /// dependencies reached from inside are still shared with the rest
    /// of the container, while scoped dependencies are fresh on every
    /// call and never shared with ambient resolutions.
    ///
    /// `T` itself need not be registered — an unregistered type is
    /// built directly through constructor selection, using registered
    /// collaborators for its parameters. A registered `T` resolves with
    /// its declared lifetime, inside the fresh frame.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use crucible_di::{Constructor, Injectable, Lifetime, Resolver, ServiceCollection, key_of};
    /// use std::sync::Arc;
    ///
    /// struct Conn { id: u8 }
    /// impl Injectable for Conn {
    ///     fn constructors() -> Vec<Constructor<Self>> {
    ///         vec![Constructor::new(vec![], |_| Ok(Conn { id: 3 }))]
    ///     }
    /// }
    ///
    /// struct Report { conn: Arc<Conn> }
    /// impl Injectable for Report {
    ///     fn constructors() -> Vec<Constructor<Self>> {
    ///         vec![Constructor::new(vec![key_of::<Conn>()], |r| {
    ///             Ok(Report { conn: r.get::<Conn>()? })
    ///         })]
    ///     }
    /// }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.register::<Conn>(Lifetime::Scoped);
    ///
    /// let provider = services.build();
    /// // Report is not registered; its scoped Conn is fresh per call
    /// let r1 = provider.make::<Report>().unwrap();
    /// let r2 = provider.make::<Report>().unwrap();
    /// assert!(!Arc::ptr_eq(&r1.conn, &r2.conn));
    /// ```
    pub fn make<T: Injectable>(&self) -> DiResult<Arc<T>> {
        let scope = self.create_scope();
        let key = key_of::<T>();

        if self.inner.registry.contains_key(&key) {
            trace!(service = key.display_name(), "make: resolving registered type in fresh scope");
            scope.get::<T>()
        } else {
            trace!(service = key.display_name(), "make: constructing unregistered type in fresh scope");
            with_circular_catch(key.display_name(), || {
                let ctx = ResolverContext::new(&scope);
                construct::<T>(&ctx).map(Arc::new)
            })
        }
    }

    /// Build-or-wait singleton resolution on the registration's cell.
    ///
    /// Singleton constructors always run against the root provider, so
    /// a singleton can never capture another frame's scoped state.
    pub(crate) fn resolve_singleton(&self, reg: &Registration, key: &Key) -> DiResult<AnyArc> {
        if let Some(cell) = &reg.single_cell {
            if let Some(value) = cell.get() {
                return Ok(value.clone());
            }

            let ctx = ResolverContext::new(self);
            let value = cell.get_or_try_init(|| {
                debug!(service = key.display_name(), "constructing singleton");
                (reg.ctor)(&ctx)
            })?;
            Ok(value.clone())
        } else {
            let ctx = ResolverContext::new(self);
            (reg.ctor)(&ctx)
        }
    }

    /// Scoped resolution against the ambient root frame.
    ///
    /// The frame lock is never held across a constructor call; a racing
    /// insert keeps the first value in.
    fn resolve_scoped_root(&self, reg: &Registration, key: &Key) -> DiResult<AnyArc> {
        {
            let frame = self.inner.root_frame.lock().unwrap();
            if let Some(cached) = frame.get(key) {
                return Ok(cached.clone());
            }
        }

        let ctx = ResolverContext::new(self);
        let value = (reg.ctor)(&ctx)?;

        let mut frame = self.inner.root_frame.lock().unwrap();
        if let Some(existing) = frame.get(key) {
            Ok(existing.clone())
        } else {
            frame.insert(key.clone(), value.clone());
            Ok(value)
        }
    }

    fn resolve_registration(&self, reg: &Registration, key: &Key) -> DiResult<AnyArc> {
        match reg.lifetime {
            Lifetime::Singleton => self.resolve_singleton(reg, key),
            Lifetime::Scoped => self.resolve_scoped_root(reg, key),
            Lifetime::Transient => {
                let ctx = ResolverContext::new(self);
                (reg.ctor)(&ctx)
            }
        }
    }

    fn resolve_any_impl(&self, key: &Key) -> DiResult<AnyArc> {
        match self.inner.registry.lookup(key)? {
            Some(Found::Direct(reg)) => self.resolve_registration(reg, key),
            Some(Found::Cast {
                concrete,
                registration,
                binding,
            }) => {
                // The concrete type gets its own stack entry: a cycle
                // that re-enters through the interface must be detected
                // before touching the singleton cell again
                let value = with_circular_catch(concrete.display_name(), || {
                    self.resolve_registration(registration, &concrete)
                })?;
                binding.apply(value)
            }
            None => Err(DiError::Unresolvable(key.display_name())),
        }
    }
}

impl ResolverCore for ServiceProvider {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        with_circular_catch(key.display_name(), || self.resolve_any_impl(key))
    }

    fn can_resolve(&self, key: &Key) -> DiResult<bool> {
        Ok(self.inner.registry.lookup(key)?.is_some())
    }
}

impl Resolver for ServiceProvider {}

impl Clone for ServiceProvider {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for ServiceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceProvider")
            .field("registered", &self.inner.registry.len())
            .finish()
    }
}
