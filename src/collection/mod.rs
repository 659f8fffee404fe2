//! Service collection: the registration façade.
//!
//! All registration happens here, during the configuration phase;
//! [`build`](ServiceCollection::build) then hands the finished registry
//! to an immutable, shareable [`ServiceProvider`](crate::ServiceProvider).

use std::any::TypeId;
use std::sync::Arc;

use tracing::debug;

use crate::construct::{construct, Injectable};
use crate::descriptors::{ServiceDescriptor, Strategy};
use crate::error::DiResult;
use crate::key::{key_of, key_of_trait, Key};
use crate::lifetime::Lifetime;
use crate::marked::MarkedType;
use crate::provider::ResolverContext;
use crate::registration::{AnyArc, Registration, Registry};
use crate::ServiceProvider;

pub mod module_system;
pub use module_system::*;

/// Mutable collection of service registrations.
///
/// Registration is last-write-wins: re-registering a key replaces the
/// previous descriptor, never merges with it.
///
/// # Examples
///
/// ```rust
/// use crucible_di::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Config { port: u16 }
/// struct Server { config: Arc<Config> }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Config { port: 8080 });
/// services.add_singleton_factory::<Server, _>(|r| Server {
///     config: r.get_required::<Config>(),
/// });
///
/// let provider = services.build();
/// let server = provider.get_required::<Server>();
/// assert_eq!(server.config.port, 8080);
/// ```
pub struct ServiceCollection {
    registry: Registry,
}

impl ServiceCollection {
    /// Creates a new empty service collection.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    // ----- Injectable Registrations -----

    /// Registers `T` with the constructible strategy.
    ///
    /// Instances are built by selecting among `T`'s declared
    /// constructor overloads at resolution time, and `T`'s capability
    /// interfaces become resolvable keys for it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use crucible_di::{Constructor, Injectable, Lifetime, Resolver, ServiceCollection};
    ///
    /// struct Cache;
    /// impl Injectable for Cache {
    ///     fn constructors() -> Vec<Constructor<Self>> {
    ///         vec![Constructor::new(vec![], |_| Ok(Cache))]
    ///     }
    /// }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.register::<Cache>(Lifetime::Singleton);
    ///
    /// let provider = services.build();
    /// assert!(provider.get::<Cache>().is_ok());
    /// ```
    pub fn register<T: Injectable>(&mut self, lifetime: Lifetime) -> &mut Self {
        let ctor = |r: &ResolverContext<'_>| -> DiResult<AnyArc> {
            construct::<T>(r).map(|value| Arc::new(value) as AnyArc)
        };
        self.registry.insert(
            key_of::<T>(),
            Registration::with_interfaces(
                lifetime,
                Strategy::Constructor,
                Arc::new(ctor),
                Some(TypeId::of::<T>()),
                T::interfaces(),
            ),
        );
        self
    }

    /// Registers `T` with a fallible factory closure.
    ///
    /// The closure receives the resolver, so it may resolve other
    /// services while constructing its value. `T`'s capability
    /// interfaces become resolvable keys for it.
    pub fn register_with<T, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        T: Injectable,
        F: for<'a> Fn(&ResolverContext<'a>) -> DiResult<T> + Send + Sync + 'static,
    {
        let ctor = move |r: &ResolverContext<'_>| -> DiResult<AnyArc> {
            factory(r).map(|value| Arc::new(value) as AnyArc)
        };
        self.registry.insert(
            key_of::<T>(),
            Registration::with_interfaces(
                lifetime,
                Strategy::Factory,
                Arc::new(ctor),
                Some(TypeId::of::<T>()),
                T::interfaces(),
            ),
        );
        self
    }

    /// Registers a pre-built instance of `T` as a singleton.
    ///
    /// `T`'s capability interfaces become resolvable keys for it.
    pub fn register_instance<T: Injectable>(&mut self, value: T) -> &mut Self {
        let arc = Arc::new(value);
        let ctor = move |_: &ResolverContext<'_>| -> DiResult<AnyArc> { Ok(arc.clone()) };
        self.registry.insert(
            key_of::<T>(),
            Registration::with_interfaces(
                Lifetime::Singleton,
                Strategy::Instance,
                Arc::new(ctor),
                Some(TypeId::of::<T>()),
                T::interfaces(),
            ),
        );
        self
    }

    /// Bulk registration driven by each candidate's lifetime marker.
    ///
    /// Every candidate is registered with the constructible strategy
    /// under the lifetime its [`Service`](crate::Service) marker
    /// declares.
    pub fn register_marked<I>(&mut self, candidates: I) -> &mut Self
    where
        I: IntoIterator<Item = MarkedType>,
    {
        for candidate in candidates {
            debug!(
                service = candidate.type_name(),
                lifetime = ?candidate.lifetime(),
                "registering marked type"
            );
            candidate.apply(self);
        }
        self
    }

    // ----- Concrete Type Registrations -----

    /// Registers a singleton instance shared across the entire container.
    ///
    /// For types with capability interfaces, prefer
    /// [`register_instance`](Self::register_instance).
    pub fn add_singleton<T: 'static + Send + Sync>(&mut self, value: T) -> &mut Self {
        let arc = Arc::new(value);
        let ctor = move |_: &ResolverContext<'_>| -> DiResult<AnyArc> { Ok(arc.clone()) };
        self.registry.insert(
            key_of::<T>(),
            Registration::with_interfaces(
                Lifetime::Singleton,
                Strategy::Instance,
                Arc::new(ctor),
                Some(TypeId::of::<T>()),
                Vec::new(),
            ),
        );
        self
    }

    /// Registers a singleton factory, called once on first request.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use crucible_di::{ServiceCollection, Resolver};
    /// # use std::sync::Arc;
    /// struct Database { url: String }
    /// struct UserService { db: Arc<Database> }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_singleton(Database { url: "postgres://localhost".to_string() });
    /// services.add_singleton_factory::<UserService, _>(|resolver| {
    ///     UserService {
    ///         db: resolver.get_required::<Database>(),
    ///     }
    /// });
    /// ```
    pub fn add_singleton_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Singleton, factory)
    }

    /// Registers a scoped factory: one instance per scope frame.
    pub fn add_scoped_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Scoped, factory)
    }

    /// Registers a transient factory: a new instance on every request.
    pub fn add_transient_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> T + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Transient, factory)
    }

    fn add_factory<T, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> T + Send + Sync + 'static,
    {
        let ctor = move |r: &ResolverContext<'_>| -> DiResult<AnyArc> {
            Ok(Arc::new(factory(r)) as AnyArc)
        };
        self.registry.insert(
            key_of::<T>(),
            Registration::with_interfaces(
                lifetime,
                Strategy::Factory,
                Arc::new(ctor),
                Some(TypeId::of::<T>()),
                Vec::new(),
            ),
        );
        self
    }

    // ----- Trait Registrations -----

    /// Registers a singleton trait implementation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use crucible_di::{ServiceCollection, Resolver};
    /// # use std::sync::Arc;
    /// trait Logger: Send + Sync {
    ///     fn log(&self, message: &str);
    /// }
    ///
    /// struct FileLogger { path: String }
    /// impl Logger for FileLogger {
    ///     fn log(&self, _message: &str) {}
    /// }
    ///
    /// let mut services = ServiceCollection::new();
    /// let logger = Arc::new(FileLogger { path: "/var/log/app.log".to_string() });
    /// services.add_singleton_trait::<dyn Logger>(logger);
    /// ```
    pub fn add_singleton_trait<T>(&mut self, value: Arc<T>) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
    {
        // Stored as Arc<Arc<dyn T>> so the trait object survives type erasure
        let any_arc: AnyArc = Arc::new(value);
        let ctor = move |_: &ResolverContext<'_>| -> DiResult<AnyArc> { Ok(any_arc.clone()) };
        self.registry.insert(
            key_of_trait::<T>(),
            Registration::new(Lifetime::Singleton, Strategy::Instance, Arc::new(ctor)),
        );
        self
    }

    /// Registers a singleton trait factory.
    pub fn add_singleton_trait_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> Arc<T> + Send + Sync + 'static,
    {
        self.add_trait_factory(Lifetime::Singleton, factory)
    }

    /// Registers a scoped trait factory.
    pub fn add_scoped_trait_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> Arc<T> + Send + Sync + 'static,
    {
        self.add_trait_factory(Lifetime::Scoped, factory)
    }

    /// Registers a transient trait factory.
    pub fn add_transient_trait_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> Arc<T> + Send + Sync + 'static,
    {
        self.add_trait_factory(Lifetime::Transient, factory)
    }

    fn add_trait_factory<T, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> Arc<T> + Send + Sync + 'static,
    {
        let ctor = move |r: &ResolverContext<'_>| -> DiResult<AnyArc> {
            Ok(Arc::new(factory(r)) as AnyArc)
        };
        self.registry.insert(
            key_of_trait::<T>(),
            Registration::new(lifetime, Strategy::Factory, Arc::new(ctor)),
        );
        self
    }

    // ----- Introspection and Build -----

    /// Service descriptors for every registration, for diagnostics.
    pub fn descriptors(&self) -> Vec<ServiceDescriptor> {
        self.registry
            .iter()
            .map(|(key, registration)| ServiceDescriptor {
                key: key.clone(),
                lifetime: registration.lifetime,
                strategy: registration.strategy,
                impl_type_id: registration.impl_id,
            })
            .collect()
    }

    /// Whether a registration exists for the key.
    pub fn contains(&self, key: &Key) -> bool {
        self.registry.contains_key(key)
    }

    /// Builds the immutable service provider.
    pub fn build(self) -> ServiceProvider {
        debug!(registered = self.registry.len(), "building service provider");
        ServiceProvider::new(self.registry)
    }
}

impl Default for ServiceCollection {
    fn default() -> Self {
        Self::new()
    }
}
