//! Declarative lifetime markers for bulk registration.
//!
//! A type announces its desired lifetime by implementing [`Service`];
//! callers then hand a list of [`MarkedType`] candidates to
//! [`register_marked`](crate::ServiceCollection::register_marked)
//! instead of writing one explicit registration per type.

use crate::construct::Injectable;
use crate::lifetime::Lifetime;
use crate::ServiceCollection;

/// Lifetime marker for a constructible type.
///
/// The associated const defaults to [`Lifetime::Singleton`], matching
/// the behavior of a marker with no explicit lifetime.
///
/// # Examples
///
/// ```rust
/// use crucible_di::{Constructor, Injectable, Lifetime, MarkedType, Resolver, Service, ServiceCollection};
///
/// struct Clock;
/// impl Injectable for Clock {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::new(vec![], |_| Ok(Clock))]
///     }
/// }
/// impl Service for Clock {} // Singleton by default
///
/// struct Ticket;
/// impl Injectable for Ticket {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::new(vec![], |_| Ok(Ticket))]
///     }
/// }
/// impl Service for Ticket {
///     const LIFETIME: Lifetime = Lifetime::Transient;
/// }
///
/// let mut services = ServiceCollection::new();
/// services.register_marked([MarkedType::of::<Clock>(), MarkedType::of::<Ticket>()]);
///
/// let provider = services.build();
/// assert!(provider.get::<Clock>().is_ok());
/// ```
pub trait Service: Injectable {
    /// The lifetime this type requests when registered by marker.
    const LIFETIME: Lifetime = Lifetime::Singleton;
}

/// A registration candidate reified from a marked type.
///
/// Plain metadata: the type's name, its declared lifetime, and a
/// registration thunk. Consumed by
/// [`register_marked`](crate::ServiceCollection::register_marked).
pub struct MarkedType {
    type_name: &'static str,
    lifetime: Lifetime,
    register: fn(&mut ServiceCollection),
}

impl MarkedType {
    /// Reify the marker carried by `T`.
    pub fn of<T: Service>() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            lifetime: T::LIFETIME,
            register: |services: &mut ServiceCollection| {
                services.register::<T>(T::LIFETIME);
            },
        }
    }

    /// The candidate's type name.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The lifetime the marker declares.
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    pub(crate) fn apply(&self, services: &mut ServiceCollection) {
        (self.register)(services);
    }
}

impl std::fmt::Debug for MarkedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkedType")
            .field("type_name", &self.type_name)
            .field("lifetime", &self.lifetime)
            .finish()
    }
}
