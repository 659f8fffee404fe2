//! Service descriptors for introspection and diagnostics.

use std::any::TypeId;
use crate::key::Key;
use crate::lifetime::Lifetime;

/// How a registration produces instances.
///
/// Exactly one strategy is active per registration: a fixed instance,
/// a factory closure, or construction via constructor selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// A pre-built instance shared as-is.
    Instance,
    /// A factory closure invoked with the resolver.
    Factory,
    /// Built by selecting among the type's declared constructors.
    Constructor,
}

/// Service descriptor for introspection and diagnostics.
///
/// Describes one registration: the requested key, its lifetime, and the
/// construction strategy. Useful for debugging a container's
/// configuration or verifying registrations at startup.
///
/// # Examples
///
/// ```rust
/// use crucible_di::{ServiceCollection, Lifetime, Strategy};
///
/// struct Repo { name: String }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(42u32);
/// services.add_scoped_factory::<Repo, _>(|_| Repo { name: "users".into() });
///
/// let descriptors = services.descriptors();
/// assert_eq!(descriptors.len(), 2);
///
/// let repo = descriptors.iter()
///     .find(|d| d.type_name().contains("Repo"))
///     .unwrap();
/// assert_eq!(repo.lifetime, Lifetime::Scoped);
/// assert_eq!(repo.strategy, Strategy::Factory);
/// ```
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    /// The service key resolution happens against.
    pub key: Key,
    /// Service lifetime.
    pub lifetime: Lifetime,
    /// Construction strategy.
    pub strategy: Strategy,
    /// Implementation type ID, when the concrete type is known.
    pub impl_type_id: Option<TypeId>,
}

impl ServiceDescriptor {
    /// Get the type or trait name this descriptor is keyed by.
    pub fn type_name(&self) -> &'static str {
        self.key.display_name()
    }
}
