//! Service registration types and the registry store.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, trace};

use crate::construct::InterfaceBinding;
use crate::descriptors::Strategy;
use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::provider::ResolverContext;

// Type-erased Arc for storage
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

// Type-erased construction closure
pub(crate) type CtorFn =
    Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> DiResult<AnyArc> + Send + Sync>;

/// Service registration with lifetime, strategy, and constructor
pub(crate) struct Registration {
    pub(crate) lifetime: Lifetime,
    pub(crate) strategy: Strategy,
    pub(crate) ctor: CtorFn,
    /// Implementation type ID for diagnostics, when the concrete type is known
    pub(crate) impl_id: Option<TypeId>,
    /// Capability interfaces the concrete type satisfies, precomputed at
    /// registration time so interface lookups are a membership scan
    pub(crate) interfaces: Vec<InterfaceBinding>,
    /// Build-once cell: concurrent first requests for a singleton run
    /// exactly one constructor, everyone else waits and shares the result
    pub(crate) single_cell: Option<OnceCell<AnyArc>>,
}

impl Registration {
    pub(crate) fn new(lifetime: Lifetime, strategy: Strategy, ctor: CtorFn) -> Self {
        let single_cell = match lifetime {
            Lifetime::Singleton => Some(OnceCell::new()),
            _ => None,
        };

        Self {
            lifetime,
            strategy,
            ctor,
            impl_id: None,
            interfaces: Vec::new(),
            single_cell,
        }
    }

    pub(crate) fn with_interfaces(
        lifetime: Lifetime,
        strategy: Strategy,
        ctor: CtorFn,
        impl_id: Option<TypeId>,
        interfaces: Vec<InterfaceBinding>,
    ) -> Self {
        let mut reg = Self::new(lifetime, strategy, ctor);
        reg.impl_id = impl_id;
        reg.interfaces = interfaces;
        reg
    }
}

/// Outcome of a registry lookup.
pub(crate) enum Found<'a> {
    /// Exact key match.
    Direct(&'a Registration),
    /// Interface request served by a concrete registration's capability set.
    Cast {
        /// Key of the concrete registration; lifetime caches index by it
        /// so concrete and interface requests share one instance.
        concrete: Key,
        registration: &'a Registration,
        binding: &'a InterfaceBinding,
    },
}

/// Owning store of registrations, keyed by requested type.
///
/// Mutated only while the collection is being configured; immutable and
/// shared once the provider is built.
pub(crate) struct Registry {
    entries: HashMap<Key, Registration>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Inserts a registration. Last write wins; replacement is silent.
    pub(crate) fn insert(&mut self, key: Key, registration: Registration) {
        debug!(
            service = key.display_name(),
            lifetime = ?registration.lifetime,
            strategy = ?registration.strategy,
            "registered service"
        );
        self.entries.insert(key, registration);
    }

    pub(crate) fn contains_key(&self, key: &Key) -> bool {
        self.entries.contains_key(key)
    }

    /// Looks up the registration for a key.
    ///
    /// An exact match always wins. Failing that, a trait key is matched
    /// against every registration's capability set: exactly one hit
    /// resolves through that concrete type, more than one is an
    /// ambiguity error.
    pub(crate) fn lookup(&self, key: &Key) -> DiResult<Option<Found<'_>>> {
        if let Some(reg) = self.entries.get(key) {
            return Ok(Some(Found::Direct(reg)));
        }

        if let Key::Trait(_) = key {
            let mut hits = Vec::new();
            for (concrete, reg) in &self.entries {
                if let Some(binding) = reg.interfaces.iter().find(|b| b.key() == key) {
                    hits.push((concrete, reg, binding));
                }
            }

            return match hits.len() {
                0 => Ok(None),
                1 => {
                    let (concrete, registration, binding) = hits.remove(0);
                    trace!(
                        requested = key.display_name(),
                        concrete = concrete.display_name(),
                        "interface resolved through capability set"
                    );
                    Ok(Some(Found::Cast {
                        concrete: concrete.clone(),
                        registration,
                        binding,
                    }))
                }
                _ => {
                    let mut candidates: Vec<&'static str> =
                        hits.iter().map(|(k, _, _)| k.display_name()).collect();
                    candidates.sort_unstable();
                    Err(DiError::AmbiguousRegistration {
                        requested: key.display_name(),
                        candidates,
                    })
                }
            };
        }

        Ok(None)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterator over all key-registration pairs
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&Key, &Registration)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key_of;

    fn dummy_ctor() -> CtorFn {
        Arc::new(|_: &ResolverContext<'_>| Ok(Arc::new(42i32) as AnyArc))
    }

    #[test]
    fn insert_and_lookup() {
        let mut registry = Registry::new();
        let key = key_of::<i32>();
        registry.insert(
            key.clone(),
            Registration::new(Lifetime::Singleton, Strategy::Instance, dummy_ctor()),
        );

        assert!(matches!(registry.lookup(&key), Ok(Some(Found::Direct(_)))));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn replacement_is_silent_last_write_wins() {
        let mut registry = Registry::new();
        let key = key_of::<i32>();
        registry.insert(
            key.clone(),
            Registration::new(Lifetime::Singleton, Strategy::Instance, dummy_ctor()),
        );
        registry.insert(
            key.clone(),
            Registration::new(Lifetime::Transient, Strategy::Factory, dummy_ctor()),
        );

        assert_eq!(registry.len(), 1);
        match registry.lookup(&key) {
            Ok(Some(Found::Direct(reg))) => assert_eq!(reg.lifetime, Lifetime::Transient),
            _ => panic!("expected direct match"),
        }
    }

    #[test]
    fn unknown_key_is_none_not_error() {
        let registry = Registry::new();
        assert!(matches!(registry.lookup(&key_of::<String>()), Ok(None)));
    }
}
