//! Scoped service resolution.
//!
//! A scope frame caches scoped instances for one bounded resolution
//! context. Frames created by [`ServiceProvider::make`] live for a
//! single call; frames created by [`ServiceProvider::create_scope`]
//! live as long as the handle.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{DiError, DiResult};
use crate::internal::with_circular_catch;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::{AnyArc, Found, Registration};
use crate::traits::{Resolver, ResolverCore};

use super::{ResolverContext, ServiceProvider};

/// A scope frame with its own cache for scoped services.
///
/// Singleton services resolved through a scope still come from (and are
/// cached by) the root provider; scoped services are cached in this
/// frame only; transients are never cached.
///
/// # Examples
///
/// ```rust
/// use crucible_di::{ServiceCollection, Resolver};
/// use std::sync::{Arc, Mutex};
///
/// struct RequestId(u32);
///
/// let mut services = ServiceCollection::new();
/// let counter = Arc::new(Mutex::new(0));
/// let counter_clone = counter.clone();
///
/// services.add_scoped_factory::<RequestId, _>(move |_| {
///     let mut c = counter_clone.lock().unwrap();
///     *c += 1;
///     RequestId(*c)
/// });
///
/// let provider = services.build();
/// let scope1 = provider.create_scope();
/// let scope2 = provider.create_scope();
///
/// let a = scope1.get_required::<RequestId>();
/// let b = scope1.get_required::<RequestId>();
/// let c = scope2.get_required::<RequestId>();
///
/// assert!(Arc::ptr_eq(&a, &b)); // Same frame, same instance
/// assert!(!Arc::ptr_eq(&a, &c)); // Different frames, different instances
/// ```
pub struct Scope {
    pub(crate) root: ServiceProvider,
    pub(crate) frame: Mutex<HashMap<Key, AnyArc>>,
}

impl Scope {
    /// Resolve a scoped registration against this frame's cache.
    ///
    /// The frame lock is never held across a constructor call; a racing
    /// insert is resolved by keeping the first value in.
    fn resolve_scoped(&self, reg: &Registration, key: &Key) -> DiResult<AnyArc> {
        {
            let frame = self.frame.lock().unwrap();
            if let Some(cached) = frame.get(key) {
                return Ok(cached.clone());
            }
        }

        let ctx = ResolverContext::new(self);
        let value = (reg.ctor)(&ctx)?;

        let mut frame = self.frame.lock().unwrap();
        if let Some(existing) = frame.get(key) {
            Ok(existing.clone())
        } else {
            frame.insert(key.clone(), value.clone());
            Ok(value)
        }
    }

    fn resolve_registration(&self, reg: &Registration, key: &Key) -> DiResult<AnyArc> {
        match reg.lifetime {
            Lifetime::Singleton => self.root.resolve_singleton(reg, key),
            Lifetime::Scoped => self.resolve_scoped(reg, key),
            Lifetime::Transient => {
                let ctx = ResolverContext::new(self);
                (reg.ctor)(&ctx)
            }
        }
    }

    fn resolve_any_impl(&self, key: &Key) -> DiResult<AnyArc> {
        match self.root.inner().registry.lookup(key)? {
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

impl ResolverCore for Scope {
    fn resolve_any(&self, key: &Key) -> DiResult<Arc<dyn std::any::Any + Send + Sync>> {
        with_circular_catch(key.display_name(), || self.resolve_any_impl(key))
    }

    fn can_resolve(&self, key: &Key) -> DiResult<bool> {
        Ok(self.root.inner().registry.lookup(key)?.is_some())
    }
}

impl Resolver for Scope {}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cached = self.frame.lock().map(|frame| frame.len()).unwrap_or(0);
        f.debug_struct("Scope").field("cached", &cached).finish()
    }
}
