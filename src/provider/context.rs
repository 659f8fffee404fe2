//! Resolver context handed to factories and constructors.

use std::sync::Arc;

use crate::error::DiResult;
use crate::key::Key;
use crate::traits::{Resolver, ResolverCore};

/// Context passed to factory closures and constructor build closures.
///
/// Wraps whichever resolver is driving the current resolution (the root
/// [`ServiceProvider`](crate::ServiceProvider) or a
/// [`Scope`](crate::Scope)), so construction logic is independent of
/// where it runs: a scoped dependency reached from inside a factory
/// binds to the frame the resolution started in.
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
/// services.add_singleton(Database {
///     url: "postgres://localhost".to_string(),
/// });
/// services.add_transient_factory::<UserService, _>(|resolver| {
///     UserService {
///         db: resolver.get_required::<Database>(),
///     }
/// });
/// ```
pub struct ResolverContext<'a> {
    resolver: &'a dyn ResolverCore,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new<T>(resolver: &'a T) -> Self
    where
        T: ResolverCore,
    {
        Self { resolver }
    }
}

impl ResolverCore for ResolverContext<'_> {
    fn resolve_any(&self, key: &Key) -> DiResult<Arc<dyn std::any::Any + Send + Sync>> {
        self.resolver.resolve_any(key)
    }

    fn can_resolve(&self, key: &Key) -> DiResult<bool> {
        self.resolver.can_resolve(key)
    }
}

impl Resolver for ResolverContext<'_> {}
