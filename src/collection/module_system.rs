//! Service module system for grouped registration.
//!
//! Lets related registrations travel together as a reusable unit
//! applied to a [`ServiceCollection`] in one call.

use crate::{DiResult, ServiceCollection};

/// A module that registers a group of services.
///
/// # Example
///
/// ```rust
/// use crucible_di::{ServiceCollection, ServiceModule, ServiceCollectionExt, DiResult, Resolver};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct UserConfig;
///
/// struct UserService;
/// impl UserService {
///     fn new(_config: Arc<UserConfig>) -> Self { Self }
/// }
///
/// struct UserModule;
///
/// impl ServiceModule for UserModule {
///     fn register_services(self, services: &mut ServiceCollection) -> DiResult<()> {
///         services.add_singleton(UserConfig::default());
///         services.add_scoped_factory::<UserService, _>(|r| {
///             UserService::new(r.get_required::<UserConfig>())
///         });
///         Ok(())
///     }
/// }
///
/// # fn main() -> DiResult<()> {
/// let services = ServiceCollection::new();
/// let provider = services.add_module(UserModule)?.build();
/// # Ok(())
/// # }
/// ```
pub trait ServiceModule {
    /// Register this module's services with the collection.
    fn register_services(self, services: &mut ServiceCollection) -> DiResult<()>;
}

/// Owned-style module registration, chainable between moves.
pub trait ServiceCollectionExt {
    /// Apply a module and hand the collection back.
    fn add_module<M: ServiceModule>(self, module: M) -> DiResult<Self>
    where
        Self: Sized;
}

impl ServiceCollectionExt for ServiceCollection {
    fn add_module<M: ServiceModule>(mut self, module: M) -> DiResult<Self> {
        module.register_services(&mut self)?;
        Ok(self)
    }
}

/// In-place module registration, matching the `&mut Self` style of the
/// other registration methods.
pub trait ServiceCollectionModuleExt {
    /// Apply a module to the collection in place.
    fn add_module_mut<M: ServiceModule>(&mut self, module: M) -> DiResult<&mut Self>;
}

impl ServiceCollectionModuleExt for ServiceCollection {
    fn add_module_mut<M: ServiceModule>(&mut self, module: M) -> DiResult<&mut Self> {
        module.register_services(self)?;
        Ok(self)
    }
}
