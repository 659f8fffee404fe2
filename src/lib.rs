//! # crucible-di
//!
//! Runtime dependency injection for Rust: declared registrations in,
//! fully wired object graphs out.
//!
//! ## Features
//!
//! - **Three lifetimes**: Singleton, Scoped, and Transient services
//! - **Constructor selection**: explicit ranked overloads per type; the
//!   most specific satisfiable constructor wins, ties are errors
//! - **Capability interfaces**: a concrete registration answers for its
//!   whole declared interface chain
//! - **Lifetime markers**: types can announce their lifetime and be
//!   bulk-registered from a candidate list
//! - **Thread-safe**: `Arc`-based sharing; concurrent first requests
//!   for a singleton construct it exactly once
//! - **Circular dependency detection**: cycles fail fast with the full
//!   dependency path
//!
//! ## Quick Start
//!
//! ```rust
//! use crucible_di::{ServiceCollection, Resolver};
//! use std::sync::Arc;
//!
//! struct Database {
//!     connection_string: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! let mut services = ServiceCollection::new();
//! services.add_singleton(Database {
//!     connection_string: "postgres://localhost".to_string(),
//! });
//! services.add_transient_factory::<UserService, _>(|resolver| {
//!     UserService {
//!         db: resolver.get_required::<Database>(),
//!     }
//! });
//!
//! let provider = services.build();
//! let user_service = provider.get_required::<UserService>();
//! assert_eq!(user_service.db.connection_string, "postgres://localhost");
//! ```
//!
//! ## Constructor Selection
//!
//! Types implement [`Injectable`] to declare their constructor
//! overloads explicitly. Resolution picks the overload with the most
//! parameters whose every parameter is satisfiable by the current
//! registrations:
//!
//! ```rust
//! use crucible_di::{Constructor, Injectable, Lifetime, Resolver, ServiceCollection, key_of};
//! use std::sync::Arc;
//!
//! struct Repository;
//! impl Injectable for Repository {
//!     fn constructors() -> Vec<Constructor<Self>> {
//!         vec![Constructor::new(vec![], |_| Ok(Repository))]
//!     }
//! }
//!
//! struct Handler {
//!     repo: Option<Arc<Repository>>,
//! }
//!
//! impl Injectable for Handler {
//!     fn constructors() -> Vec<Constructor<Self>> {
//!         vec![
//!             Constructor::new(vec![], |_| Ok(Handler { repo: None })),
//!             Constructor::new(vec![key_of::<Repository>()], |r| {
//!                 Ok(Handler { repo: Some(r.get::<Repository>()?) })
//!             }),
//!         ]
//!     }
//! }
//!
//! let mut services = ServiceCollection::new();
//! services.register::<Repository>(Lifetime::Singleton);
//! services.register::<Handler>(Lifetime::Transient);
//!
//! let provider = services.build();
//! let handler = provider.get_required::<Handler>();
//! // The 1-parameter overload was satisfiable, so it won over the 0-parameter one
//! assert!(handler.repo.is_some());
//! ```
//!
//! ## Capability Interfaces
//!
//! A concrete type lists the interfaces it can be resolved through;
//! requests for any of them share the concrete instance:
//!
//! ```rust
//! use crucible_di::{Constructor, Injectable, InterfaceBinding, Lifetime, Resolver, ServiceCollection};
//!
//! trait Store: Send + Sync {
//!     fn name(&self) -> &'static str;
//! }
//!
//! struct MemoryStore;
//! impl Store for MemoryStore {
//!     fn name(&self) -> &'static str { "memory" }
//! }
//!
//! impl Injectable for MemoryStore {
//!     fn constructors() -> Vec<Constructor<Self>> {
//!         vec![Constructor::new(vec![], |_| Ok(MemoryStore))]
//!     }
//!     fn interfaces() -> Vec<InterfaceBinding> {
//!         vec![InterfaceBinding::new::<Self, dyn Store>(|s| s)]
//!     }
//! }
//!
//! let mut services = ServiceCollection::new();
//! services.register::<MemoryStore>(Lifetime::Singleton);
//!
//! let provider = services.build();
//! let store = provider.get_required_trait::<dyn Store>();
//! assert_eq!(store.name(), "memory");
//! ```
//!
//! ## Scopes
//!
//! Scoped services cache per scope frame. Ambient resolution uses a
//! root frame that lives as long as the provider;
//! [`make`](ServiceProvider::make) opens a fresh frame for a single
//! call; [`create_scope`](ServiceProvider::create_scope) returns an
//! explicit frame handle.

// Module declarations
pub mod collection;
pub mod construct;
pub mod descriptors;
pub mod error;
pub mod key;
pub mod lifetime;
pub mod marked;
pub mod provider;
pub mod traits;

// Internal modules
mod internal;
mod registration;

// Re-export core types
pub use collection::{
    ServiceCollection, ServiceCollectionExt, ServiceCollectionModuleExt, ServiceModule,
};
pub use construct::{Constructor, Injectable, InterfaceBinding};
pub use descriptors::{ServiceDescriptor, Strategy};
pub use error::{DiError, DiResult};
pub use internal::CircularPanic;
pub use key::{key_of, key_of_trait, Key};
pub use lifetime::Lifetime;
pub use marked::{MarkedType, Service};
pub use provider::{ResolverContext, Scope, ServiceProvider};
pub use traits::{Resolver, ResolverCore};
