//! Resolution traits.

mod resolver;

pub use resolver::{Resolver, ResolverCore};
