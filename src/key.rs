//! Service key types for storage and lookup.

use std::any::TypeId;

/// Key for service storage and lookup.
///
/// Keys uniquely identify a registration in the container. At most one
/// registration is active per key; re-registering a key replaces the
/// previous entry.
///
/// # Key Types
///
/// - **Type**: concrete types (structs, enums, primitives)
/// - **Trait**: capability interfaces resolved as trait objects
///
/// # Examples
///
/// ```rust
/// use crucible_di::{key_of, key_of_trait, Key};
///
/// trait Logger: Send + Sync {}
///
/// let concrete = key_of::<String>();
/// assert!(matches!(concrete, Key::Type(_, _)));
///
/// let iface = key_of_trait::<dyn Logger>();
/// assert!(matches!(iface, Key::Trait(_)));
/// assert!(iface.display_name().contains("Logger"));
/// ```
#[derive(Debug, Clone)]
pub enum Key {
    /// Concrete type key with TypeId and name for diagnostics.
    ///
    /// The TypeId provides the identity; the name only feeds error
    /// messages and logs.
    Type(TypeId, &'static str),
    /// Capability-interface key.
    ///
    /// Trait objects have no TypeId, so the trait's type name is the
    /// identity.
    Trait(&'static str),
}

impl Key {
    /// Get the type or trait name for display.
    pub fn display_name(&self) -> &'static str {
        match self {
            Key::Type(_, name) => name,
            Key::Trait(name) => name,
        }
    }
}

// TypeId-only comparison for concrete types; the name string is
// diagnostic and never part of the identity.
impl PartialEq for Key {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Type(a, _), Key::Type(b, _)) => a == b,
            (Key::Trait(a), Key::Trait(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl std::hash::Hash for Key {
    #[inline]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Key::Type(id, _) => {
                0u8.hash(state);
                id.hash(state);
            }
            Key::Trait(name) => {
                1u8.hash(state);
                name.hash(state);
            }
        }
    }
}

/// Key for a concrete type.
#[inline]
pub fn key_of<T: 'static>() -> Key {
    Key::Type(TypeId::of::<T>(), std::any::type_name::<T>())
}

/// Key for a capability interface (trait object).
#[inline]
pub fn key_of_trait<T: ?Sized + 'static>() -> Key {
    Key::Trait(std::any::type_name::<T>())
}
