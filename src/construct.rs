//! Constructor declaration and selection.
//!
//! Types participate in constructor-driven resolution by implementing
//! [`Injectable`]: an explicit, ranked list of constructor overloads
//! plus the set of capability interfaces the type can stand in for.
//! Selection walks overloads from the most parameters to the fewest and
//! picks the first one whose every parameter is satisfiable by the
//! current registrations.

use std::sync::Arc;

use tracing::debug;

use crate::error::{DiError, DiResult};
use crate::key::{key_of_trait, Key};
use crate::provider::ResolverContext;
use crate::registration::AnyArc;
use crate::traits::ResolverCore;

/// One constructor overload of an [`Injectable`] type.
///
/// Carries the parameter keys used for the viability probe and a build
/// closure that receives the resolver, so parameters are resolved
/// through the full pipeline (lifetimes, interface matching, cycle
/// detection) before the enclosing instance exists.
///
/// # Examples
///
/// ```rust
/// use crucible_di::{Constructor, Injectable, key_of};
/// use std::sync::Arc;
///
/// struct Engine;
/// impl Injectable for Engine {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::new(vec![], |_| Ok(Engine))]
///     }
/// }
///
/// struct Car { engine: Arc<Engine> }
/// impl Injectable for Car {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::new(vec![key_of::<Engine>()], |r| {
///             use crucible_di::Resolver;
///             Ok(Car { engine: r.get::<Engine>()? })
///         })]
///     }
/// }
/// ```
pub struct Constructor<T> {
    params: Vec<Key>,
    build: Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> DiResult<T> + Send + Sync>,
}

impl<T> Constructor<T> {
    /// Declare an overload from its parameter keys and build closure.
    ///
    /// The parameter keys must cover exactly the dependencies the
    /// closure resolves; viability is judged from the keys alone.
    pub fn new<F>(params: Vec<Key>, build: F) -> Self
    where
        F: for<'a> Fn(&ResolverContext<'a>) -> DiResult<T> + Send + Sync + 'static,
    {
        Self {
            params,
            build: Arc::new(build),
        }
    }

    /// Number of parameters of this overload.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub(crate) fn params(&self) -> &[Key] {
        &self.params
    }

    pub(crate) fn invoke(&self, ctx: &ResolverContext<'_>) -> DiResult<T> {
        (self.build)(ctx)
    }
}

impl<T> Clone for Constructor<T> {
    fn clone(&self) -> Self {
        Self {
            params: self.params.clone(),
            build: self.build.clone(),
        }
    }
}

/// A type constructible by the container.
///
/// Implementors declare their constructor overloads explicitly; the
/// container never guesses. The optional [`interfaces`](Self::interfaces)
/// set lists every capability interface the type can be resolved
/// through.
pub trait Injectable: Sized + Send + Sync + 'static {
    /// The constructor overloads of this type, in any order.
    fn constructors() -> Vec<Constructor<Self>>;

    /// Capability interfaces this type satisfies.
    ///
    /// Precomputed at registration time; an interface request with no
    /// exact registration resolves through the unique registered type
    /// whose set contains it.
    fn interfaces() -> Vec<InterfaceBinding> {
        Vec::new()
    }
}

/// A capability interface a concrete type can be resolved through.
///
/// Holds the interface key and the monomorphized `Arc<T> -> Arc<dyn I>`
/// cast applied when a request for the interface is served by the
/// concrete registration.
///
/// # Examples
///
/// ```rust
/// use crucible_di::InterfaceBinding;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct English;
/// impl Greeter for English {
///     fn greet(&self) -> String { "hello".into() }
/// }
///
/// let binding = InterfaceBinding::new::<English, dyn Greeter>(|s| s);
/// ```
#[derive(Clone)]
pub struct InterfaceBinding {
    key: Key,
    cast: Arc<dyn Fn(AnyArc) -> DiResult<AnyArc> + Send + Sync>,
}

impl InterfaceBinding {
    /// Bind the concrete type `T` to the interface `I`.
    ///
    /// The cast function is monomorphized at the declaration site, where
    /// the `Arc<T> -> Arc<I>` coercion is known; `|s| s` suffices.
    pub fn new<T, I>(cast: fn(Arc<T>) -> Arc<I>) -> Self
    where
        T: Send + Sync + 'static,
        I: ?Sized + Send + Sync + 'static,
    {
        Self {
            key: key_of_trait::<I>(),
            cast: Arc::new(move |any: AnyArc| {
                let concrete = any
                    .downcast::<T>()
                    .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))?;
                // Stored as Arc<Arc<dyn I>> so the trait object survives
                // type erasure
                Ok(Arc::new(cast(concrete)) as AnyArc)
            }),
        }
    }

    /// The interface key this binding answers for.
    pub fn key(&self) -> &Key {
        &self.key
    }

    pub(crate) fn apply(&self, concrete: AnyArc) -> DiResult<AnyArc> {
        (self.cast)(concrete)
    }
}

impl std::fmt::Debug for InterfaceBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterfaceBinding")
            .field("key", &self.key)
            .finish()
    }
}

/// Select and run the best constructor of `T` against the resolver.
///
/// Overloads are scanned in descending parameter count. An overload is
/// viable when every parameter key is satisfiable; the first viable
/// arity wins, and a tie between viable overloads of that arity is an
/// error rather than a silent declaration-order pick.
pub(crate) fn construct<T: Injectable>(ctx: &ResolverContext<'_>) -> DiResult<T> {
    let type_name = std::any::type_name::<T>();
    let mut overloads = T::constructors();
    overloads.sort_by(|a, b| b.arity().cmp(&a.arity()));

    let mut i = 0;
    while i < overloads.len() {
        let arity = overloads[i].arity();
        let mut end = i;
        while end < overloads.len() && overloads[end].arity() == arity {
            end += 1;
        }

        let mut viable = Vec::new();
        for candidate in &overloads[i..end] {
            if is_viable(candidate, ctx)? {
                viable.push(candidate);
            }
        }

        match viable.as_slice() {
            [] => i = end,
            [winner] => {
                debug!(service = type_name, arity, "selected constructor");
                return winner.invoke(ctx);
            }
            _ => {
                return Err(DiError::AmbiguousConstructor { type_name, arity });
            }
        }
    }

    Err(DiError::Unresolvable(type_name))
}

fn is_viable<T>(candidate: &Constructor<T>, ctx: &ResolverContext<'_>) -> DiResult<bool> {
    for param in candidate.params() {
        if !ctx.can_resolve(param)? {
            return Ok(false);
        }
    }
    Ok(true)
}
