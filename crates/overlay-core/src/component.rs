//! Component identity.
//!
//! Components are plain state holders owned by the embedding application and
//! shared as `Arc<C>` or `Arc<dyn Component>`. The registry keys its cache by
//! the address of that allocation and only ever keeps a `Weak` to it.

use std::any::{Any, TypeId};
use std::sync::{Arc, Weak};

/// Runtime type information available on every component, including through
/// `dyn Component`.
///
/// Implemented for all `'static + Send + Sync` types; do not implement by hand.
pub trait AsAny: Any + Send + Sync {
    /// The value as `&dyn Any`, for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Name of the concrete type, for diagnostics.
    fn type_name(&self) -> &'static str;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// A piece of UI state that a [`Renderer`](crate::Renderer) knows how to draw.
///
/// ```
/// use overlay_core::Component;
///
/// struct Health {
///     hp: u32,
/// }
///
/// impl Component for Health {}
/// ```
pub trait Component: AsAny {}

/// Exact runtime type of a component behind a `dyn Component`.
#[inline]
pub(crate) fn runtime_type(component: &dyn Component) -> TypeId {
    component.as_any().type_id()
}

/// Cache key for a component allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ComponentKey(usize);

impl ComponentKey {
    pub(crate) fn of<C: ?Sized>(component: &Arc<C>) -> Self {
        Self(Arc::as_ptr(component) as *const () as usize)
    }
}

/// Non-owning reference to a component, used to tell whether a cache entry
/// still belongs to a live allocation.
pub(crate) struct ComponentProbe(Weak<dyn Component>);

impl ComponentProbe {
    pub(crate) fn new(component: &Arc<dyn Component>) -> Self {
        Self(Arc::downgrade(component))
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}
