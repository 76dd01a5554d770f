//! Theme registry.
//!
//! A [`Theme`] maps each component type to one renderer type and hands out
//! one renderer per component instance, constructing it on first lookup.
//!
//! # Architecture
//!
//! ```text
//! ThemeBuilder ──build──▶ Theme
//!   bindings                ├── bindings  (TypeId → factory, frozen)
//!                           └── cache     (component address → Weak probe + renderer)
//! ```
//!
//! Lookups are by the component's exact runtime type; there is no fallback
//! to other bindings. Construction for a given component runs at most once
//! even under concurrent lookups, while lookups for different components do
//! not wait on each other's construction.

mod builder;
mod cache;
mod prepare;

pub use builder::ThemeBuilder;
pub use prepare::PrepareHandle;

use std::any::TypeId;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::sync::Arc;

use overlay_config::CacheConfig;

use crate::component::{runtime_type, Component, ComponentKey};
use crate::error::{Result, ThemeError};
use crate::renderer::{DynRenderer, ErasedRenderer, RendererHandle, TypedRenderer};
use builder::Binding;
use cache::RendererCache;

struct ThemeInner {
    bindings: HashMap<TypeId, Binding>,
    cache: RendererCache,
}

/// Built registry of component → renderer bindings with its renderer cache.
///
/// Cloning is cheap; clones share bindings and cache.
#[derive(Clone)]
pub struct Theme {
    inner: Arc<ThemeInner>,
}

impl Theme {
    /// Start configuring a theme.
    pub fn builder() -> ThemeBuilder {
        ThemeBuilder::new()
    }

    fn new(bindings: HashMap<TypeId, Binding>, cache: &CacheConfig) -> Self {
        Self {
            inner: Arc::new(ThemeInner {
                bindings,
                cache: RendererCache::new(cache),
            }),
        }
    }

    /// Renderer for `component`, constructing and caching it on first use.
    ///
    /// Repeated calls with the same `Arc` return the same renderer; distinct
    /// instances get distinct renderers.
    ///
    /// # Errors
    /// * [`ThemeError::UnboundComponentType`] if `C` has no binding
    /// * [`ThemeError::RendererConstructionFailure`] if the factory fails
    pub fn renderer_for<C: Component>(&self, component: &Arc<C>) -> Result<RendererHandle<C>> {
        let erased: Arc<dyn Component> = component.clone();
        let renderer = self.resolve(&erased)?;
        let typed = renderer
            .typed()
            .downcast_ref::<TypedRenderer<C>>()
            .expect("bindings for `C` should only produce `TypedRenderer<C>`");
        Ok(typed.handle.clone())
    }

    /// Renderer for a component whose concrete type is only known at runtime.
    pub fn renderer_for_dyn(&self, component: &Arc<dyn Component>) -> Result<DynRenderer> {
        self.resolve(component).map(DynRenderer::new)
    }

    /// Construct renderers for `components` in order, stopping at the first
    /// failure. Returns how many were resolved.
    pub fn prepare<I>(&self, components: I) -> Result<usize>
    where
        I: IntoIterator,
        I::Item: Borrow<Arc<dyn Component>>,
    {
        let mut prepared = 0;
        for component in components {
            self.resolve(component.borrow())?;
            prepared += 1;
        }
        Ok(prepared)
    }

    /// Whether `C` has a binding.
    pub fn is_bound<C: Component>(&self) -> bool {
        self.inner.bindings.contains_key(&TypeId::of::<C>())
    }

    /// Number of bound component types.
    pub fn binding_count(&self) -> usize {
        self.inner.bindings.len()
    }

    /// Number of cached renderers, including ones whose component was
    /// dropped but not yet swept.
    pub fn cached_len(&self) -> usize {
        self.inner.cache.len()
    }

    /// Remove cache entries whose component has been dropped.
    ///
    /// Also runs automatically every `sweep_interval` insertions.
    pub fn sweep(&self) -> usize {
        self.inner.cache.sweep()
    }

    /// Forget the renderer cached for `component`. The next lookup builds a
    /// new one. Returns whether an entry was removed.
    pub fn evict<C: Component + ?Sized>(&self, component: &Arc<C>) -> bool {
        self.inner.cache.evict(ComponentKey::of(component))
    }

    fn resolve(&self, component: &Arc<dyn Component>) -> Result<Arc<dyn ErasedRenderer>> {
        let key = ComponentKey::of(component);
        if let Some(renderer) = self.inner.cache.lookup(key) {
            return Ok(renderer);
        }

        let component_ref: &dyn Component = component.as_ref();
        let binding = self
            .inner
            .bindings
            .get(&runtime_type(component_ref))
            .ok_or_else(|| ThemeError::UnboundComponentType {
                component: component_ref.type_name(),
            })?;

        let slot = self.inner.cache.slot_for(key, component);
        slot.renderer()
            .get_or_try_init(|| binding.construct())
            .cloned()
    }
}

impl std::fmt::Debug for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Theme")
            .field("bindings", &self.binding_count())
            .field("cached", &self.cached_len())
            .finish()
    }
}
