//! Theme configuration.

use std::any::TypeId;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use overlay_config::CacheConfig;

use super::prepare::PrepareHandle;
use super::Theme;
use crate::component::Component;
use crate::error::{BoxError, Result, ThemeError};
use crate::renderer::{ErasedRenderer, Renderer, TypedRenderer};

type RendererFactory =
    dyn Fn() -> std::result::Result<Arc<dyn ErasedRenderer>, BoxError> + Send + Sync;

/// A component type's renderer binding.
#[derive(Clone)]
pub(crate) struct Binding {
    pub(crate) component: &'static str,
    pub(crate) renderer: &'static str,
    factory: Arc<RendererFactory>,
}

impl Binding {
    /// Runs the factory, logging failures with both type names.
    pub(crate) fn construct(&self) -> Result<Arc<dyn ErasedRenderer>> {
        match (self.factory)() {
            Ok(renderer) => {
                log::debug!(
                    "constructed renderer `{}` for component type `{}`",
                    self.renderer,
                    self.component
                );
                Ok(renderer)
            }
            Err(source) => {
                log::error!(
                    "failed to construct renderer `{}` for component type `{}`: {}",
                    self.renderer,
                    self.component,
                    source
                );
                Err(ThemeError::RendererConstructionFailure {
                    component: self.component,
                    renderer: self.renderer,
                    source,
                })
            }
        }
    }
}

/// Declares component → renderer bindings and builds [`Theme`]s from them.
///
/// Binding the same component type twice keeps the last renderer. Themes
/// already built are unaffected by later calls.
///
/// ```
/// use std::sync::Arc;
/// use overlay_core::{Component, Renderer, Theme};
///
/// struct Health { hp: u32 }
/// impl Component for Health {}
///
/// #[derive(Default)]
/// struct HealthRenderer;
/// impl Renderer<Health> for HealthRenderer {
///     fn render(&mut self, health: &Health) {
///         println!("I have {} HP!", health.hp);
///     }
/// }
///
/// let theme = Theme::builder().associate::<Health, HealthRenderer>().build();
/// let health = Arc::new(Health { hp: 20 });
/// theme.renderer_for(&health).unwrap().lock().render(&health);
/// ```
#[derive(Clone, Default)]
pub struct ThemeBuilder {
    bindings: HashMap<TypeId, Binding>,
    cache: CacheConfig,
}

impl ThemeBuilder {
    /// Create a builder with no bindings and the default cache settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `C` to `R`, constructing renderers with `R::default()`.
    pub fn associate<C, R>(self) -> Self
    where
        C: Component,
        R: Renderer<C> + Default,
    {
        self.associate_with::<C, R, _, Infallible>(|| Ok(R::default()))
    }

    /// Bind `C` to `R`, constructing renderers with `factory`.
    ///
    /// A factory error surfaces from lookups as
    /// [`ThemeError::RendererConstructionFailure`].
    pub fn associate_with<C, R, F, E>(mut self, factory: F) -> Self
    where
        C: Component,
        R: Renderer<C>,
        F: Fn() -> std::result::Result<R, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        let factory = move || -> std::result::Result<Arc<dyn ErasedRenderer>, BoxError> {
            let renderer = factory().map_err(Into::<BoxError>::into)?;
            let erased: Arc<dyn ErasedRenderer> = Arc::new(TypedRenderer::<C>::new(renderer));
            Ok(erased)
        };

        let binding = Binding {
            component: std::any::type_name::<C>(),
            renderer: std::any::type_name::<R>(),
            factory: Arc::new(factory),
        };

        if let Some(previous) = self.bindings.insert(TypeId::of::<C>(), binding) {
            log::debug!(
                "rebinding component type `{}` (was `{}`)",
                previous.component,
                previous.renderer
            );
        }
        self
    }

    /// Set the renderer cache settings for themes built from now on.
    pub fn with_cache_config(mut self, config: CacheConfig) -> Self {
        self.cache = config;
        self
    }

    /// Whether `C` has a binding.
    pub fn is_bound<C: Component>(&self) -> bool {
        self.bindings.contains_key(&TypeId::of::<C>())
    }

    /// Number of bound component types.
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Freeze the current bindings into a theme with an empty cache.
    pub fn build(&self) -> Theme {
        Theme::new(self.bindings.clone(), &self.cache)
    }

    /// Build, then construct renderers for `components` in order.
    ///
    /// Stops at the first component whose renderer cannot be resolved.
    pub fn build_and_prepare<I>(&self, components: I) -> Result<Theme>
    where
        I: IntoIterator,
        I::Item: Borrow<Arc<dyn Component>>,
    {
        let theme = self.build();
        theme.prepare(components)?;
        Ok(theme)
    }

    /// Build, then construct renderers for `components` on a background
    /// thread.
    ///
    /// The theme is usable immediately. Lookups race with the background
    /// population; use the returned handle to wait for it.
    pub fn async_build_and_prepare<I>(&self, components: I) -> Result<(Theme, PrepareHandle)>
    where
        I: IntoIterator,
        I::Item: Borrow<Arc<dyn Component>>,
    {
        let theme = self.build();
        let components: Vec<Arc<dyn Component>> = components
            .into_iter()
            .map(|component| Arc::clone(component.borrow()))
            .collect();
        let handle = PrepareHandle::spawn(theme.clone(), components)?;
        Ok((theme, handle))
    }
}

impl std::fmt::Debug for ThemeBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut bound: Vec<_> = self
            .bindings
            .values()
            .map(|binding| (binding.component, binding.renderer))
            .collect();
        bound.sort();
        f.debug_struct("ThemeBuilder")
            .field("bindings", &bound)
            .field("cache", &self.cache)
            .finish()
    }
}
