//! Renderer capability.
//!
//! A [`Renderer`] draws and updates exactly one component type. The theme
//! hands out one renderer instance per component instance, so renderers are
//! free to keep per-component state (cached layout, last drawn value, ...).

use std::any::Any;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::component::Component;

/// Draws and updates components of type `C`.
pub trait Renderer<C: Component>: Send + 'static {
    /// Draws the component.
    fn render(&mut self, component: &C);

    /// Refreshes time-dependent or derived state without drawing.
    fn update(&mut self, _component: &C) {}
}

/// Shared handle to the renderer bound to one component instance.
///
/// Two handles refer to the same renderer iff [`Arc::ptr_eq`] holds.
pub type RendererHandle<C> = Arc<Mutex<dyn Renderer<C>>>;

/// Type-erased renderer stored in the theme cache.
pub(crate) trait ErasedRenderer: Send + Sync {
    fn typed(&self) -> &dyn Any;
    fn render_dyn(&self, component: &dyn Component) -> bool;
    fn update_dyn(&self, component: &dyn Component) -> bool;
    fn renderer_addr(&self) -> usize;
    fn renderer_type(&self) -> &'static str;
}

pub(crate) struct TypedRenderer<C: Component> {
    pub(crate) handle: RendererHandle<C>,
    pub(crate) renderer_type: &'static str,
}

impl<C: Component> TypedRenderer<C> {
    pub(crate) fn new<R: Renderer<C>>(renderer: R) -> Self {
        let handle: RendererHandle<C> = Arc::new(Mutex::new(renderer));
        Self {
            handle,
            renderer_type: std::any::type_name::<R>(),
        }
    }
}

impl<C: Component> ErasedRenderer for TypedRenderer<C> {
    fn typed(&self) -> &dyn Any {
        self
    }

    fn render_dyn(&self, component: &dyn Component) -> bool {
        match component.as_any().downcast_ref::<C>() {
            Some(component) => {
                self.handle.lock().render(component);
                true
            }
            None => false,
        }
    }

    fn update_dyn(&self, component: &dyn Component) -> bool {
        match component.as_any().downcast_ref::<C>() {
            Some(component) => {
                self.handle.lock().update(component);
                true
            }
            None => false,
        }
    }

    fn renderer_addr(&self) -> usize {
        Arc::as_ptr(&self.handle) as *const () as usize
    }

    fn renderer_type(&self) -> &'static str {
        self.renderer_type
    }
}

/// Renderer returned for a heterogeneous (`dyn Component`) lookup.
///
/// Calling [`render`](Self::render) or [`update`](Self::update) with a
/// component of a type other than the one the renderer is bound to does
/// nothing and logs a warning.
#[derive(Clone)]
pub struct DynRenderer {
    inner: Arc<dyn ErasedRenderer>,
}

impl DynRenderer {
    pub(crate) fn new(inner: Arc<dyn ErasedRenderer>) -> Self {
        Self { inner }
    }

    /// Draws `component`.
    pub fn render(&self, component: &dyn Component) {
        if !self.inner.render_dyn(component) {
            self.warn_mismatch("render", component);
        }
    }

    /// Updates `component`.
    pub fn update(&self, component: &dyn Component) {
        if !self.inner.update_dyn(component) {
            self.warn_mismatch("update", component);
        }
    }

    /// Name of the concrete renderer type.
    pub fn renderer_type(&self) -> &'static str {
        self.inner.renderer_type()
    }

    /// Whether both handles refer to the same renderer instance.
    pub fn same_renderer(&self, other: &DynRenderer) -> bool {
        self.inner.renderer_addr() == other.inner.renderer_addr()
    }

    /// Typed handle to the same renderer, if it is bound to `C`.
    pub fn downcast<C: Component>(&self) -> Option<RendererHandle<C>> {
        self.inner
            .typed()
            .downcast_ref::<TypedRenderer<C>>()
            .map(|typed| typed.handle.clone())
    }

    fn warn_mismatch(&self, op: &str, component: &dyn Component) {
        log::warn!(
            "{}: renderer `{}` cannot handle component type `{}`",
            op,
            self.inner.renderer_type(),
            component.type_name()
        );
    }
}

impl std::fmt::Debug for DynRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynRenderer")
            .field("renderer_type", &self.inner.renderer_type())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Health {
        hp: u32,
    }
    impl Component for Health {}

    struct Item;
    impl Component for Item {}

    #[derive(Default)]
    struct HealthRenderer {
        drawn: Vec<u32>,
        updates: usize,
    }

    impl Renderer<Health> for HealthRenderer {
        fn render(&mut self, component: &Health) {
            self.drawn.push(component.hp);
        }

        fn update(&mut self, _component: &Health) {
            self.updates += 1;
        }
    }

    /// Exposes a `HealthRenderer`'s state to the test after type erasure.
    struct SharedHealthRenderer(Arc<Mutex<HealthRenderer>>);

    impl Renderer<Health> for SharedHealthRenderer {
        fn render(&mut self, component: &Health) {
            self.0.lock().render(component);
        }

        fn update(&mut self, component: &Health) {
            self.0.lock().update(component);
        }
    }

    struct ItemRenderer;

    impl Renderer<Item> for ItemRenderer {
        fn render(&mut self, _component: &Item) {}
    }

    #[test]
    fn update_defaults_to_noop() {
        let mut renderer = ItemRenderer;
        renderer.update(&Item);
        renderer.render(&Item);
    }

    #[test]
    fn dyn_renderer_dispatches_to_bound_type() {
        let state = Arc::new(Mutex::new(HealthRenderer::default()));
        let typed = TypedRenderer::<Health>::new(SharedHealthRenderer(state.clone()));
        let handle = typed.handle.clone();
        let dyn_renderer = DynRenderer::new(Arc::new(typed));

        dyn_renderer.render(&Health { hp: 20 });
        dyn_renderer.update(&Health { hp: 20 });
        // Wrong component type: ignored
        dyn_renderer.render(&Item);
        dyn_renderer.update(&Item);

        assert!(dyn_renderer.renderer_type().ends_with("SharedHealthRenderer"));
        assert!(dyn_renderer.downcast::<Item>().is_none());

        // The typed handle drives the same renderer as the erased one
        let downcast = dyn_renderer.downcast::<Health>().unwrap();
        assert!(Arc::ptr_eq(&downcast, &handle));
        downcast.lock().render(&Health { hp: 5 });

        let state = state.lock();
        assert_eq!(state.drawn, [20, 5]);
        assert_eq!(state.updates, 1);
    }

    #[test]
    fn same_renderer_compares_instances() {
        let a = DynRenderer::new(Arc::new(TypedRenderer::<Item>::new(ItemRenderer)));
        let b = DynRenderer::new(Arc::new(TypedRenderer::<Item>::new(ItemRenderer)));

        assert!(a.same_renderer(&a.clone()));
        assert!(!a.same_renderer(&b));
    }
}
