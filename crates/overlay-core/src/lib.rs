//! Component-to-renderer binding registry for overlay UIs.
//!
//! A [`Theme`] binds each [`Component`] type to one [`Renderer`] type and
//! lazily constructs one renderer per component instance, caching it for as
//! long as the component lives. [`Transition`] provides the named easing
//! curves renderers use for animated values.

pub mod animation;
mod component;
mod error;
mod renderer;
pub mod theme;

pub use animation::{Transition, UnknownTransition};
pub use component::{AsAny, Component};
pub use error::{BoxError, Result, ThemeError};
pub use renderer::{DynRenderer, Renderer, RendererHandle};
pub use theme::{PrepareHandle, Theme, ThemeBuilder};

pub use overlay_config::CacheConfig;
