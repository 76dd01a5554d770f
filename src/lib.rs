//! Overlay UI toolkit.
//!
//! Re-exports the theme registry, renderer capability and easing transitions.

pub use overlay_core::*;
