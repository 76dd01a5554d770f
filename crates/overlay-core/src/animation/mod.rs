//! Animation support for overlay renderers.
//!
//! Only the easing curves live here; the time-driven interpolator that
//! feeds them progress values belongs to the embedding application.

pub mod transition;

pub use transition::{Transition, UnknownTransition};
