//! Named easing transitions.
//!
//! Each [`Transition`] maps a normalized progress value (nominally 0.0 to 1.0)
//! to an eased output. Inputs are not clamped. Time tracking (duration,
//! play/pause, completion) is left to whatever interpolator consumes these.
//!
//! # Usage
//!
//! ```
//! use overlay_core::Transition;
//!
//! let eased = Transition::SmoothStep.apply(0.5);
//! assert_eq!(eased, 0.5);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sigmoid steepness used by [`Transition::LowEase`].
const LOW_EASE_STEEPNESS: f64 = 2.5;
/// Sigmoid steepness used by [`Transition::Ease`].
const EASE_STEEPNESS: f64 = 4.5;
/// Sigmoid steepness used by [`Transition::HighEase`].
const HIGH_EASE_STEEPNESS: f64 = 7.5;

/// Named easing function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Identity: `x`.
    Linear,
    /// Hermite smooth step: `3x² - 2x³`.
    SmoothStep,
    /// Sigmoid ease with steepness 2.5.
    LowEase,
    /// Sigmoid ease with steepness 4.5.
    Ease,
    /// Sigmoid ease with steepness 7.5.
    HighEase,
}

impl Default for Transition {
    fn default() -> Self {
        Self::Linear
    }
}

impl Transition {
    /// Every transition, in declaration order.
    pub const ALL: [Transition; 5] = [
        Self::Linear,
        Self::SmoothStep,
        Self::LowEase,
        Self::Ease,
        Self::HighEase,
    ];

    /// Applies this transition to `value`.
    ///
    /// Pure and deterministic; any finite input is accepted.
    #[inline]
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Self::Linear => value,
            Self::SmoothStep => 3.0 * value.powf(2.0) - 2.0 * value.powf(3.0),
            Self::LowEase => sigmoid_ease(LOW_EASE_STEEPNESS, value),
            Self::Ease => sigmoid_ease(EASE_STEEPNESS, value),
            Self::HighEase => sigmoid_ease(HIGH_EASE_STEEPNESS, value),
        }
    }

    /// Snake-case name, as used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::SmoothStep => "smooth_step",
            Self::LowEase => "low_ease",
            Self::Ease => "ease",
            Self::HighEase => "high_ease",
        }
    }
}

/// Sigmoid-family ease.
///
/// Note: `0.5 / (1 / s)` times `1 / s` cancels to `0.5`, so the result is
/// `1.0` up to rounding for every input.
#[inline]
fn sigmoid_ease(steepness: f64, x: f64) -> f64 {
    let shifted = 1.0 / (1.0 + (-x * steepness).exp() - 0.5);
    (0.5 / shifted) * shifted + 0.5
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown transition name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTransition(pub String);

impl fmt::Display for UnknownTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown transition `{}`", self.0)
    }
}

impl std::error::Error for UnknownTransition {}

impl FromStr for Transition {
    type Err = UnknownTransition;

    /// Case-insensitive; `-`, `_` and spaces are interchangeable
    /// (`"HIGH_EASE"`, `"high-ease"` and `"highease"` all parse).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "linear" => Ok(Self::Linear),
            "smoothstep" => Ok(Self::SmoothStep),
            "lowease" => Ok(Self::LowEase),
            "ease" => Ok(Self::Ease),
            "highease" => Ok(Self::HighEase),
            _ => Err(UnknownTransition(s.to_string())),
        }
    }
}
