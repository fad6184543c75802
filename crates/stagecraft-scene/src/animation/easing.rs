//! Easing functions for animation timing.
//!
//! This module implements the Penner easing families used by UI tweening
//! (`In`, `Out` and `InOut` variants of Sine, Quad, Cubic, Quart, Quint, Expo,
//! Circ, Back, Elastic and Bounce), the CSS presets and custom cubic beziers.
//!
//! It also owns the ease-inversion policy: a sequence played backwards picks
//! the time-reversed partner of each curve, and overshoot-style "settle in"
//! curves (which have no sensible reverse) collapse to a plain accelerating
//! curve instead.
//!
//! # Usage
//!
//! ```
//! use stagecraft_scene::animation::easing::EasingFunction;
//!
//! let ease = EasingFunction::OutBack;
//! let progress = ease.evaluate(0.5);
//! assert!(progress > 0.5);
//!
//! // Collapsing the same element uses a plain accelerating curve.
//! assert_eq!(ease.for_direction(true), EasingFunction::InQuad);
//! ```

use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const BACK_C1: f32 = 1.70158;
const BACK_C2: f32 = BACK_C1 * 1.525;
const BACK_C3: f32 = BACK_C1 + 1.0;
const ELASTIC_C4: f32 = (2.0 * PI) / 3.0;
const ELASTIC_C5: f32 = (2.0 * PI) / 4.5;

/// Easing function for animation timing.
///
/// Easing functions map a linear progress value (0.0 to 1.0) to an eased
/// output value, controlling the rate of change over time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,

    InSine,
    OutSine,
    InOutSine,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    InQuint,
    OutQuint,
    InOutQuint,
    InExpo,
    OutExpo,
    InOutExpo,
    InCirc,
    OutCirc,
    InOutCirc,

    /// Pulls back before accelerating.
    InBack,
    /// Overshoots the target, then settles.
    OutBack,
    InOutBack,
    InElastic,
    /// Springs past the target and oscillates into place.
    OutElastic,
    InOutElastic,
    InBounce,
    /// Bounces against the target like a dropped ball.
    OutBounce,
    InOutBounce,

    /// CSS `ease` - `cubic-bezier(0.25, 0.1, 0.25, 1.0)`.
    Ease,
    /// CSS `ease-in` - `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,
    /// CSS `ease-out` - `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,
    /// CSS `ease-in-out` - `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,

    /// Custom cubic bezier curve.
    /// Parameters: (x1, y1, x2, y2) - control points.
    /// x values must be in [0, 1], y values can be any float.
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl Default for EasingFunction {
    fn default() -> Self {
        Self::OutQuad
    }
}

/// Every named (parameterless) curve, in declaration order.
pub const NAMED_EASINGS: [EasingFunction; 35] = [
    EasingFunction::Linear,
    EasingFunction::InSine,
    EasingFunction::OutSine,
    EasingFunction::InOutSine,
    EasingFunction::InQuad,
    EasingFunction::OutQuad,
    EasingFunction::InOutQuad,
    EasingFunction::InCubic,
    EasingFunction::OutCubic,
    EasingFunction::InOutCubic,
    EasingFunction::InQuart,
    EasingFunction::OutQuart,
    EasingFunction::InOutQuart,
    EasingFunction::InQuint,
    EasingFunction::OutQuint,
    EasingFunction::InOutQuint,
    EasingFunction::InExpo,
    EasingFunction::OutExpo,
    EasingFunction::InOutExpo,
    EasingFunction::InCirc,
    EasingFunction::OutCirc,
    EasingFunction::InOutCirc,
    EasingFunction::InBack,
    EasingFunction::OutBack,
    EasingFunction::InOutBack,
    EasingFunction::InElastic,
    EasingFunction::OutElastic,
    EasingFunction::InOutElastic,
    EasingFunction::InBounce,
    EasingFunction::OutBounce,
    EasingFunction::InOutBounce,
    EasingFunction::Ease,
    EasingFunction::EaseIn,
    EasingFunction::EaseOut,
    EasingFunction::EaseInOut,
];

impl EasingFunction {
    /// Evaluate the easing function at the given progress.
    ///
    /// The input is clamped to `[0, 1]`; the output is exactly 0 at the start
    /// and exactly 1 at the end, but may leave that range in between for
    /// overshoot curves.
    pub fn evaluate(&self, t: f32) -> f32 {
        if t.is_nan() || t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        match self {
            Self::Linear => t,
            Self::InSine => 1.0 - (t * PI / 2.0).cos(),
            Self::OutSine => (t * PI / 2.0).sin(),
            Self::InOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Self::InQuad => ease_in_pow(t, 2),
            Self::OutQuad => ease_out_pow(t, 2),
            Self::InOutQuad => ease_in_out_pow(t, 2),
            Self::InCubic => ease_in_pow(t, 3),
            Self::OutCubic => ease_out_pow(t, 3),
            Self::InOutCubic => ease_in_out_pow(t, 3),
            Self::InQuart => ease_in_pow(t, 4),
            Self::OutQuart => ease_out_pow(t, 4),
            Self::InOutQuart => ease_in_out_pow(t, 4),
            Self::InQuint => ease_in_pow(t, 5),
            Self::OutQuint => ease_out_pow(t, 5),
            Self::InOutQuint => ease_in_out_pow(t, 5),
            Self::InExpo => 2f32.powf(10.0 * t - 10.0),
            Self::OutExpo => 1.0 - 2f32.powf(-10.0 * t),
            Self::InOutExpo => {
                if t < 0.5 {
                    2f32.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f32.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            Self::InCirc => 1.0 - (1.0 - t * t).sqrt(),
            Self::OutCirc => (1.0 - (t - 1.0).powi(2)).sqrt(),
            Self::InOutCirc => {
                if t < 0.5 {
                    (1.0 - (1.0 - (2.0 * t).powi(2)).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * t + 2.0).powi(2)).sqrt() + 1.0) / 2.0
                }
            }
            Self::InBack => BACK_C3 * t * t * t - BACK_C1 * t * t,
            Self::OutBack => 1.0 + BACK_C3 * (t - 1.0).powi(3) + BACK_C1 * (t - 1.0).powi(2),
            Self::InOutBack => {
                if t < 0.5 {
                    ((2.0 * t).powi(2) * ((BACK_C2 + 1.0) * 2.0 * t - BACK_C2)) / 2.0
                } else {
                    ((2.0 * t - 2.0).powi(2) * ((BACK_C2 + 1.0) * (t * 2.0 - 2.0) + BACK_C2) + 2.0)
                        / 2.0
                }
            }
            Self::InElastic => {
                -(2f32.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * ELASTIC_C4).sin()
            }
            Self::OutElastic => {
                2f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * ELASTIC_C4).sin() + 1.0
            }
            Self::InOutElastic => {
                if t < 0.5 {
                    -(2f32.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * ELASTIC_C5).sin()) / 2.0
                } else {
                    (2f32.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * ELASTIC_C5).sin()) / 2.0
                        + 1.0
                }
            }
            Self::InBounce => 1.0 - out_bounce(1.0 - t),
            Self::OutBounce => out_bounce(t),
            Self::InOutBounce => {
                if t < 0.5 {
                    (1.0 - out_bounce(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + out_bounce(2.0 * t - 1.0)) / 2.0
                }
            }
            Self::Ease => cubic_bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(*x1, *y1, *x2, *y2, t),
        }
    }

    /// Create a custom cubic bezier easing function.
    ///
    /// # Panics
    /// Panics if x1 or x2 are outside [0, 1].
    pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        assert!(
            (0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2),
            "Bezier x values must be in [0, 1]"
        );
        Self::CubicBezier { x1, y1, x2, y2 }
    }

    /// Check if this curve overshoots its target before settling.
    pub fn is_overshoot(&self) -> bool {
        matches!(self, Self::OutBack | Self::OutBounce | Self::OutElastic)
    }

    /// Pick the curve to use when playing in the given direction.
    ///
    /// Forward play keeps the curve. Reverse play swaps `Out*` and `In*`
    /// partners and replaces overshoot curves with [`EasingFunction::InQuad`].
    /// Curves without a rule are returned unchanged.
    pub fn for_direction(self, reverse: bool) -> Self {
        invert_ease(self, reverse)
    }

    /// Get the snake_case name of this curve (`"custom"` for beziers).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::InSine => "in_sine",
            Self::OutSine => "out_sine",
            Self::InOutSine => "in_out_sine",
            Self::InQuad => "in_quad",
            Self::OutQuad => "out_quad",
            Self::InOutQuad => "in_out_quad",
            Self::InCubic => "in_cubic",
            Self::OutCubic => "out_cubic",
            Self::InOutCubic => "in_out_cubic",
            Self::InQuart => "in_quart",
            Self::OutQuart => "out_quart",
            Self::InOutQuart => "in_out_quart",
            Self::InQuint => "in_quint",
            Self::OutQuint => "out_quint",
            Self::InOutQuint => "in_out_quint",
            Self::InExpo => "in_expo",
            Self::OutExpo => "out_expo",
            Self::InOutExpo => "in_out_expo",
            Self::InCirc => "in_circ",
            Self::OutCirc => "out_circ",
            Self::InOutCirc => "in_out_circ",
            Self::InBack => "in_back",
            Self::OutBack => "out_back",
            Self::InOutBack => "in_out_back",
            Self::InElastic => "in_elastic",
            Self::OutElastic => "out_elastic",
            Self::InOutElastic => "in_out_elastic",
            Self::InBounce => "in_bounce",
            Self::OutBounce => "out_bounce",
            Self::InOutBounce => "in_out_bounce",
            Self::Ease => "ease",
            Self::EaseIn => "ease_in",
            Self::EaseOut => "ease_out",
            Self::EaseInOut => "ease_in_out",
            Self::CubicBezier { .. } => "custom",
        }
    }
}

impl fmt::Display for EasingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown easing name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown easing function: {0}")]
pub struct ParseEasingError(pub String);

impl FromStr for EasingFunction {
    type Err = ParseEasingError;

    /// Parse a named curve. Accepts snake_case and camel/Pascal case
    /// (`out_back`, `OutBack`, `outBack`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        NAMED_EASINGS
            .iter()
            .copied()
            .find(|e| e.name().replace('_', "") == wanted)
            .ok_or_else(|| ParseEasingError(s.to_string()))
    }
}

/// Ease-inversion policy.
///
/// Maps a forward curve to the curve that makes a reverse play look
/// authored rather than mechanically rewound. Pure function of its inputs.
pub fn invert_ease(ease: EasingFunction, reverse: bool) -> EasingFunction {
    use EasingFunction::*;

    if !reverse {
        return ease;
    }

    match ease {
        OutBack | OutBounce | OutElastic => InQuad,
        OutSine => InSine,
        InSine => OutSine,
        OutQuad => InQuad,
        InQuad => OutQuad,
        OutCubic => InCubic,
        InCubic => OutCubic,
        OutQuart => InQuart,
        InQuart => OutQuart,
        OutQuint => InQuint,
        InQuint => OutQuint,
        OutExpo => InExpo,
        InExpo => OutExpo,
        OutCirc => InCirc,
        InCirc => OutCirc,
        EaseOut => EaseIn,
        EaseIn => EaseOut,
        other => other,
    }
}

#[inline]
fn ease_in_pow(t: f32, n: i32) -> f32 {
    t.powi(n)
}

#[inline]
fn ease_out_pow(t: f32, n: i32) -> f32 {
    1.0 - (1.0 - t).powi(n)
}

#[inline]
fn ease_in_out_pow(t: f32, n: i32) -> f32 {
    if t < 0.5 {
        2f32.powi(n - 1) * t.powi(n)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(n) / 2.0
    }
}

fn out_bounce(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;

    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

/// Evaluate a cubic bezier curve at time t.
///
/// Uses Newton-Raphson iteration to find the curve parameter for the input
/// progress, then evaluates the y coordinate at that point.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, progress: f32) -> f32 {
    let t = solve_bezier_x(x1, x2, progress);
    bezier_component(y1, y2, t)
}

fn solve_bezier_x(x1: f32, x2: f32, target_x: f32) -> f32 {
    let mut t = target_x;

    for _ in 0..8 {
        let x = bezier_component(x1, x2, t) - target_x;
        if x.abs() < 1e-6 {
            break;
        }

        let dx = bezier_x_derivative(x1, x2, t);
        if dx.abs() < 1e-6 {
            break;
        }

        t -= x / dx;
        t = t.clamp(0.0, 1.0);
    }

    t
}

/// B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³
#[inline]
fn bezier_component(p1: f32, p2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
}

#[inline]
fn bezier_x_derivative(x1: f32, x2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * x1 + 6.0 * mt * t * (x2 - x1) + 3.0 * t * t * (1.0 - x2)
}
