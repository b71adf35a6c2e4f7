//! Easing functions for position-driven interpolation.
//!
//! Every easing follows the `(t, b, c, d)` contract:
//! - `t` - elapsed progress
//! - `b` - start value
//! - `c` - change in value (end - start)
//! - `d` - duration (always `1.0` here, progress is pre-normalised)
//!
//! Built-ins:
//! - Linear, EaseIn, EaseOut (quadratic), EaseInOut (quadratic)
//! - CubicBezier (CSS timing curves)
//! - Steps (stepped timing)
//!
//! # Usage
//!
//! ```
//! use relax_engine::animation::easing::{Easing, EasingFunction};
//!
//! let value = EasingFunction::EaseIn.apply(0.5, 0.0, 100.0, 1.0); // 25.0
//!
//! let custom = Easing::custom(|t, b, c, d| c * (t / d).sqrt() + b);
//! let value = custom.apply(0.25, 0.0, 100.0, 1.0); // 50.0
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Position for stepped easing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepPosition {
    /// Jump at the start of each interval (CSS `jump-start`).
    Start,
    /// Jump at the end of each interval (CSS `jump-end`).
    #[default]
    End,
}

/// Linear: `c*t/d + b`.
pub fn linear(t: f64, b: f64, c: f64, d: f64) -> f64 {
    c * t / d + b
}

/// Quadratic ease-in: `c*(t/d)^2 + b`.
pub fn ease_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    c * t * t + b
}

/// Quadratic ease-out: `-c*(t/d)*(t/d - 2) + b`.
pub fn ease_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / d;
    -c * t * (t - 2.0) + b
}

/// Quadratic ease-in-out, accelerating until halfway then decelerating.
pub fn ease_in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let t = t / (d / 2.0);
    if t < 1.0 {
        c / 2.0 * t * t + b
    } else {
        let t = t - 1.0;
        -c / 2.0 * (t * (t - 2.0) - 1.0) + b
    }
}

/// Named easing curves.
///
/// These are the curves selectable from configuration. Arbitrary closures
/// go through [`Easing::custom`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingFunction {
    /// Constant rate.
    #[default]
    Linear,

    /// Quadratic, slow start.
    EaseIn,

    /// Quadratic, slow end.
    EaseOut,

    /// Quadratic, slow start and end.
    EaseInOut,

    /// CSS `cubic-bezier(x1, y1, x2, y2)`.
    /// x values must be in [0, 1], y values can be any float.
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },

    /// CSS `steps(count, position)`.
    Steps { count: u32, position: StepPosition },
}

impl EasingFunction {
    /// Evaluate the curve under the `(t, b, c, d)` contract.
    ///
    /// The quadratic curves extrapolate when `t` leaves `[0, d]`; the bezier
    /// and stepped curves hold their end values.
    pub fn apply(&self, t: f64, b: f64, c: f64, d: f64) -> f64 {
        match self {
            Self::Linear => linear(t, b, c, d),
            Self::EaseIn => ease_in(t, b, c, d),
            Self::EaseOut => ease_out(t, b, c, d),
            Self::EaseInOut => ease_in_out(t, b, c, d),
            Self::CubicBezier { x1, y1, x2, y2 } => c * cubic_bezier(*x1, *y1, *x2, *y2, t / d) + b,
            Self::Steps { count, position } => c * stepped(*count, *position, t / d) + b,
        }
    }

    /// Create a cubic bezier easing.
    ///
    /// # Panics
    /// Panics if x1 or x2 are outside [0, 1].
    pub fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2),
            "Bezier x values must be in [0, 1]"
        );
        Self::CubicBezier { x1, y1, x2, y2 }
    }

    /// Create a stepped easing.
    ///
    /// # Panics
    /// Panics if steps is 0.
    pub fn steps(steps: u32, position: StepPosition) -> Self {
        assert!(steps >= 1, "Steps must be at least 1");
        Self::Steps {
            count: steps,
            position,
        }
    }
}

impl FromStr for EasingFunction {
    type Err = String;

    /// Parse a named curve. Accepts `ease_in`, `ease-in` and `easeIn` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "linear" => Ok(Self::Linear),
            "easein" => Ok(Self::EaseIn),
            "easeout" => Ok(Self::EaseOut),
            "easeinout" => Ok(Self::EaseInOut),
            _ => Err(format!("unknown easing function: {}", s)),
        }
    }
}

/// Easing handle stored on each registration.
///
/// Either a named curve or any closure matching the `(t, b, c, d)` contract.
#[derive(Clone)]
pub enum Easing {
    Builtin(EasingFunction),
    Custom(Rc<dyn Fn(f64, f64, f64, f64) -> f64>),
}

impl Easing {
    /// Wrap a closure matching the `(t, b, c, d)` contract.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f64, f64, f64, f64) -> f64 + 'static,
    {
        Self::Custom(Rc::new(f))
    }

    #[inline]
    pub fn apply(&self, t: f64, b: f64, c: f64, d: f64) -> f64 {
        match self {
            Self::Builtin(function) => function.apply(t, b, c, d),
            Self::Custom(f) => f(t, b, c, d),
        }
    }
}

impl Default for Easing {
    fn default() -> Self {
        Self::Builtin(EasingFunction::Linear)
    }
}

impl From<EasingFunction> for Easing {
    fn from(function: EasingFunction) -> Self {
        Self::Builtin(function)
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(function) => f.debug_tuple("Builtin").field(function).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Evaluate a cubic bezier timing curve at `progress`.
///
/// Solves for the curve parameter with Newton-Raphson, then evaluates y.
fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, progress: f64) -> f64 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }

    let t = solve_bezier_x(x1, x2, progress);
    bezier_axis(y1, y2, t)
}

fn solve_bezier_x(x1: f64, x2: f64, target_x: f64) -> f64 {
    let mut t = target_x;

    for _ in 0..8 {
        let x = bezier_axis(x1, x2, t) - target_x;
        if x.abs() < 1e-7 {
            break;
        }

        let dx = bezier_x_derivative(x1, x2, t);
        if dx.abs() < 1e-7 {
            break;
        }

        t = (t - x / dx).clamp(0.0, 1.0);
    }

    t
}

/// One axis of the curve: 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³
#[inline]
fn bezier_axis(p1: f64, p2: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
}

/// dx/dt = 3(1-t)²·x1 + 6(1-t)t·(x2-x1) + 3t²·(1-x2)
#[inline]
fn bezier_x_derivative(x1: f64, x2: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * x1 + 6.0 * mt * t * (x2 - x1) + 3.0 * t * t * (1.0 - x2)
}

fn stepped(steps: u32, position: StepPosition, t: f64) -> f64 {
    if steps == 0 {
        return t;
    }
    let t = t.clamp(0.0, 1.0);
    let steps = steps as f64;

    match position {
        StepPosition::Start => (t * steps).ceil() / steps,
        StepPosition::End => (t * steps).floor() / steps,
    }
}
