//! Scroll-driven property animation.
//!
//! This module provides:
//! - **Value codec**: Numeric token extraction and value templates
//! - **Step compilation**: Sorting steps into transitions between adjacent positions
//! - **Interpolation**: Per-component easing of compiled animators
//! - **Registry**: Rendering every registered animation at a scroll position
//!
//! # Architecture
//!
//! ```text
//! AnimationRegistry
//!   ├── StepCompiler (Steps → PositionList + Transitions)
//!   │     ├── PropertyNames (camelCase + vendor prefix, memoised)
//!   │     └── ValueNormalizer → Template + start values + deltas
//!   └── AnimationEntry (ElementSet + Transitions + Easing)
//!
//! render(position)
//!   └── clear → commit / interpolate / start → StyleTarget
//! ```

pub mod codec;
pub mod compiler;
pub mod easing;
pub mod interpolate;
pub mod properties;
pub mod registry;
pub mod style;

pub use codec::{HexColorNormalizer, Template, ValueNormalizer};
pub use compiler::{
    PositionList, PropertyAnimator, PropertySet, Step, StepCompiler, Steps, Transition,
};
pub use easing::{Easing, EasingFunction, StepPosition};
pub use properties::{CapabilityTable, PropertyNames};
pub use registry::{AnimationEntry, AnimationOptions, AnimationRegistry, ResolvedOptions};
pub use relax_config::{StartBoundary, TokenMismatch};
pub use style::{ElementSet, InlineStyle, StyleTarget};
