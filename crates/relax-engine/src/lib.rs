//! Scroll-position keyed property interpolation.
//!
//! Animations are authored as steps: scroll positions mapped to style
//! properties. Between two adjacent steps every property present in both is
//! interpolated component by component; once the scroll position passes a
//! step its properties are committed as authored.

pub mod animation;
pub mod error;
pub mod scroll;

pub use animation::{AnimationOptions, AnimationRegistry, InlineStyle, Steps};
pub use error::{RelaxError, Result};
pub use scroll::{ListenerId, ScrollBinding, ScrollEvents, ScrollNotifier, ScrollOffset, ScrollSource};
