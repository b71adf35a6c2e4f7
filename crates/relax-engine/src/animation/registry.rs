//! Registry of scroll-driven animations.
//!
//! The `AnimationRegistry` holds one entry per registered element set and
//! renders all of them for a given scroll position:
//! - Compiling steps on `add`
//! - Committing completed transitions, interpolating the active one
//! - Clearing applied style on `reset`
//!
//! # Usage
//!
//! ```
//! use relax_engine::animation::{AnimationOptions, AnimationRegistry, InlineStyle, Steps};
//!
//! let element = InlineStyle::new();
//! let mut registry = AnimationRegistry::new();
//! registry
//!     .add(
//!         element.clone(),
//!         &Steps::new()
//!             .step(0, |s| s.set("opacity", "0"))
//!             .step(100, |s| s.set("opacity", "1")),
//!         AnimationOptions::default(),
//!     )
//!     .unwrap();
//!
//! registry.render(50.0);
//! assert_eq!(element.get("opacity").as_deref(), Some("0.5"));
//! ```

use relax_config::{RelaxConfig, StartBoundary};

use super::compiler::{PositionList, StepCompiler, Steps, Transition};
use super::easing::{Easing, EasingFunction};
use super::interpolate;
use super::properties::CapabilityTable;
use super::style::{ElementSet, StyleTarget};
use crate::error::Result;

/// Caller-supplied options; unset fields fall back to the registry defaults.
#[derive(Debug, Clone, Default)]
pub struct AnimationOptions {
    pub easing: Option<Easing>,
}

impl AnimationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_easing(mut self, easing: impl Into<Easing>) -> Self {
        self.easing = Some(easing.into());
        self
    }

    fn resolve(self, defaults: &ResolvedOptions) -> ResolvedOptions {
        ResolvedOptions {
            easing: self.easing.unwrap_or_else(|| defaults.easing.clone()),
        }
    }
}

/// Options after merging over defaults.
#[derive(Debug, Clone, Default)]
pub struct ResolvedOptions {
    pub easing: Easing,
}

/// One registration: its elements, compiled transitions and options.
#[derive(Debug)]
pub struct AnimationEntry<H> {
    elements: ElementSet<H>,
    positions: PositionList,
    transitions: Vec<Transition>,
    options: ResolvedOptions,
}

impl<H> AnimationEntry<H> {
    pub fn elements(&self) -> &ElementSet<H> {
        &self.elements
    }

    pub fn positions(&self) -> &[i64] {
        &self.positions
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn options(&self) -> &ResolvedOptions {
        &self.options
    }
}

/// Which branch `render` took for a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    Commit,
    Interpolate,
    Start,
    Pending,
}

/// Ordered, append-only set of animations. Insertion order is render order.
pub struct AnimationRegistry<H> {
    entries: Vec<AnimationEntry<H>>,
    compiler: StepCompiler,
    defaults: ResolvedOptions,
    start_boundary: StartBoundary,
    diagnostics: bool,
}

impl<H> Default for AnimationRegistry<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            compiler: StepCompiler::default(),
            defaults: ResolvedOptions::default(),
            start_boundary: StartBoundary::default(),
            diagnostics: false,
        }
    }
}

impl<H> AnimationRegistry<H> {
    /// Create an empty registry with linear easing and no capability table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry configured from `relax.toml` settings.
    pub fn from_config(config: &RelaxConfig) -> Self {
        let engine = &config.engine;
        let easing = engine
            .default_easing
            .parse::<EasingFunction>()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "falling back to linear easing");
                EasingFunction::Linear
            });

        let compiler = StepCompiler::new(CapabilityTable::from_config(&config.capabilities))
            .with_token_mismatch(engine.token_mismatch)
            .with_diagnostics(engine.diagnostics_enabled("compile"));

        Self {
            entries: Vec::new(),
            compiler,
            defaults: ResolvedOptions {
                easing: easing.into(),
            },
            start_boundary: engine.start_boundary,
            diagnostics: engine.diagnostics_enabled("render"),
        }
    }

    pub fn with_compiler(mut self, compiler: StepCompiler) -> Self {
        self.compiler = compiler;
        self
    }

    pub fn with_default_easing(mut self, easing: impl Into<Easing>) -> Self {
        self.defaults.easing = easing.into();
        self
    }

    pub fn with_start_boundary(mut self, start_boundary: StartBoundary) -> Self {
        self.start_boundary = start_boundary;
        self
    }

    pub fn entries(&self) -> &[AnimationEntry<H>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compile `steps` and append an entry for `element`.
    ///
    /// Nothing is appended when compilation fails.
    pub fn add(
        &mut self,
        element: impl Into<ElementSet<H>>,
        steps: &Steps,
        options: AnimationOptions,
    ) -> Result<()> {
        let (positions, transitions) = self.compiler.compile(steps)?;
        let elements = element.into();

        tracing::debug!(
            entry = self.entries.len(),
            elements = elements.len(),
            transitions = transitions.len(),
            "registered scroll animation"
        );

        self.entries.push(AnimationEntry {
            elements,
            positions,
            transitions,
            options: options.resolve(&self.defaults),
        });
        Ok(())
    }
}

impl<H: StyleTarget> AnimationRegistry<H> {
    /// Apply every entry's style for scroll `position`.
    ///
    /// Each entry's style is cleared first. Transitions then run in order:
    /// completed ones commit their end values, the one containing `position`
    /// is interpolated, later ones are left alone.
    pub fn render(&self, position: f64) {
        for (index, entry) in self.entries.iter().enumerate() {
            entry.elements.clear_style();

            for transition in &entry.transitions {
                let branch = self.render_transition(entry, transition, position);
                if self.diagnostics {
                    tracing::trace!(
                        entry = index,
                        start = transition.start_pos,
                        end = transition.end_pos,
                        position,
                        branch = ?branch,
                        "diagnostics: rendered transition"
                    );
                }
            }
        }
    }

    fn render_transition(&self, entry: &AnimationEntry<H>, transition: &Transition, position: f64) -> Branch {
        let start = transition.start_pos as f64;
        let end = transition.end_pos as f64;

        if position >= end {
            entry.elements.apply(&transition.end_props);
            Branch::Commit
        } else if position > start {
            for (name, value) in interpolate::render_transition(transition, position, &entry.options.easing) {
                entry.elements.set_property(name, &value);
            }
            Branch::Interpolate
        } else if position == start && self.start_boundary == StartBoundary::ApplyStart {
            entry.elements.apply(&transition.start_props);
            Branch::Start
        } else {
            Branch::Pending
        }
    }

    /// Clear applied style on every registered element.
    pub fn reset(&self) {
        for entry in &self.entries {
            entry.elements.clear_style();
        }
    }
}
