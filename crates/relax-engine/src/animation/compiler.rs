//! Step compilation.
//!
//! Turns sparse, user-authored steps into the data `render` needs:
//! - `PositionList`: ascending step positions
//! - `Transition`: one per pair of adjacent positions
//! - `PropertyAnimator`: per property shared by both ends of a transition
//!
//! # Example
//!
//! ```
//! use relax_engine::animation::compiler::{StepCompiler, Steps};
//!
//! let steps = Steps::new()
//!     .step(100, |s| s.set("opacity", "1"))
//!     .step(0, |s| s.set("opacity", "0"));
//!
//! let (positions, transitions) = StepCompiler::default().compile(&steps).unwrap();
//! assert_eq!(positions, vec![0, 100]);
//! assert_eq!(transitions[0].distance, 100);
//! ```

use std::collections::BTreeMap;

use relax_config::TokenMismatch;

use super::codec::{self, HexColorNormalizer, Template, ValueNormalizer};
use super::properties::{CapabilityTable, PropertyNames};
use crate::error::{RelaxError, Result};

/// Property name → formatted value.
pub type PropertySet = BTreeMap<String, String>;

/// Ascending, distinct step positions.
pub type PositionList = Vec<i64>;

/// Values that are authoritative at one scroll position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Step {
    pub position: i64,
    pub properties: PropertySet,
}

impl Step {
    pub fn new(position: i64) -> Self {
        Self {
            position,
            properties: PropertySet::new(),
        }
    }

    /// Set a property value at this step.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

/// User-authored steps for one registration, in any order.
#[derive(Debug, Clone, Default)]
pub struct Steps {
    steps: Vec<Step>,
}

impl Steps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a step using a builder function.
    pub fn step<F>(mut self, position: i64, builder: F) -> Self
    where
        F: FnOnce(Step) -> Step,
    {
        self.steps.push(builder(Step::new(position)));
        self
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }

    /// Parse a JSON steps document.
    ///
    /// ```json
    /// { "0": { "opacity": "0" }, "100": { "opacity": 1, "margin-left": "20px" } }
    /// ```
    ///
    /// Keys are read as their leading integer (`"100px"` is 100). Values may
    /// be strings or numbers; numbers are stored in shortest decimal form
    /// (`1.0` becomes `"1"`, `1e-7` becomes `"0.0000001"`).
    pub fn from_json(source: &str) -> Result<Self> {
        let document: BTreeMap<String, BTreeMap<String, serde_json::Value>> =
            serde_json::from_str(source)?;

        let mut steps = Self::new();
        for (key, values) in document {
            let position = parse_position(&key)?;
            let mut step = Step::new(position);
            for (property, value) in values {
                let text = match value {
                    serde_json::Value::String(s) => s,
                    serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                        (Some(int), _) => int.to_string(),
                        (None, Some(float)) => codec::format_number(float),
                        (None, None) => {
                            return Err(RelaxError::InvalidValue { position, property });
                        }
                    },
                    _ => return Err(RelaxError::InvalidValue { position, property }),
                };
                step.properties.insert(property, text);
            }
            steps.push(step);
        }
        Ok(steps)
    }
}

impl FromIterator<Step> for Steps {
    fn from_iter<I: IntoIterator<Item = Step>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

impl From<BTreeMap<i64, PropertySet>> for Steps {
    fn from(map: BTreeMap<i64, PropertySet>) -> Self {
        map.into_iter()
            .map(|(position, properties)| Step {
                position,
                properties,
            })
            .collect()
    }
}

/// Read the leading integer of a document key: optional whitespace, optional
/// sign, then digits. Anything after the digits is ignored.
fn parse_position(key: &str) -> Result<i64> {
    let trimmed = key.trim_start();
    let sign_len = usize::from(trimmed.starts_with(['-', '+']));
    let digits_len = trimmed[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return Err(RelaxError::InvalidPosition(key.to_string()));
    }
    trimmed[..sign_len + digits_len]
        .parse()
        .map_err(|_| RelaxError::InvalidPosition(key.to_string()))
}

/// Per-property interpolation state within a transition.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyAnimator {
    /// Numbers extracted from the start value.
    pub start_values: Vec<f64>,
    /// `end - start`, elementwise; same length as `start_values`.
    pub delta: Vec<f64>,
    /// The start value with numbers replaced by placeholders.
    pub template: Template,
}

/// Interpolation rule between two adjacent steps.
#[derive(Debug, Clone)]
pub struct Transition {
    pub start_pos: i64,
    pub end_pos: i64,
    /// `end_pos - start_pos`, always positive.
    pub distance: i64,
    pub start_props: PropertySet,
    pub end_props: PropertySet,
    /// Only properties present at both ends.
    pub animators: BTreeMap<String, PropertyAnimator>,
}

impl Transition {
    /// Normalised position within this transition. Not clamped.
    #[inline]
    pub fn progress(&self, position: f64) -> f64 {
        (position - self.start_pos as f64) / self.distance as f64
    }
}

/// Compiles [`Steps`] into positions and transitions.
pub struct StepCompiler {
    names: PropertyNames,
    normalizer: Box<dyn ValueNormalizer>,
    token_mismatch: TokenMismatch,
    diagnostics: bool,
}

impl Default for StepCompiler {
    fn default() -> Self {
        Self::new(CapabilityTable::default())
    }
}

impl StepCompiler {
    pub fn new(capabilities: CapabilityTable) -> Self {
        Self {
            names: PropertyNames::new(capabilities),
            normalizer: Box::new(HexColorNormalizer),
            token_mismatch: TokenMismatch::default(),
            diagnostics: false,
        }
    }

    /// Replace the value normaliser run before numbers are extracted.
    pub fn with_normalizer(mut self, normalizer: impl ValueNormalizer + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    pub fn with_token_mismatch(mut self, policy: TokenMismatch) -> Self {
        self.token_mismatch = policy;
        self
    }

    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    pub fn names_mut(&mut self) -> &mut PropertyNames {
        &mut self.names
    }

    /// Compile steps into their position list and transitions.
    ///
    /// Fails on duplicate positions and, under [`TokenMismatch::Reject`], on
    /// start/end values with different numeric token counts.
    pub fn compile(&mut self, steps: &Steps) -> Result<(PositionList, Vec<Transition>)> {
        let mut resolved: Vec<Step> = steps.iter().map(|step| self.resolve_names(step)).collect();
        resolved.sort_by_key(|step| step.position);

        if let Some(pair) = resolved.windows(2).find(|w| w[0].position == w[1].position) {
            return Err(RelaxError::DuplicatePosition(pair[0].position));
        }

        let positions: PositionList = resolved.iter().map(|step| step.position).collect();
        let transitions = resolved
            .windows(2)
            .map(|pair| self.build_transition(&pair[0], &pair[1]))
            .collect::<Result<Vec<_>>>()?;

        if self.diagnostics {
            tracing::info!(
                steps = positions.len(),
                transitions = transitions.len(),
                animated = transitions.iter().map(|t| t.animators.len()).sum::<usize>(),
                "diagnostics: compiled steps"
            );
        }

        Ok((positions, transitions))
    }

    fn resolve_names(&mut self, step: &Step) -> Step {
        let mut properties = PropertySet::new();
        for (raw, value) in &step.properties {
            let name = self.names.resolve(raw);
            let value = self.normalizer.normalize(value).into_owned();
            if let Some(previous) = properties.insert(name.clone(), value) {
                tracing::warn!(
                    position = step.position,
                    property = %name,
                    replaced = %previous,
                    "two property names resolve to the same property; keeping the later one"
                );
            }
        }
        Step {
            position: step.position,
            properties,
        }
    }

    fn build_transition(&self, start: &Step, end: &Step) -> Result<Transition> {
        let distance = end
            .position
            .checked_sub(start.position)
            .ok_or(RelaxError::PositionRange {
                start: start.position,
                end: end.position,
            })?;
        let mut animators = BTreeMap::new();

        // Values were normalised when names were resolved
        for (name, start_text) in &start.properties {
            let Some(end_text) = end.properties.get(name) else {
                continue;
            };

            let mut start_values = codec::extract_values(start_text);
            let end_values = codec::extract_values(end_text);

            if start_values.len() != end_values.len() {
                match self.token_mismatch {
                    TokenMismatch::Reject => {
                        return Err(RelaxError::TokenCountMismatch {
                            property: name.clone(),
                            start: start.position,
                            end: end.position,
                            start_tokens: start_values.len(),
                            end_tokens: end_values.len(),
                        });
                    }
                    TokenMismatch::Truncate => {
                        tracing::warn!(
                            property = %name,
                            start = start.position,
                            end = end.position,
                            start_tokens = start_values.len(),
                            end_tokens = end_values.len(),
                            "numeric token counts differ; interpolating the common prefix"
                        );
                        start_values.truncate(end_values.len());
                    }
                }
            }

            let delta = start_values
                .iter()
                .zip(&end_values)
                .map(|(from, to)| to - from)
                .collect();

            animators.insert(
                name.clone(),
                PropertyAnimator {
                    start_values,
                    delta,
                    template: codec::build_template(start_text),
                },
            );
        }

        Ok(Transition {
            start_pos: start.position,
            end_pos: end.position,
            distance,
            start_props: start.properties.clone(),
            end_props: end.properties.clone(),
            animators,
        })
    }
}
