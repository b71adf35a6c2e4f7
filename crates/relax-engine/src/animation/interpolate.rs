//! Interpolation of compiled property animators.
//!
//! Each numeric component of an animator is eased independently and the
//! results are rendered back through the animator's template.

use super::compiler::{PropertyAnimator, Transition};
use super::easing::Easing;

/// Live value of `animator` at `progress`.
///
/// `progress` is not clamped; outside `[0, 1]` the easing extrapolates.
pub fn value_at(animator: &PropertyAnimator, progress: f64, easing: &Easing) -> String {
    let values: Vec<f64> = animator
        .start_values
        .iter()
        .zip(&animator.delta)
        .map(|(start, delta)| easing.apply(progress, *start, *delta, 1.0))
        .collect();
    animator.template.render(&values)
}

/// Every animated `(property, value)` pair of `transition` at `position`.
pub fn render_transition<'t>(
    transition: &'t Transition,
    position: f64,
    easing: &Easing,
) -> Vec<(&'t str, String)> {
    let progress = transition.progress(position);
    transition
        .animators
        .iter()
        .map(|(name, animator)| (name.as_str(), value_at(animator, progress, easing)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::compiler::{StepCompiler, Steps};
    use crate::animation::easing::EasingFunction;

    fn single_transition(property: &str, from: &str, to: &str) -> Transition {
        let steps = Steps::new()
            .step(0, |s| s.set(property, from))
            .step(100, |s| s.set(property, to));
        let (_, mut transitions) = StepCompiler::default().compile(&steps).unwrap();
        transitions.remove(0)
    }

    #[test]
    fn test_endpoints_exact() {
        let transition = single_transition("margin", "10px -20px", "35.5px 40px");
        let animator = &transition.animators["margin"];
        let linear = Easing::default();

        assert_eq!(value_at(animator, 0.0, &linear), "10px -20px");
        assert_eq!(value_at(animator, 1.0, &linear), "35.5px 40px");
    }

    #[test]
    fn test_opacity_midpoint() {
        let transition = single_transition("opacity", "0", "1");
        let rendered = render_transition(&transition, 50.0, &Easing::default());
        assert_eq!(rendered, vec![("opacity", "0.5".to_string())]);
    }

    #[test]
    fn test_hex_midpoint_truncates_channels() {
        let transition = single_transition("color", "#ff0000", "#00ff00");
        let animator = &transition.animators["color"];
        assert_eq!(value_at(animator, 0.5, &Easing::default()), "rgb(127,127,0)");
        assert_eq!(value_at(animator, 1.0, &Easing::default()), "rgb(0,255,0)");
    }

    #[test]
    fn test_easing_applied_per_component() {
        let transition = single_transition("transform", "translate(0px, 100px)", "translate(100px, 0px)");
        let animator = &transition.animators["transform"];

        let ease_in = Easing::from(EasingFunction::EaseIn);
        assert_eq!(value_at(animator, 0.5, &ease_in), "translate(25px, 75px)");

        let ease_out = Easing::from(EasingFunction::EaseOut);
        assert_eq!(value_at(animator, 0.5, &ease_out), "translate(75px, 25px)");
    }

    #[test]
    fn test_static_value_renders_template() {
        let transition = single_transition("display", "block", "block");
        let animator = &transition.animators["display"];
        assert!(animator.start_values.is_empty());
        assert_eq!(value_at(animator, 0.3, &Easing::default()), "block");
    }

    #[test]
    fn test_extrapolates_outside_range() {
        let transition = single_transition("width", "0px", "100px");
        let animator = &transition.animators["width"];
        assert_eq!(value_at(animator, 1.5, &Easing::default()), "150px");
    }

    #[test]
    fn test_custom_easing() {
        let transition = single_transition("opacity", "0", "1");
        let half_way = Easing::custom(|_, b, c, _| b + c / 2.0);
        let rendered = render_transition(&transition, 10.0, &half_way);
        assert_eq!(rendered[0].1, "0.5");
    }
}
