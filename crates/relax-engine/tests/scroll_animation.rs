use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use relax_engine::animation::{
    AnimationOptions, AnimationRegistry, EasingFunction, ElementSet, InlineStyle, Steps,
};
use relax_engine::{RelaxError, ScrollBinding, ScrollNotifier, ScrollOffset};

fn bound(
    registry: AnimationRegistry<InlineStyle>,
    offset: &ScrollOffset,
    notifier: &ScrollNotifier,
) -> Result<ScrollBinding<InlineStyle>> {
    let mut binding =
        ScrollBinding::new(Rc::new(RefCell::new(registry))).with_source(Rc::new(offset.clone()));
    binding.enable(notifier)?;
    Ok(binding)
}

#[test]
fn sweeps_json_steps_through_binding() -> Result<()> {
    let steps = Steps::from_json(
        r#"{
            "0": { "opacity": 0, "margin-left": "0px" },
            "100": { "opacity": 1, "margin-left": "20px" }
        }"#,
    )?;
    let element = InlineStyle::new();
    let mut registry = AnimationRegistry::new();
    registry.add(element.clone(), &steps, AnimationOptions::default())?;

    let offset = ScrollOffset::new("page-offset", 0.0);
    let notifier = ScrollNotifier::new();
    let mut binding = bound(registry, &offset, &notifier)?;

    assert_eq!(element.to_css_text(), "marginLeft: 0px; opacity: 0");

    let expected = [
        (25.0, "marginLeft: 5px; opacity: 0.25"),
        (50.0, "marginLeft: 10px; opacity: 0.5"),
        (100.0, "marginLeft: 20px; opacity: 1"),
        (400.0, "marginLeft: 20px; opacity: 1"),
    ];
    for (position, css) in expected {
        offset.set(position);
        notifier.notify();
        assert_eq!(element.to_css_text(), css, "at {position}");
    }

    offset.set(-5.0);
    notifier.notify();
    assert!(element.is_empty());

    offset.set(50.0);
    binding.disable(&notifier);
    assert!(!binding.is_enabled());
    assert_eq!(notifier.listener_count(), 0);
    assert!(element.is_empty());

    notifier.notify();
    assert!(element.is_empty());
    Ok(())
}

#[test]
fn hex_colors_interpolate_as_rgb() -> Result<()> {
    let element = InlineStyle::new();
    let mut registry = AnimationRegistry::new();
    registry.add(
        element.clone(),
        &Steps::new()
            .step(0, |s| s.set("color", "#ff0000"))
            .step(100, |s| s.set("color", "#00ff00")),
        AnimationOptions::default(),
    )?;

    let expected = [
        (0.0, "rgb(255,0,0)"),
        (50.0, "rgb(127,127,0)"),
        (99.0, "rgb(2,252,0)"),
        (100.0, "rgb(0,255,0)"),
    ];
    for (position, color) in expected {
        registry.render(position);
        assert_eq!(element.get("color").as_deref(), Some(color), "at {position}");
    }
    Ok(())
}

#[test]
fn later_transitions_overwrite_committed_values() -> Result<()> {
    let element = InlineStyle::new();
    let mut registry = AnimationRegistry::new();
    registry.add(
        element.clone(),
        &Steps::new()
            .step(0, |s| s.set("width", "0px"))
            .step(100, |s| s.set("width", "100px"))
            .step(300, |s| s.set("width", "50px")),
        AnimationOptions::new().with_easing(EasingFunction::Linear),
    )?;

    registry.render(200.0);
    assert_eq!(element.get("width").as_deref(), Some("75px"));

    registry.render(99.0);
    assert_eq!(element.get("width").as_deref(), Some("99px"));
    Ok(())
}

#[test]
fn one_registration_drives_many_elements() -> Result<()> {
    let first = InlineStyle::new();
    let second = InlineStyle::new();
    let mut registry: AnimationRegistry<InlineStyle> = AnimationRegistry::new();
    registry.add(
        ElementSet::many(vec![first.clone(), second.clone()]),
        &Steps::from_json(r#"{ "10": { "height": "0px" }, "20": { "height": "10px" } }"#)?,
        AnimationOptions::default(),
    )?;

    registry.render(12.0);
    assert_eq!(first.get("height").as_deref(), Some("2px"));
    assert_eq!(first.snapshot(), second.snapshot());
    Ok(())
}

#[test]
fn rejects_invalid_registrations() -> Result<()> {
    let element = InlineStyle::new();
    let mut registry = AnimationRegistry::new();

    let duplicate = Steps::from_json(
        r#"{ "100": { "opacity": "0" }, "100px": { "opacity": "1" } }"#,
    )?;
    assert!(matches!(
        registry.add(element.clone(), &duplicate, AnimationOptions::default()),
        Err(RelaxError::DuplicatePosition(100))
    ));

    let mismatch = Steps::new()
        .step(0, |s| s.set("margin", "0px"))
        .step(10, |s| s.set("margin", "1px 2px"));
    assert!(matches!(
        registry.add(element.clone(), &mismatch, AnimationOptions::default()),
        Err(RelaxError::TokenCountMismatch { start_tokens: 1, end_tokens: 2, .. })
    ));

    assert!(matches!(
        Steps::from_json(r#"{ "0": { "opacity": true } }"#),
        Err(RelaxError::InvalidValue { position: 0, .. })
    ));
    assert!(matches!(
        Steps::from_json(r#"{ "top": { "opacity": "1" } }"#),
        Err(RelaxError::InvalidPosition(_))
    ));
    assert!(matches!(Steps::from_json("[1, 2]"), Err(RelaxError::Json(_))));

    assert!(registry.is_empty());
    Ok(())
}
