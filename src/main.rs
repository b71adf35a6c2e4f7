use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};
use relax_config::{DemoConfig, RelaxConfig};
use relax_engine::animation::{AnimationOptions, AnimationRegistry, InlineStyle, Steps};
use relax_engine::scroll::{ScrollBinding, ScrollNotifier, ScrollOffset};

const SAMPLE_STEPS: &str = r##"{
    "0": { "opacity": "0", "transform": "translate(0px, 40px)", "color": "#ff0000" },
    "100": { "opacity": "1", "transform": "translate(0px, 0px)", "color": "#00ff00" },
    "200": { "opacity": "0.5", "margin-left": "0px" },
    "300": { "opacity": "0", "margin-left": "120px" }
}"##;

fn load_steps(config: &RelaxConfig) -> Result<Steps> {
    let source = if let Some(path) = std::env::args().nth(1) {
        std::fs::read_to_string(&path).with_context(|| format!("reading steps from {path}"))?
    } else if let Some(path) = &config.demo.steps {
        std::fs::read_to_string(path)
            .with_context(|| format!("reading steps from {}", path.display()))?
    } else {
        SAMPLE_STEPS.to_string()
    };
    Ok(Steps::from_json(&source)?)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = RelaxConfig::load();
    log::debug!("config: {:?}", config);

    let steps = load_steps(&config)?;
    let element = InlineStyle::new();
    let mut registry = AnimationRegistry::from_config(&config);
    registry.add(element.clone(), &steps, AnimationOptions::default())?;

    let (first, last) = match registry.entries().first().map(|e| e.positions()) {
        Some([first, .., last]) => (*first as f64, *last as f64),
        Some([only]) => (*only as f64, *only as f64),
        _ => (0.0, 0.0),
    };

    let offset = ScrollOffset::new("simulated", first);
    let notifier = ScrollNotifier::new();
    let mut binding = ScrollBinding::new(Rc::new(RefCell::new(registry)))
        .with_source(Rc::new(offset.clone()));
    binding.enable(&notifier)?;

    let sweep_step = if config.demo.sweep_step > 0.0 {
        config.demo.sweep_step
    } else {
        log::warn!("non-positive sweep_step {}; using default", config.demo.sweep_step);
        DemoConfig::default().sweep_step
    };
    let mut position = first;
    while position <= last + sweep_step {
        offset.set(position);
        notifier.notify();
        log::info!("{:>8.1}  {}", position, element.to_css_text());
        position += sweep_step;
    }

    binding.disable(&notifier);
    log::info!("disabled, style empty: {}", element.is_empty());
    Ok(())
}
