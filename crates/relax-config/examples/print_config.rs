/// Example program to print the loaded configuration
///
/// Run with: cargo run -p relax-config --example print_config

fn main() {
    // Load configuration from relax.toml
    let config = relax_config::RelaxConfig::load();

    println!("=== Relax Configuration ===\n");

    println!("Engine Settings:");
    println!("  Default Easing: {}", config.engine.default_easing);
    println!("  Start Boundary: {:?}", config.engine.start_boundary);
    println!("  Token Mismatch: {:?}", config.engine.token_mismatch);
    println!("  Diagnostics: {:?}", config.engine.diagnostics);
    println!();

    println!("Capabilities:");
    println!(
        "  Supported Properties: {}",
        config.capabilities.supported_properties.len()
    );
    println!();

    println!("Demo Settings:");
    println!("  Steps: {:?}", config.demo.steps);
    println!("  Sweep Step: {}", config.demo.sweep_step);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
