/// Example program to print the loaded configuration
///
/// Run with: cargo run -p overlay-config --example print_config

fn main() {
    let config = overlay_config::OverlayConfig::load();

    println!("=== Overlay Configuration ===\n");

    println!("Cache Settings:");
    println!("  Sweep Interval: {}", config.cache.sweep_interval);
    println!("  Initial Capacity: {}", config.cache.initial_capacity);
    println!();

    println!("Prepare Settings:");
    println!("  Mode: {:?}", config.prepare.mode);
    println!();

    println!("Demo Settings:");
    println!("  Transition: {:?}", config.demo.transition);
    println!("  Frames: {}", config.demo.frames);
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
