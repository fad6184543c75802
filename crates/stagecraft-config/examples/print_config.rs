/// Example program to print the loaded configuration
///
/// Run with: cargo run -p stagecraft-config --example print_config

fn main() {
    // Load configuration from stagecraft.toml
    let config = stagecraft_config::StagecraftConfig::load();

    println!("=== Stagecraft Configuration ===\n");

    println!("Animation Settings:");
    println!("  Duration: {}s", config.animation.duration);
    println!("  Easing: {}", config.animation.easing);
    println!("  Forward Delay: {}s", config.animation.forward_delay);
    println!("  Reverse Delay: {}s", config.animation.reverse_delay);
    println!();

    println!("State Machine Settings:");
    println!("  Transition Policy: {}", config.state_machine.transition_policy);
    println!();

    println!("Demo Settings:");
    println!("  Frame Rate: {}", config.demo.frame_rate);
    println!("  Idle Timeout: {}s", config.demo.idle_timeout);
    println!("  Max Frames: {}", config.demo.max_frames);
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
