//! Reviewlens Gateway CLI
//!
//! Starts the Gateway HTTP server that fronts the review-intelligence
//! aggregation layer.

use reviewlens_gateway::{config::GatewayConfig, start_server, GatewayError};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), GatewayError> {
    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        // Load from specified config file
        let config_path = &args[2];
        GatewayConfig::from_file(config_path)?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        // Use default test configuration
        eprintln!("Warning: No config file specified, using default test configuration");
        eprintln!("Usage: reviewlens-gateway --config <path-to-config.toml>");
        eprintln!();
        GatewayConfig::default_test_config()
    };

    // Start the server
    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("Reviewlens Gateway - Review Analytics Aggregation Service");
    println!();
    println!("USAGE:");
    println!("    reviewlens-gateway --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("EXAMPLE:");
    println!("    reviewlens-gateway --config config/gateway.toml");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file should contain:");
    println!("    - bind_address: IP address to bind (e.g., '127.0.0.1')");
    println!("    - bind_port: Port number (e.g., 8090)");
    println!("    - upstream_base_url: Origin of the model service");
    println!("    - call_timeout_ms: Upstream call deadline (default: 5000)");
    println!("    - top_aspects: Top aspects in the overview (default: 3)");
    println!("    - journal_capacity: Observation window size (default: 200)");
    println!();
}
