use clap::Parser;
use tracing_subscriber::EnvFilter;

use a11y_scan::cli::commands::{cmd_rules, cmd_scan};
use a11y_scan::cli::config::{Cli, Commands, load_config, resolve_scan_settings};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Scan(args) => {
            // Resolve settings: CLI > config > defaults
            let settings = resolve_scan_settings(&args, &config.scan)?;
            let clean = cmd_scan(&settings)?;
            if !clean {
                std::process::exit(1);
            }
        }
        Commands::Rules { format } => {
            cmd_rules(&format)?;
        }
    }

    Ok(())
}

/// RUST_LOG wins; otherwise -v raises the level step by step.
fn init_tracing(verbose: u8) {
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("a11y_scan=warn"),
            1 => EnvFilter::new("a11y_scan=info"),
            2 => EnvFilter::new("a11y_scan=debug"),
            _ => EnvFilter::new("a11y_scan=trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}
