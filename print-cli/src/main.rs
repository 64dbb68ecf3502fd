//! image-print: place images on a page at a physical size and print them.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use print_cli::AppConfig;
use print_cli::cli::{self, Cli};

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    print_cli::load_dotenv();
    let config = AppConfig::from_env();
    tracing::debug!(?config, "Configuration loaded");

    cli::run(args, config)
}
