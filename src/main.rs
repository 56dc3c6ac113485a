//! setup-npmrc binary entry point.

use setup_npmrc::cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    if let Err(e) = setup_npmrc::cli::run(cli).await {
        eprintln!("Error: {e}");
        if let Some(help) = e.help() {
            eprintln!("{help}");
        }
        std::process::exit(1);
    }
}
