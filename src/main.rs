use std::env;

use compendium::cli;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("compendium=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    std::process::exit(cli::run_with_args(&args));
}
