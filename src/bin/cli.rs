//! reddit-digest CLI
//!
//! Local execution entry point. For AWS Lambda, use `reddit-digest-lambda`.

use std::path::PathBuf;

use clap::Parser;
use reddit_digest::{
    error::Result,
    models::{Config, Credentials},
    pipeline::{self, Outcome},
};

/// reddit-digest - Daily top posts by email
#[derive(Parser, Debug)]
#[command(
    name = "reddit-digest",
    version,
    about = "Email a digest of top Reddit posts"
)]
struct Cli {
    /// Path to the TOML settings file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Print the HTML digest instead of sending it
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = execute(&cli).await {
        log::error!("{e}");
        std::process::exit(1);
    }
}

async fn execute(cli: &Cli) -> Result<()> {
    if let Ok(path) = dotenvy::dotenv() {
        log::debug!("Loaded environment from {}", path.display());
    }

    let credentials = Credentials::from_env()?;
    let config = Config::load_or_default(&cli.config)?;
    log::info!("Loaded configuration from {}", cli.config.display());

    match pipeline::run(&config, &credentials, cli.dry_run).await? {
        Outcome::Preview(html) => println!("{html}"),
        Outcome::Sent(summary) => log::info!(
            "Done: {} posts from {} communities",
            summary.posts,
            summary.communities
        ),
    }
    Ok(())
}
