use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vocab_quest::app::{App, AppOptions};
use vocab_quest::models::Config;

#[derive(Debug, Parser)]
#[command(name = "vocab-quest")]
#[command(about = "Learn vocabulary with flashcards, mini-games and articles")]
struct CliArgs {
    /// Seed for a repeatable shuffle order.
    #[arg(long)]
    seed: Option<u64>,

    /// Where saved word groups and stories live (overrides VOCAB_DATA_DIR).
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Never run the speech command.
    #[arg(long)]
    silent: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vocab_quest=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }

    info!("Starting vocab-quest");
    let mut app = App::new(
        &config,
        AppOptions {
            seed: args.seed,
            silent: args.silent,
        },
    );

    if let Err(e) = app.run().await {
        error!("Session failed: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
