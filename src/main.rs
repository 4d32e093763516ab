use anyhow::Result;
use clap::Parser;
use decorbot::cli::{Cli, Commands};
use decorbot::commands;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "decorbot=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Run => commands::run::run(&cli).await,
        Commands::Render {
            input,
            output,
            decoration,
            name,
        } => commands::render::run(&cli, input, output, decoration, name),
        Commands::Init => commands::init::run(&cli),
        Commands::Check => commands::check::run(&cli),
    }
}
